#![forbid(unsafe_code)]

use crate::*;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use survey_core::QuestionId;

impl McpServer {
    pub(crate) fn tool_survey_submit(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(obj) => obj,
            Err(resp) => return resp,
        };
        let survey_id = match require_survey_id(args_obj, &["surveyId", "survey_id"]) {
            Ok(id) => id,
            Err(resp) => return resp,
        };
        let answers = match parse_answers(args_obj) {
            Ok(answers) => answers,
            Err(resp) => return resp,
        };

        let mut warnings = Vec::new();
        if answers.is_empty() {
            warnings.push(warning(
                "EMPTY_SUBMISSION",
                "submission recorded without answers",
                "Pass answers as {questionId: text} to record responses.",
            ));
        }

        match self.store.submit(survey_id, &answers) {
            Ok(()) => ai_ok_with_warnings(
                "survey_submit",
                json!({ "submitted": true, "answers": answers.len() }),
                warnings,
                Vec::new(),
            ),
            Err(err) => survey_error(&err),
        }
    }
}

/// `answers` is an object keyed by question id. Numeric values are taken as
/// their decimal text, so `3` and `"3"` select the same option.
fn parse_answers(args: &Map<String, Value>) -> Result<BTreeMap<QuestionId, String>, Value> {
    let raw = match args.get("answers") {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(raw)) => raw,
        Some(_) => {
            return Err(ai_error(
                "INVALID_INPUT",
                "answers must be an object keyed by question id",
            ));
        }
    };

    let mut answers = BTreeMap::new();
    for (key, value) in raw {
        let question_id = parse_question_id(key)?;
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(ai_error(
                    "INVALID_INPUT",
                    &format!("answers.{key} must be a string"),
                ));
            }
        };
        answers.insert(question_id, text);
    }
    Ok(answers)
}
