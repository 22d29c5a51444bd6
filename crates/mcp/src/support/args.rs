#![forbid(unsafe_code)]

use super::ai::ai_error;
use serde_json::{Map, Value};
use survey_core::{QuestionId, SurveyId};

pub(crate) fn require_object(args: &Value) -> Result<&Map<String, Value>, Value> {
    args.as_object()
        .ok_or_else(|| ai_error("INVALID_INPUT", "arguments must be an object"))
}

pub(crate) fn optional_string(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

/// Reads a survey id from the first of `keys` that is present.
pub(crate) fn require_survey_id(
    args: &Map<String, Value>,
    keys: &[&str],
) -> Result<SurveyId, Value> {
    for key in keys {
        if let Some(raw) = optional_string(args, key)? {
            return SurveyId::parse(&raw)
                .map_err(|err| ai_error("INVALID_INPUT", &format!("{key}: {err}")));
        }
    }
    let key = keys.first().copied().unwrap_or("survey_id");
    Err(ai_error("INVALID_INPUT", &format!("{key} is required")))
}

pub(crate) fn parse_question_id(raw: &str) -> Result<QuestionId, Value> {
    QuestionId::parse(raw).map_err(|err| ai_error("INVALID_INPUT", &format!("answers: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(resp: &Value) -> Option<&str> {
        resp.get("error")
            .and_then(|v| v.get("code"))
            .and_then(|v| v.as_str())
    }

    #[test]
    fn survey_id_uses_first_present_key() {
        let id = SurveyId::generate();
        let args = json!({ "survey_id": id.to_string() });
        let obj = args.as_object().expect("object");
        assert_eq!(
            require_survey_id(obj, &["surveyId", "survey_id"]).expect("id"),
            id
        );
    }

    #[test]
    fn missing_or_malformed_ids_are_invalid_input() {
        let args = json!({});
        let err = require_survey_id(args.as_object().expect("object"), &["survey_id"])
            .expect_err("missing");
        assert_eq!(code(&err), Some("INVALID_INPUT"));

        let args = json!({ "survey_id": "not-a-uuid" });
        let err = require_survey_id(args.as_object().expect("object"), &["survey_id"])
            .expect_err("malformed");
        assert_eq!(code(&err), Some("INVALID_INPUT"));

        let args = json!({ "survey_id": 42 });
        let err = require_survey_id(args.as_object().expect("object"), &["survey_id"])
            .expect_err("wrong type");
        assert_eq!(code(&err), Some("INVALID_INPUT"));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = require_object(&json!([1, 2])).expect_err("array");
        assert_eq!(code(&err), Some("INVALID_INPUT"));
    }
}
