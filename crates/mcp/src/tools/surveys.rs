#![forbid(unsafe_code)]

use super::render::{survey_detail_json, survey_json};
use crate::*;
use serde_json::{Value, json};
use survey_core::SurveyDraft;

impl McpServer {
    pub(crate) fn tool_survey_create(&mut self, args: Value) -> Value {
        if let Err(resp) = require_object(&args) {
            return resp;
        }
        let draft: SurveyDraft = match serde_json::from_value(args) {
            Ok(draft) => draft,
            Err(err) => return ai_error("INVALID_INPUT", &format!("invalid survey: {err}")),
        };

        match self.store.create_survey(draft) {
            Ok(detail) => ai_ok("survey_create", survey_detail_json(&detail)),
            Err(err) => survey_error(&err),
        }
    }

    pub(crate) fn tool_survey_get(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(obj) => obj,
            Err(resp) => return resp,
        };
        let survey_id = match require_survey_id(args_obj, &["survey_id"]) {
            Ok(id) => id,
            Err(resp) => return resp,
        };

        match self.store.get_survey(survey_id) {
            Ok(detail) => ai_ok("survey_get", survey_detail_json(&detail)),
            Err(err) => survey_error(&err),
        }
    }

    pub(crate) fn tool_survey_list(&mut self, _args: Value) -> Value {
        match self.store.list_surveys() {
            Ok(surveys) => ai_ok(
                "survey_list",
                json!({ "surveys": surveys.iter().map(survey_json).collect::<Vec<_>>() }),
            ),
            Err(err) => survey_error(&err),
        }
    }

    pub(crate) fn tool_survey_delete(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(obj) => obj,
            Err(resp) => return resp,
        };
        let survey_id = match require_survey_id(args_obj, &["survey_id"]) {
            Ok(id) => id,
            Err(resp) => return resp,
        };

        match self.store.delete_survey(survey_id) {
            Ok(()) => ai_ok("survey_delete", json!({ "deleted": survey_id.to_string() })),
            Err(err) => survey_error(&err),
        }
    }
}
