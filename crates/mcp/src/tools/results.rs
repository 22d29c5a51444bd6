#![forbid(unsafe_code)]

use super::render::results_json;
use crate::*;
use serde_json::Value;

impl McpServer {
    pub(crate) fn tool_survey_results(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(obj) => obj,
            Err(resp) => return resp,
        };
        let survey_id = match require_survey_id(args_obj, &["survey_id"]) {
            Ok(id) => id,
            Err(resp) => return resp,
        };

        match self.store.compute_results(survey_id) {
            Ok(results) => ai_ok("survey_results", results_json(&results)),
            Err(err) => survey_error(&err),
        }
    }
}
