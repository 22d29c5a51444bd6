#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::Value;

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "survey_create" => server.tool_survey_create(args),
        "survey_get" => server.tool_survey_get(args),
        "survey_list" => server.tool_survey_list(args),
        "survey_delete" => server.tool_survey_delete(args),
        "survey_submit" => server.tool_survey_submit(args),
        "survey_results" => server.tool_survey_results(args),
        _ => return None,
    };
    Some(resp)
}
