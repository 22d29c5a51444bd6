#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn survey_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "survey_id": { "type": "string", "description": "Survey UUID." }
        },
        "required": ["survey_id"]
    })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "survey_create",
            "description": "Create a survey. Questions without responseOptions get the 5-point agreement scale.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "description": { "type": "string" },
                    "questions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "text": { "type": "string" },
                                "responseOptions": {
                                    "type": "array",
                                    "items": { "type": "string" }
                                }
                            },
                            "required": ["text"]
                        }
                    }
                }
            },
        }),
        json!({
            "name": "survey_get",
            "description": "Load one survey with its questions in order.",
            "inputSchema": survey_id_schema(),
        }),
        json!({
            "name": "survey_list",
            "description": "List all surveys, oldest first.",
            "inputSchema": { "type": "object", "properties": {} },
        }),
        json!({
            "name": "survey_delete",
            "description": "Delete a survey with its questions, submissions and answers.",
            "inputSchema": survey_id_schema(),
        }),
        json!({
            "name": "survey_submit",
            "description": "Record one submission. Answers are keyed by question id; \"1\"..\"n\" select the n-th response option.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "surveyId": { "type": "string", "description": "Survey UUID." },
                    "survey_id": { "type": "string", "description": "Alias of surveyId." },
                    "answers": {
                        "type": "object",
                        "additionalProperties": { "type": ["string", "number"] }
                    }
                },
                "anyOf": [
                    { "required": ["surveyId"] },
                    { "required": ["survey_id"] }
                ]
            },
        }),
        json!({
            "name": "survey_results",
            "description": "Per-question answer counts keyed by option label.",
            "inputSchema": survey_id_schema(),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_keys(schema: &Value) -> Vec<String> {
        let mut keys = Vec::new();
        let mut collect = |list: Option<&Value>| {
            for key in list.and_then(|v| v.as_array()).into_iter().flatten() {
                keys.push(key.as_str().expect("required key").to_string());
            }
        };
        collect(schema.get("required"));
        for branch in schema
            .get("anyOf")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
        {
            collect(branch.get("required"));
        }
        keys
    }

    #[test]
    fn required_keys_are_declared_properties() {
        for tool in tool_definitions() {
            let schema = &tool["inputSchema"];
            let properties = schema["properties"].as_object().expect("properties");
            for key in required_keys(schema) {
                assert!(
                    properties.contains_key(&key),
                    "{}: required key {key} is not a property",
                    tool["name"]
                );
            }
        }
    }

    #[test]
    fn submit_schema_lists_both_survey_id_spellings() {
        let submit = tool_definitions()
            .into_iter()
            .find(|tool| tool["name"] == "survey_submit")
            .expect("survey_submit");
        let properties = submit["inputSchema"]["properties"]
            .as_object()
            .expect("properties");
        assert!(properties.contains_key("surveyId"));
        assert!(properties.contains_key("survey_id"));
    }
}
