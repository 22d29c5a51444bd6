#![forbid(unsafe_code)]

use serde_json::{Value, json};
use survey_core::{ErrorKind, SurveyError};
use tracing::error;

pub(crate) fn ai_ok_with_warnings(
    intent: &str,
    result: Value,
    warnings: Vec<Value>,
    refs: Vec<Value>,
) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "refs": refs,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new(), Vec::new())
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None, Vec::new())
}

pub(crate) fn ai_error_with(
    code: &str,
    message: &str,
    recovery: Option<&str>,
    refs: Vec<Value>,
) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "refs": refs,
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

/// `err` followed by each of its sources, outermost first.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(" <- ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Envelope for a failed survey operation. Internal details stay in the log.
pub(crate) fn survey_error(err: &SurveyError) -> Value {
    let kind = err.kind();
    if kind == ErrorKind::Internal {
        error!(error = %error_chain(err), "survey operation failed");
    }
    match kind {
        ErrorKind::NotFound => ai_error_with(
            kind.as_str(),
            &err.to_string(),
            Some("Call survey_list to see the surveys that exist."),
            Vec::new(),
        ),
        ErrorKind::InvalidInput => ai_error(kind.as_str(), &err.to_string()),
        ErrorKind::Internal => ai_error_with(
            kind.as_str(),
            "storage failure; see server log",
            Some("Retry the call; if it keeps failing, check the server log."),
            Vec::new(),
        ),
    }
}
