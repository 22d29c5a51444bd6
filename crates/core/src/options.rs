#![forbid(unsafe_code)]

use std::collections::HashMap;

/// Labels assigned to a question created without response options.
pub const DEFAULT_LIKERT_SCALE: [&str; 5] = [
    "Totally disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Fully Agree",
];

pub fn default_likert_scale() -> Vec<String> {
    DEFAULT_LIKERT_SCALE.iter().map(|s| s.to_string()).collect()
}

/// Supplied options are kept verbatim; a missing or empty list gets the default scale.
pub fn normalize_response_options(options: Option<Vec<String>>) -> Vec<String> {
    match options {
        Some(options) if !options.is_empty() => options,
        _ => default_likert_scale(),
    }
}

/// Lookup from 1-based answer codes (`"1"`, `"2"`, ...) to option labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionMap {
    labels: HashMap<String, String>,
}

impl OptionMap {
    pub fn from_options(options: &[String]) -> Self {
        let labels = options
            .iter()
            .enumerate()
            .map(|(index, label)| ((index + 1).to_string(), label.clone()))
            .collect();
        Self { labels }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// The label for `raw` when it is a known code, otherwise `raw` itself.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        match self.get(raw) {
            Some(label) => label,
            None => raw,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
