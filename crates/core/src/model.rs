#![forbid(unsafe_code)]

use crate::ids::{AnswerId, QuestionId, SubmissionId, SurveyId};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Survey {
    pub id: SurveyId,
    pub description: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub response_count: u64,
}

impl Survey {
    /// A fresh survey shell: new identity, no responses yet.
    pub fn new(description: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: SurveyId::generate(),
            description: description.into(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            response_count: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub survey_id: SurveyId,
    pub position: u32,
    pub text: String,
    pub response_options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub survey_id: SurveyId,
    pub submitted_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub submission_id: SubmissionId,
    pub question_id: QuestionId,
    pub text: String,
}

/// A survey together with its questions in survey order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyDetail {
    pub survey: Survey,
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SurveyDraft {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    #[serde(default, rename = "responseOptions", alias = "response_options")]
    pub response_options: Option<Vec<String>>,
}

impl QuestionDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            response_options: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.response_options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_wire_field_names() {
        let draft: SurveyDraft = serde_json::from_str(
            r#"{
                "description": "Team pulse",
                "questions": [
                    { "text": "Workload is fine", "responseOptions": ["No", "Yes"] },
                    { "text": "Any remarks?", "response_options": [] },
                    { "text": "Mood" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(draft.description, "Team pulse");
        assert_eq!(
            draft.questions[0].response_options,
            Some(vec!["No".to_string(), "Yes".to_string()])
        );
        assert_eq!(draft.questions[1].response_options, Some(Vec::new()));
        assert_eq!(draft.questions[2].response_options, None);
    }

    #[test]
    fn new_survey_starts_without_responses() {
        let survey = Survey::new("x", 42);
        assert_eq!(survey.response_count, 0);
        assert_eq!(survey.created_at_ms, 42);
        assert_eq!(survey.updated_at_ms, 42);
    }
}
