#![forbid(unsafe_code)]

use crate::ts_ms_to_rfc3339;
use serde_json::{Value, json};
use survey_core::{Question, QuestionSummary, Survey, SurveyDetail, SurveyResults};

pub(crate) fn question_json(question: &Question) -> Value {
    json!({
        "id": question.id.to_string(),
        "survey_id": question.survey_id.to_string(),
        "text": question.text,
        "responseOptions": question.response_options,
    })
}

pub(crate) fn survey_json(survey: &Survey) -> Value {
    json!({
        "id": survey.id.to_string(),
        "description": survey.description,
        "createdAt": ts_ms_to_rfc3339(survey.created_at_ms),
        "updatedAt": ts_ms_to_rfc3339(survey.updated_at_ms),
        "response_count": survey.response_count,
    })
}

pub(crate) fn survey_detail_json(detail: &SurveyDetail) -> Value {
    let mut out = survey_json(&detail.survey);
    if let Some(obj) = out.as_object_mut() {
        obj.insert(
            "questions".to_string(),
            Value::Array(detail.questions.iter().map(question_json).collect()),
        );
    }
    out
}

fn summary_json(summary: &QuestionSummary) -> Value {
    json!({
        "questionId": summary.question_id.to_string(),
        "questionText": summary.question_text,
        "responseOptions": summary.response_options,
        "responses": summary.responses,
    })
}

pub(crate) fn results_json(results: &SurveyResults) -> Value {
    let survey = &results.survey;
    json!({
        "survey": {
            "id": survey.id.to_string(),
            "description": survey.description,
            "createdAt": ts_ms_to_rfc3339(survey.created_at_ms),
            "updatedAt": ts_ms_to_rfc3339(survey.updated_at_ms),
            "responseCount": survey.response_count,
        },
        "results": results.results.iter().map(summary_json).collect::<Vec<_>>(),
    })
}
