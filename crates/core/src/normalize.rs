#![forbid(unsafe_code)]

use crate::error::SurveyError;
use crate::ids::QuestionId;
use crate::model::{Question, Survey, SurveyDetail, SurveyDraft};
use crate::options::normalize_response_options;
use crate::repository::Repository;
use tracing::{debug, info};

fn validate_draft(draft: &SurveyDraft) -> Result<(), SurveyError> {
    for (index, question) in draft.questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(SurveyError::invalid_input(format!(
                "questions[{index}].text must not be empty"
            )));
        }
    }
    Ok(())
}

/// Persists a new survey and its questions.
///
/// Questions keep the draft order. A question whose option list is missing or
/// empty is stored with the default Likert scale; a supplied list is stored as
/// given. Nothing is written when the draft is rejected.
pub fn create_survey<R: Repository>(
    repo: &mut R,
    draft: SurveyDraft,
    now_ms: i64,
) -> Result<SurveyDetail, SurveyError> {
    validate_draft(&draft)?;

    let survey = Survey::new(draft.description, now_ms);
    repo.save_survey(&survey).map_err(SurveyError::internal)?;
    info!(survey_id = %survey.id, "survey saved");

    let mut questions = Vec::with_capacity(draft.questions.len());
    for (position, question_draft) in draft.questions.into_iter().enumerate() {
        let position = u32::try_from(position)
            .map_err(|_| SurveyError::invalid_input("too many questions"))?;
        let question = Question {
            id: QuestionId::generate(),
            survey_id: survey.id,
            position,
            text: question_draft.text,
            response_options: normalize_response_options(question_draft.response_options),
        };
        repo.save_question(&question)
            .map_err(SurveyError::internal)?;
        debug!(
            question_id = %question.id,
            survey_id = %survey.id,
            options = question.response_options.len(),
            "question saved"
        );
        questions.push(question);
    }

    Ok(SurveyDetail { survey, questions })
}
