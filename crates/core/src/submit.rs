#![forbid(unsafe_code)]

use crate::error::SurveyError;
use crate::ids::{AnswerId, QuestionId, SubmissionId, SurveyId};
use crate::model::{Answer, Submission};
use crate::repository::Repository;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Records one respondent's answers, keyed by question id.
///
/// All question ids are checked against the survey before anything is written,
/// so a rejected submission leaves no trace even without a surrounding
/// transaction. Answer texts are stored verbatim.
pub fn submit<R: Repository>(
    repo: &mut R,
    survey_id: SurveyId,
    answers: &BTreeMap<QuestionId, String>,
    now_ms: i64,
) -> Result<(), SurveyError> {
    if repo
        .load_survey(survey_id)
        .map_err(SurveyError::internal)?
        .is_none()
    {
        return Err(SurveyError::not_found(SurveyId::KIND, survey_id));
    }

    let known = repo
        .load_questions_by_survey(survey_id)
        .map_err(SurveyError::internal)?
        .into_iter()
        .map(|question| question.id)
        .collect::<HashSet<_>>();
    if let Some(unknown) = answers.keys().find(|id| !known.contains(id)) {
        return Err(SurveyError::invalid_input(format!(
            "question {unknown} does not belong to survey {survey_id}"
        )));
    }

    let submission = Submission {
        id: SubmissionId::generate(),
        survey_id,
        submitted_at_ms: now_ms,
    };
    repo.save_submission(&submission)
        .map_err(SurveyError::internal)?;

    let records = answers
        .iter()
        .map(|(question_id, text)| Answer {
            id: AnswerId::generate(),
            submission_id: submission.id,
            question_id: *question_id,
            text: text.clone(),
        })
        .collect::<Vec<_>>();
    repo.save_answers(&records).map_err(SurveyError::internal)?;

    let Some(response_count) = repo
        .increment_response_count(survey_id, now_ms)
        .map_err(SurveyError::internal)?
    else {
        return Err(SurveyError::not_found(SurveyId::KIND, survey_id));
    };

    info!(
        survey_id = %survey_id,
        submission_id = %submission.id,
        answers = records.len(),
        response_count,
        "submission recorded"
    );
    Ok(())
}
