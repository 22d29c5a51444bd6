#![forbid(unsafe_code)]

use crate::error::SurveyError;
use crate::ids::{QuestionId, SurveyId};
use crate::model::{Answer, Question, Survey};
use crate::options::OptionMap;
use crate::repository::Repository;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSummary {
    pub question_id: QuestionId,
    pub question_text: String,
    pub response_options: Vec<String>,
    /// Answer counts keyed by resolved label, or by the raw text when the
    /// answer is not one of the question's codes.
    pub responses: BTreeMap<String, u64>,
}

impl QuestionSummary {
    pub fn total(&self) -> u64 {
        self.responses.values().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyResults {
    pub survey: Survey,
    pub results: Vec<QuestionSummary>,
}

/// Counts one question's raw answers.
///
/// Each raw value is resolved through the question's options first and then
/// counted, so distinct raw values that resolve to the same key (`"3"` and the
/// literal `"High"` when option 3 is "High", or two codes whose labels are
/// duplicates) accumulate into one bucket.
pub fn summarize_question<'a, I>(question: &Question, raw_answers: I) -> QuestionSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let option_map = OptionMap::from_options(&question.response_options);
    let mut responses = BTreeMap::new();
    for raw in raw_answers {
        *responses
            .entry(option_map.resolve(raw).to_string())
            .or_insert(0u64) += 1;
    }
    QuestionSummary {
        question_id: question.id,
        question_text: question.text.clone(),
        response_options: question.response_options.clone(),
        responses,
    }
}

/// Builds the per-question summaries, in question order, from every answer of
/// the survey. Questions without answers get an empty count map.
pub fn aggregate(survey: Survey, questions: &[Question], answers: &[Answer]) -> SurveyResults {
    let mut by_question: HashMap<QuestionId, Vec<&str>> = HashMap::new();
    for answer in answers {
        by_question
            .entry(answer.question_id)
            .or_default()
            .push(answer.text.as_str());
    }

    let results = questions
        .iter()
        .map(|question| {
            let raw = by_question.remove(&question.id).unwrap_or_default();
            summarize_question(question, raw)
        })
        .collect::<Vec<_>>();

    let orphaned = by_question.values().map(Vec::len).sum::<usize>();
    if orphaned > 0 {
        debug!(
            survey_id = %survey.id,
            orphaned,
            "skipped answers for questions outside the survey"
        );
    }

    SurveyResults { survey, results }
}

pub fn compute_results<R: Repository>(
    repo: &R,
    survey_id: SurveyId,
) -> Result<SurveyResults, SurveyError> {
    let Some(survey) = repo.load_survey(survey_id).map_err(SurveyError::internal)? else {
        return Err(SurveyError::not_found(SurveyId::KIND, survey_id));
    };
    let questions = repo
        .load_questions_by_survey(survey_id)
        .map_err(SurveyError::internal)?;
    let answers = repo
        .load_answers_by_survey(survey_id)
        .map_err(SurveyError::internal)?;
    debug!(
        survey_id = %survey_id,
        questions = questions.len(),
        answers = answers.len(),
        "aggregating results"
    );
    Ok(aggregate(survey, &questions, &answers))
}
