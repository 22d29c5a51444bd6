#![forbid(unsafe_code)]

use crate::ids::SurveyId;
use crate::model::{Answer, Question, Submission, Survey};

/// Persistence boundary for surveys and everything they own.
///
/// Implementations decide the transaction scope; the survey operations in this
/// crate call these methods in sequence and expect the caller to commit or roll
/// back around them.
pub trait Repository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_survey(&self, id: SurveyId) -> Result<Option<Survey>, Self::Error>;

    /// All surveys, oldest first.
    fn list_surveys(&self) -> Result<Vec<Survey>, Self::Error>;

    /// Inserts the survey, or overwrites the stored row with the same id.
    fn save_survey(&mut self, survey: &Survey) -> Result<(), Self::Error>;

    /// Removes the survey with its questions, submissions and answers.
    /// Returns false when no such survey exists.
    fn delete_survey(&mut self, id: SurveyId) -> Result<bool, Self::Error>;

    /// Questions of one survey, ordered by position.
    fn load_questions_by_survey(&self, survey_id: SurveyId) -> Result<Vec<Question>, Self::Error>;

    fn save_question(&mut self, question: &Question) -> Result<(), Self::Error>;

    fn save_submission(&mut self, submission: &Submission) -> Result<(), Self::Error>;

    fn save_answers(&mut self, answers: &[Answer]) -> Result<(), Self::Error>;

    /// Every answer recorded for the survey, across all of its submissions.
    fn load_answers_by_survey(&self, survey_id: SurveyId) -> Result<Vec<Answer>, Self::Error>;

    /// Adds one to the survey's response count and stamps `updated_at_ms`, as a
    /// single step. Returns the new count, or None when the survey is gone.
    fn increment_response_count(
        &mut self,
        survey_id: SurveyId,
        updated_at_ms: i64,
    ) -> Result<Option<u64>, Self::Error>;
}
