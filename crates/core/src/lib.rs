#![forbid(unsafe_code)]

//! Survey domain: identities, records, the persistence boundary, and the
//! operations that create surveys, record submissions and aggregate results.

pub mod catalog;
pub mod error;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod options;
pub mod repository;
pub mod results;
pub mod submit;

pub use catalog::{delete_survey, get_survey, list_surveys};
pub use error::{BoxError, ErrorKind, SurveyError};
pub use ids::{AnswerId, IdError, QuestionId, SubmissionId, SurveyId};
pub use model::{Answer, Question, QuestionDraft, Submission, Survey, SurveyDetail, SurveyDraft};
pub use normalize::create_survey;
pub use options::{DEFAULT_LIKERT_SCALE, OptionMap, default_likert_scale, normalize_response_options};
pub use repository::Repository;
pub use results::{QuestionSummary, SurveyResults, aggregate, compute_results, summarize_question};
pub use submit::submit;
