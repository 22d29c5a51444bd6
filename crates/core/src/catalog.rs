#![forbid(unsafe_code)]

use crate::error::SurveyError;
use crate::ids::SurveyId;
use crate::model::{Survey, SurveyDetail};
use crate::repository::Repository;
use tracing::info;

pub fn get_survey<R: Repository>(repo: &R, id: SurveyId) -> Result<SurveyDetail, SurveyError> {
    let Some(survey) = repo.load_survey(id).map_err(SurveyError::internal)? else {
        return Err(SurveyError::not_found(SurveyId::KIND, id));
    };
    let questions = repo
        .load_questions_by_survey(id)
        .map_err(SurveyError::internal)?;
    Ok(SurveyDetail { survey, questions })
}

pub fn list_surveys<R: Repository>(repo: &R) -> Result<Vec<Survey>, SurveyError> {
    repo.list_surveys().map_err(SurveyError::internal)
}

pub fn delete_survey<R: Repository>(repo: &mut R, id: SurveyId) -> Result<(), SurveyError> {
    if !repo.delete_survey(id).map_err(SurveyError::internal)? {
        return Err(SurveyError::not_found(SurveyId::KIND, id));
    }
    info!(survey_id = %id, "survey deleted");
    Ok(())
}
