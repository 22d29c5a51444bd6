#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::str::FromStr;
use survey_core::{Answer, IdError, Question, Repository, Submission, Survey, SurveyId};

/// `Repository` over one open SQLite transaction.
///
/// Holds the connection borrowed from the transaction; committing or rolling
/// back stays with the owner of the transaction.
pub(crate) struct TxRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TxRepository<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

type SurveyRow = (String, String, i64, i64, i64);
type QuestionRow = (String, String, i64, String, String);
type AnswerRow = (String, String, String, String);

fn parse_id<T>(raw: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = IdError>,
{
    T::from_str(raw).map_err(|err| StoreError::Corrupt(err.to_string()))
}

fn to_sqlite_count(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Overflow(value))
}

fn from_sqlite_count(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("negative response_count {value}")))
}

fn survey_from_row(row: SurveyRow) -> Result<Survey, StoreError> {
    let (id, description, response_count, created_at_ms, updated_at_ms) = row;
    Ok(Survey {
        id: parse_id(&id)?,
        description,
        created_at_ms,
        updated_at_ms,
        response_count: from_sqlite_count(response_count)?,
    })
}

fn question_from_row(row: QuestionRow) -> Result<Question, StoreError> {
    let (id, survey_id, position, text, options_json) = row;
    Ok(Question {
        id: parse_id(&id)?,
        survey_id: parse_id(&survey_id)?,
        position: u32::try_from(position)
            .map_err(|_| StoreError::Corrupt(format!("question position {position}")))?,
        text,
        response_options: serde_json::from_str(&options_json)?,
    })
}

fn answer_from_row(row: AnswerRow) -> Result<Answer, StoreError> {
    let (id, submission_id, question_id, text) = row;
    Ok(Answer {
        id: parse_id(&id)?,
        submission_id: parse_id(&submission_id)?,
        question_id: parse_id(&question_id)?,
        text,
    })
}

impl Repository for TxRepository<'_> {
    type Error = StoreError;

    fn load_survey(&self, id: SurveyId) -> Result<Option<Survey>, StoreError> {
        let row: Option<SurveyRow> = self
            .conn
            .query_row(
                "SELECT id, description, response_count, created_at_ms, updated_at_ms \
                 FROM surveys WHERE id=?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()?;
        row.map(survey_from_row).transpose()
    }

    fn list_surveys(&self) -> Result<Vec<Survey>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, response_count, created_at_ms, updated_at_ms \
             FROM surveys \
             ORDER BY created_at_ms ASC, id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(survey_from_row((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))?);
        }
        Ok(out)
    }

    fn save_survey(&mut self, survey: &Survey) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO surveys(id, description, response_count, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET description=excluded.description, \
               response_count=excluded.response_count, updated_at_ms=excluded.updated_at_ms",
            params![
                survey.id.to_string(),
                survey.description,
                to_sqlite_count(survey.response_count)?,
                survey.created_at_ms,
                survey.updated_at_ms,
            ],
        )?;
        Ok(())
    }

    fn delete_survey(&mut self, id: SurveyId) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM surveys WHERE id=?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    fn load_questions_by_survey(&self, survey_id: SurveyId) -> Result<Vec<Question>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, survey_id, position, text, response_options_json \
             FROM questions \
             WHERE survey_id=?1 \
             ORDER BY position ASC",
        )?;
        let mut rows = stmt.query(params![survey_id.to_string()])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(question_from_row((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))?);
        }
        Ok(out)
    }

    fn save_question(&mut self, question: &Question) -> Result<(), StoreError> {
        let options_json = serde_json::to_string(&question.response_options)?;
        self.conn.execute(
            "INSERT INTO questions(id, survey_id, position, text, response_options_json) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET text=excluded.text, \
               response_options_json=excluded.response_options_json",
            params![
                question.id.to_string(),
                question.survey_id.to_string(),
                i64::from(question.position),
                question.text,
                options_json,
            ],
        )?;
        Ok(())
    }

    fn save_submission(&mut self, submission: &Submission) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO submissions(id, survey_id, submitted_at_ms) VALUES (?1, ?2, ?3)",
            params![
                submission.id.to_string(),
                submission.survey_id.to_string(),
                submission.submitted_at_ms,
            ],
        )?;
        Ok(())
    }

    fn save_answers(&mut self, answers: &[Answer]) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO answers(id, submission_id, question_id, answer) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for answer in answers {
            stmt.execute(params![
                answer.id.to_string(),
                answer.submission_id.to_string(),
                answer.question_id.to_string(),
                answer.text,
            ])?;
        }
        Ok(())
    }

    fn load_answers_by_survey(&self, survey_id: SurveyId) -> Result<Vec<Answer>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.submission_id, a.question_id, a.answer \
             FROM answers a \
             JOIN submissions s ON s.id = a.submission_id \
             WHERE s.survey_id=?1 \
             ORDER BY s.submitted_at_ms ASC, s.id ASC, a.rowid ASC",
        )?;
        let mut rows = stmt.query(params![survey_id.to_string()])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(answer_from_row((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ))?);
        }
        Ok(out)
    }

    fn increment_response_count(
        &mut self,
        survey_id: SurveyId,
        updated_at_ms: i64,
    ) -> Result<Option<u64>, StoreError> {
        let id = survey_id.to_string();
        let changed = self.conn.execute(
            "UPDATE surveys SET response_count = response_count + 1, updated_at_ms = ?2 \
             WHERE id=?1",
            params![id, updated_at_ms],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let count = self.conn.query_row(
            "SELECT response_count FROM surveys WHERE id=?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(Some(from_sqlite_count(count)?))
    }
}
