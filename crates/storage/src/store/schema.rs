#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

pub(crate) const SCHEMA_VERSION: &str = "1";

const REQUIRED_TABLES: [&str; 5] = ["meta", "surveys", "questions", "submissions", "answers"];

/// Refuses to open a database written by an incompatible schema.
pub(crate) fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }
    if !tables.contains("meta") {
        return Err(StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION.to_string(),
            found: "<no meta table>".to_string(),
        });
    }

    let version = conn
        .query_row(
            "SELECT value FROM meta WHERE key='schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match version {
        Some(v) if v == SCHEMA_VERSION => {}
        Some(v) => {
            return Err(StoreError::SchemaMismatch {
                expected: SCHEMA_VERSION.to_string(),
                found: v,
            });
        }
        None => {
            return Err(StoreError::SchemaMismatch {
                expected: SCHEMA_VERSION.to_string(),
                found: "<missing>".to_string(),
            });
        }
    }

    if REQUIRED_TABLES.iter().any(|table| !tables.contains(*table)) {
        return Err(StoreError::Corrupt(
            "required table is missing".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS surveys (
          id TEXT PRIMARY KEY,
          description TEXT NOT NULL,
          response_count INTEGER NOT NULL DEFAULT 0 CHECK(response_count >= 0),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_surveys_created
          ON surveys(created_at_ms, id);

        CREATE TABLE IF NOT EXISTS questions (
          id TEXT PRIMARY KEY,
          survey_id TEXT NOT NULL,
          position INTEGER NOT NULL,
          text TEXT NOT NULL,
          response_options_json TEXT NOT NULL,
          UNIQUE(survey_id, position),
          FOREIGN KEY(survey_id) REFERENCES surveys(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS submissions (
          id TEXT PRIMARY KEY,
          survey_id TEXT NOT NULL,
          submitted_at_ms INTEGER NOT NULL,
          FOREIGN KEY(survey_id) REFERENCES surveys(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_submissions_survey
          ON submissions(survey_id, submitted_at_ms);

        CREATE TABLE IF NOT EXISTS answers (
          id TEXT PRIMARY KEY,
          submission_id TEXT NOT NULL,
          question_id TEXT NOT NULL,
          answer TEXT NOT NULL,
          FOREIGN KEY(submission_id) REFERENCES submissions(id) ON DELETE CASCADE,
          FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_answers_submission
          ON answers(submission_id);
        CREATE INDEX IF NOT EXISTS idx_answers_question
          ON answers(question_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}
