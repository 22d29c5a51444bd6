#![forbid(unsafe_code)]

mod error;
mod repo;
mod schema;

pub use error::StoreError;

use repo::TxRepository;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use survey_core::{
    QuestionId, Survey, SurveyDetail, SurveyDraft, SurveyError, SurveyId, SurveyResults,
};
use time::OffsetDateTime;
use tracing::debug;

const DB_FILE_NAME: &str = "survey.db";

#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// How long a connection waits for another writer before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// SQLite-backed survey store.
///
/// Every public operation runs in its own transaction: writes take the
/// database write lock up front (`BEGIN IMMEDIATE`), reads see one snapshot.
/// An operation that returns an error leaves the database untouched.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(storage_dir, StoreOptions::default())
    }

    pub fn open_with(
        storage_dir: impl AsRef<Path>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA synchronous=NORMAL;\n\
             PRAGMA foreign_keys=ON;",
        )?;

        schema::preflight_gate(&conn)?;
        schema::install_schema(&conn)?;
        debug!(path = %db_path.display(), "survey store opened");

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn create_survey(&mut self, draft: SurveyDraft) -> Result<SurveyDetail, SurveyError> {
        let now_ms = now_ms();
        let tx = self.write_tx()?;
        run_in_tx(tx, |repo| survey_core::create_survey(repo, draft, now_ms))
    }

    pub fn submit(
        &mut self,
        survey_id: SurveyId,
        answers: &BTreeMap<QuestionId, String>,
    ) -> Result<(), SurveyError> {
        let now_ms = now_ms();
        let tx = self.write_tx()?;
        run_in_tx(tx, |repo| survey_core::submit(repo, survey_id, answers, now_ms))
    }

    pub fn delete_survey(&mut self, survey_id: SurveyId) -> Result<(), SurveyError> {
        let tx = self.write_tx()?;
        run_in_tx(tx, |repo| survey_core::delete_survey(repo, survey_id))
    }

    pub fn compute_results(&self, survey_id: SurveyId) -> Result<SurveyResults, SurveyError> {
        let tx = self.read_tx()?;
        run_in_tx(tx, |repo| survey_core::compute_results(&*repo, survey_id))
    }

    pub fn get_survey(&self, survey_id: SurveyId) -> Result<SurveyDetail, SurveyError> {
        let tx = self.read_tx()?;
        run_in_tx(tx, |repo| survey_core::get_survey(&*repo, survey_id))
    }

    pub fn list_surveys(&self) -> Result<Vec<Survey>, SurveyError> {
        let tx = self.read_tx()?;
        run_in_tx(tx, |repo| survey_core::list_surveys(&*repo))
    }

    fn write_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    fn read_tx(&self) -> Result<Transaction<'_>, StoreError> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

/// Runs `op` against the transaction and commits only when it succeeds.
/// Dropping an uncommitted transaction rolls it back.
fn run_in_tx<T, F>(tx: Transaction<'_>, op: F) -> Result<T, SurveyError>
where
    F: FnOnce(&mut TxRepository<'_>) -> Result<T, SurveyError>,
{
    let outcome = {
        let mut repo = TxRepository::new(&tx);
        op(&mut repo)
    };
    match outcome {
        Ok(value) => {
            tx.commit().map_err(StoreError::from)?;
            Ok(value)
        }
        Err(err) => {
            debug!(error = %err, "transaction rolled back");
            Err(err)
        }
    }
}

fn now_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    i64::try_from(ms.max(0)).unwrap_or(i64::MAX)
}
