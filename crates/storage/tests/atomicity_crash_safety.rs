#![forbid(unsafe_code)]

use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use survey_core::{ErrorKind, QuestionDraft, SurveyDraft};
use survey_storage::SqliteStore;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("survey_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn raw_conn(dir: &Path) -> Connection {
    Connection::open(dir.join("survey.db")).expect("open raw db")
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(1) FROM {table}"), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}

#[test]
fn create_rolls_back_when_a_later_question_insert_fails() {
    let dir = temp_dir("create_rolls_back");
    let mut store = SqliteStore::open(&dir).expect("open store");
    raw_conn(&dir)
        .execute_batch(
            "CREATE TRIGGER fail_question BEFORE INSERT ON questions \
             WHEN NEW.text = 'boom' \
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .expect("install trigger");

    let err = store
        .create_survey(SurveyDraft {
            description: "half written".to_string(),
            questions: vec![
                QuestionDraft::new("fine"),
                QuestionDraft::new("also fine"),
                QuestionDraft::new("boom"),
            ],
        })
        .expect_err("trigger must abort the create");
    assert_eq!(err.kind(), ErrorKind::Internal);

    let conn = raw_conn(&dir);
    assert_eq!(count(&conn, "surveys"), 0);
    assert_eq!(count(&conn, "questions"), 0);
    assert!(store.list_surveys().expect("list").is_empty());
}

#[test]
fn blank_question_text_persists_nothing() {
    let dir = temp_dir("blank_question");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let err = store
        .create_survey(SurveyDraft {
            description: "blank".to_string(),
            questions: vec![QuestionDraft::new("ok"), QuestionDraft::new("   ")],
        })
        .expect_err("blank text must be rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let conn = raw_conn(&dir);
    assert_eq!(count(&conn, "surveys"), 0);
    assert_eq!(count(&conn, "questions"), 0);
}

#[test]
fn submit_rolls_back_when_an_answer_insert_fails() {
    let dir = temp_dir("submit_rolls_back");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let created = store
        .create_survey(SurveyDraft {
            description: "pulse".to_string(),
            questions: vec![QuestionDraft::new("mood"), QuestionDraft::new("energy")],
        })
        .expect("create survey");
    raw_conn(&dir)
        .execute_batch(
            "CREATE TRIGGER fail_answer BEFORE INSERT ON answers \
             WHEN NEW.answer = 'boom' \
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .expect("install trigger");

    let mut answers = BTreeMap::new();
    answers.insert(created.questions[0].id, "2".to_string());
    answers.insert(created.questions[1].id, "boom".to_string());
    let err = store
        .submit(created.survey.id, &answers)
        .expect_err("trigger must abort the submit");
    assert_eq!(err.kind(), ErrorKind::Internal);

    let conn = raw_conn(&dir);
    assert_eq!(count(&conn, "submissions"), 0);
    assert_eq!(count(&conn, "answers"), 0);
    let survey = store
        .get_survey(created.survey.id)
        .expect("get survey")
        .survey;
    assert_eq!(survey.response_count, 0);
    assert_eq!(survey.updated_at_ms, created.survey.updated_at_ms);
}

#[test]
fn rejected_submission_leaves_no_rows() {
    let dir = temp_dir("rejected_submission");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let first = store
        .create_survey(SurveyDraft {
            description: "first".to_string(),
            questions: vec![QuestionDraft::new("q1")],
        })
        .expect("create first");
    let second = store
        .create_survey(SurveyDraft {
            description: "second".to_string(),
            questions: vec![QuestionDraft::new("q2")],
        })
        .expect("create second");

    let mut answers = BTreeMap::new();
    answers.insert(first.questions[0].id, "1".to_string());
    answers.insert(second.questions[0].id, "1".to_string());
    let err = store
        .submit(first.survey.id, &answers)
        .expect_err("mixed survey answers must be rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let conn = raw_conn(&dir);
    assert_eq!(count(&conn, "submissions"), 0);
    assert_eq!(count(&conn, "answers"), 0);
}

#[test]
fn store_recovers_after_a_failed_write() {
    let dir = temp_dir("recovers_after_failure");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let _ = store
        .create_survey(SurveyDraft {
            description: "bad".to_string(),
            questions: vec![QuestionDraft::new("")],
        })
        .expect_err("empty text must be rejected");

    let created = store
        .create_survey(SurveyDraft {
            description: "good".to_string(),
            questions: vec![QuestionDraft::new("q")],
        })
        .expect("store stays usable");
    assert_eq!(
        store.list_surveys().expect("list"),
        vec![created.survey]
    );
}
