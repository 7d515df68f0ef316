use quiz_core::model::{Question, QuestionId};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    u64::try_from(v)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization("question_id sign overflow".into()))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    Ok(Question {
        id: question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        chapter: row.try_get("chapter").map_err(ser)?,
        question: row.try_get("question").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        is_multiple_choice: row.try_get("is_multiple_choice").map_err(ser)?,
    })
}
