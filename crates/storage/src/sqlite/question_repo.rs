use quiz_core::model::{Question, ValidatedQuestion};

use super::{SqliteRepository, mapping::map_question_row};
use crate::repository::{QuestionRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self, chapter: Option<&str>) -> Result<Vec<Question>, StorageError> {
        let rows = match chapter {
            Some(chapter) => {
                sqlx::query(
                    r"
                    SELECT id, chapter, question, answer, is_multiple_choice
                    FROM questions
                    WHERE chapter = ?1
                    ORDER BY id ASC
                    ",
                )
                .bind(chapter)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, chapter, question, answer, is_multiple_choice
                    FROM questions
                    ORDER BY id ASC
                    ",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(conn)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn replace_all(&self, questions: Vec<ValidatedQuestion>) -> Result<usize, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for q in &questions {
            sqlx::query(
                r"
                INSERT INTO questions (chapter, question, answer, is_multiple_choice)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(q.chapter.as_str())
            .bind(q.question.as_str())
            .bind(q.answer.as_str())
            .bind(q.is_multiple_choice)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(questions.len())
    }
}
