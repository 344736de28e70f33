use assess_core::model::{DiagnosticId, DiagnosticResult, PriorResult, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, from_json, ser, to_json};
use crate::repository::{ResultRepository, StorageError};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn find_result(
        &self,
        diagnostic_id: &DiagnosticId,
        user_id: &UserId,
    ) -> Result<PriorResult, StorageError> {
        let row = sqlx::query(
            r"
                SELECT payload_json
                FROM diagnostic_results
                WHERE diagnostic_id = ?1 AND student_user_id = ?2
            ",
        )
        .bind(diagnostic_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(PriorResult::none());
        };
        let payload: String = row.try_get("payload_json").map_err(ser)?;
        let result: DiagnosticResult = from_json("payload_json", &payload)?;
        Ok(PriorResult::found(result))
    }

    async fn submit_result(&self, result: &DiagnosticResult) -> Result<(), StorageError> {
        let payload = to_json(result)?;
        sqlx::query(
            r"
                INSERT INTO diagnostic_results (
                    diagnostic_id, student_user_id, rating,
                    good_answers, wrong_answers, payload_json, submitted_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(diagnostic_id, student_user_id) DO UPDATE SET
                    rating = excluded.rating,
                    good_answers = excluded.good_answers,
                    wrong_answers = excluded.wrong_answers,
                    payload_json = excluded.payload_json,
                    submitted_at = excluded.submitted_at
            ",
        )
        .bind(result.diagnostic_id.as_str())
        .bind(result.student.user_id.as_str())
        .bind(result.rating.label())
        .bind(i64::from(result.good_answers))
        .bind(i64::from(result.wrong_answers))
        .bind(payload)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tracing::debug!(
            diagnostic = %result.diagnostic_id,
            student = %result.student.user_id,
            "stored diagnostic result"
        );
        Ok(())
    }
}
