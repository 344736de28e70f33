use assess_core::model::{DiagnosticConfig, DiagnosticId};

use super::SqliteRepository;
use super::mapping::{conn, map_diagnostic_row, to_json};
use crate::repository::{DiagnosticRepository, StorageError};

#[async_trait::async_trait]
impl DiagnosticRepository for SqliteRepository {
    async fn get_diagnostic(&self, id: &DiagnosticId) -> Result<DiagnosticConfig, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, title, description, group_name,
                       teacher_name, teacher_user_id, topics_json
                FROM diagnostics
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_diagnostic_row(&row)
    }

    async fn upsert_diagnostic(&self, config: &DiagnosticConfig) -> Result<(), StorageError> {
        let topics_json = to_json(&config.topics)?;
        sqlx::query(
            r"
                INSERT INTO diagnostics (
                    id, title, description, group_name,
                    teacher_name, teacher_user_id, topics_json
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    group_name = excluded.group_name,
                    teacher_name = excluded.teacher_name,
                    teacher_user_id = excluded.teacher_user_id,
                    topics_json = excluded.topics_json
            ",
        )
        .bind(config.id.as_str())
        .bind(&config.title)
        .bind(&config.description)
        .bind(&config.group)
        .bind(&config.teacher.name)
        .bind(config.teacher.user_id.as_str())
        .bind(topics_json)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
