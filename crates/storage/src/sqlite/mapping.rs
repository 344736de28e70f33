use assess_core::model::{DiagnosticConfig, DiagnosticId, Identity, Topic};
use serde::{Serialize, de::DeserializeOwned};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(ser)
}

pub(crate) fn from_json<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(format!("{field}: {e}")))
}

pub(crate) fn map_diagnostic_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<DiagnosticConfig, StorageError> {
    let topics_json: String = row.try_get("topics_json").map_err(ser)?;
    let topics: Vec<Topic> = from_json("topics_json", &topics_json)?;

    Ok(DiagnosticConfig {
        id: DiagnosticId::new(row.try_get::<String, _>("id").map_err(ser)?),
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        group: row.try_get("group_name").map_err(ser)?,
        teacher: Identity::new(
            row.try_get::<String, _>("teacher_name").map_err(ser)?,
            row.try_get::<String, _>("teacher_user_id").map_err(ser)?,
        ),
        topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_json_reports_the_field() {
        let err = from_json::<Vec<Topic>>("topics_json", "{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg.starts_with("topics_json")));
    }
}
