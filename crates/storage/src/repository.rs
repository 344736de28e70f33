use assess_core::model::{DiagnosticConfig, DiagnosticId, DiagnosticResult, PriorResult, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to assessment content.
#[async_trait]
pub trait DiagnosticRepository: Send + Sync {
    /// Fetch a diagnostic, with its topics and exercises.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_diagnostic(&self, id: &DiagnosticId) -> Result<DiagnosticConfig, StorageError>;

    /// Persist or replace a diagnostic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the diagnostic cannot be stored.
    async fn upsert_diagnostic(&self, config: &DiagnosticConfig) -> Result<(), StorageError>;
}

/// Lookup and submission of assessment results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Look up the result a student already submitted for a diagnostic.
    ///
    /// A missing result is `PriorResult { exists: false, .. }`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup itself fails.
    async fn find_result(
        &self,
        diagnostic_id: &DiagnosticId,
        user_id: &UserId,
    ) -> Result<PriorResult, StorageError>;

    /// Store a result. Resubmitting for the same diagnostic and student replaces it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn submit_result(&self, result: &DiagnosticResult) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    diagnostics: Arc<Mutex<HashMap<DiagnosticId, DiagnosticConfig>>>,
    results: Arc<Mutex<HashMap<(DiagnosticId, UserId), DiagnosticResult>>>,
    submissions: Arc<Mutex<SubmissionLog>>,
}

#[derive(Default)]
struct SubmissionLog {
    attempts: usize,
    failures_left: usize,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` submissions fail with a connection error.
    pub fn fail_next_submissions(&self, count: usize) {
        if let Ok(mut log) = self.submissions.lock() {
            log.failures_left = count;
        }
    }

    /// Number of submissions attempted so far, failed ones included.
    #[must_use]
    pub fn submission_attempts(&self) -> usize {
        self.submissions.lock().map(|log| log.attempts).unwrap_or(0)
    }
}

#[async_trait]
impl DiagnosticRepository for InMemoryRepository {
    async fn get_diagnostic(&self, id: &DiagnosticId) -> Result<DiagnosticConfig, StorageError> {
        let guard = self
            .diagnostics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_diagnostic(&self, config: &DiagnosticConfig) -> Result<(), StorageError> {
        let mut guard = self
            .diagnostics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(config.id.clone(), config.clone());
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn find_result(
        &self,
        diagnostic_id: &DiagnosticId,
        user_id: &UserId,
    ) -> Result<PriorResult, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&(diagnostic_id.clone(), user_id.clone()))
            .cloned()
            .map_or_else(PriorResult::none, PriorResult::found))
    }

    async fn submit_result(&self, result: &DiagnosticResult) -> Result<(), StorageError> {
        {
            let mut log = self
                .submissions
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            log.attempts += 1;
            if log.failures_left > 0 {
                log.failures_left -= 1;
                return Err(StorageError::Connection("injected failure".into()));
            }
        }

        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (
                result.diagnostic_id.clone(),
                result.student.user_id.clone(),
            ),
            result.clone(),
        );
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub diagnostics: Arc<dyn DiagnosticRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let diagnostics: Arc<dyn DiagnosticRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self {
            diagnostics,
            results,
        }
    }
}
