//! Error types for synchronization.

use ore_schema::model::DefinitionError;
use ore_schema::operation::StructuralOperation;

/// Errors that can occur while synchronizing models against a store.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The safety pattern did not match the target database identifier.
    /// Nothing was applied.
    #[error("safety check failed: pattern '{pattern}' does not match database '{database}'")]
    SafetyCheckFailed {
        /// The target database identifier.
        database: String,
        /// The pattern that was evaluated.
        pattern: String,
    },

    /// A DDL operation failed partway through a sync. Operations before
    /// `index` were applied and are NOT rolled back; DDL is frequently
    /// non-transactional across stores.
    #[error("DDL failed on '{table}' at operation {index} ({}) after {applied} applied: {source}", .operation.describe())]
    DdlFailed {
        /// Table being synchronized.
        table: String,
        /// Index of the failing operation within the plan.
        index: usize,
        /// Number of operations successfully applied before the failure.
        applied: usize,
        /// The operation that failed.
        operation: StructuralOperation,
        /// The underlying store error.
        #[source]
        source: sqlx::Error,
    },

    /// Database error outside of DDL application (introspection queries).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid model input.
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Multiple per-model failures collected by a continue-on-error batch.
    #[error("{} model(s) failed to sync:\n{}", .0.len(), .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<SyncError>),
}

impl SyncError {
    /// The number of operations applied before this error, when the error
    /// occurred mid-application. Zero for errors with no side effects.
    #[must_use]
    pub fn applied_operations(&self) -> usize {
        match self {
            Self::DdlFailed { applied, .. } => *applied,
            _ => 0,
        }
    }
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
