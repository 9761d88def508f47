//! DDL execution.
//!
//! The orchestrator applies structural operations one at a time through a
//! [`DdlExecutor`]. Implementations translate each operation via a
//! [`DdlDialect`] and run the resulting statements against the store.

use sqlx::sqlite::SqlitePool;
use tracing::{debug, warn};

use ore_schema::operation::StructuralOperation;

use crate::dialect::{DdlDialect, SqliteDialect};
use crate::error::Result;

/// Executes a single structural operation against a store.
#[allow(async_fn_in_trait)]
pub trait DdlExecutor {
    /// Executes one operation. Implementations must not reorder or batch;
    /// callers depend on one-at-a-time application.
    async fn execute(&self, operation: &StructuralOperation) -> Result<()>;
}

/// SQLite DDL executor over a connection pool.
pub struct SqliteExecutor<D: DdlDialect = SqliteDialect> {
    pool: SqlitePool,
    dialect: D,
}

impl SqliteExecutor {
    /// Creates an executor with the default SQLite dialect.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            dialect: SqliteDialect::new(),
        }
    }
}

impl<D: DdlDialect> SqliteExecutor<D> {
    /// Creates an executor with a custom dialect.
    #[must_use]
    pub fn with_dialect(pool: SqlitePool, dialect: D) -> Self {
        Self { pool, dialect }
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &D {
        &self.dialect
    }
}

impl<D: DdlDialect> DdlExecutor for SqliteExecutor<D> {
    async fn execute(&self, operation: &StructuralOperation) -> Result<()> {
        for sql in self.dialect.generate_sql(operation) {
            if sql.starts_with("--") {
                warn!(comment = %sql, "skipping unsupported operation");
                continue;
            }
            debug!(sql = %sql, "executing DDL");
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }
}
