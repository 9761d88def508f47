//! # ore-sync
//!
//! The runtime half of the ore-orm synchronization engine: live schema
//! introspection, dialect-aware DDL execution, the sync orchestrator with
//! its destructive-operation safety gate, and the application-layer
//! timestamp lifecycle.
//!
//! # Architecture
//!
//! - **Introspector** - reads a table's actual structure from the store
//! - **Dialect** - translates structural operations into native DDL
//! - **Executor** - runs DDL statements, one operation at a time
//! - **Synchronizer** - introspect, diff, gate, apply; per model or batch
//! - **Timestamps** - pre-persistence stamping of created/updated attributes
//!
//! The store connection's lifecycle belongs to the caller; this crate
//! keeps no private metadata store, so the live catalog is always the
//! single source of truth for what exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use ore_schema::prelude::*;
//! use ore_sync::prelude::*;
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! let pool = SqlitePoolOptions::new().connect("app.db").await?;
//! let sync = Synchronizer::new(
//!     SqliteIntrospector::new(pool.clone()),
//!     SqliteExecutor::new(pool),
//!     "app.db",
//! );
//!
//! let person = ModelDefinition::builder("Person")
//!     .attribute(AttributeDefinition::new("id", LogicalType::Integer).primary_key())
//!     .build()?;
//!
//! let report = sync.sync(&person, &SyncOptions::new()).await?;
//! assert_eq!(report.table, "People");
//! ```

pub mod dialect;
pub mod error;
pub mod executor;
pub mod introspect;
pub mod sync;
pub mod timestamps;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{DdlDialect, SqliteDialect};
    pub use crate::error::{Result, SyncError};
    pub use crate::executor::{DdlExecutor, SqliteExecutor};
    pub use crate::introspect::{SchemaIntrospector, SqliteIntrospector};
    pub use crate::sync::{BatchReport, SyncOptions, SyncReport, Synchronizer};
    pub use crate::timestamps::{stamp, timestamp_assignments, PersistKind, TimestampWrite};
}
