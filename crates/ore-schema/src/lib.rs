//! # ore-schema
//!
//! Store-agnostic core of the ore-orm synchronization engine: declarative
//! model definitions, table-name inference, the normalized schema
//! representation, and the reconciler that computes which structural
//! operations a store needs to match a model.
//!
//! Nothing in this crate performs I/O. Introspection, DDL generation, and
//! execution live in `ore-sync`.
//!
//! ## Quick start
//!
//! ```
//! use ore_schema::prelude::*;
//!
//! let person = ModelDefinition::builder("Person")
//!     .attribute(
//!         AttributeDefinition::new("id", LogicalType::Integer)
//!             .primary_key()
//!             .auto_increment(),
//!     )
//!     .attribute(AttributeDefinition::new("firstName", LogicalType::String).not_null())
//!     .build()
//!     .unwrap();
//!
//! // "Person" pluralizes to "People".
//! assert_eq!(person.table_name(), "People");
//!
//! // A missing table reconciles to a single CreateTable.
//! let desired = desired_schema(&person);
//! let plan = diff(&desired, None, SyncMode::Alter);
//! assert_eq!(plan.len(), 1);
//! ```

pub mod desired;
pub mod diff;
pub mod inflect;
pub mod model;
pub mod operation;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::desired::desired_schema;
    pub use crate::diff::{diff, SyncMode};
    pub use crate::inflect::{pluralize, resolve_table_name};
    pub use crate::model::{
        AttributeDefinition, DefinitionError, ModelDefaults, ModelDefinition,
        ModelDefinitionBuilder, ModelRegistry, TimestampPolicy,
    };
    pub use crate::operation::{any_destructive, StructuralOperation};
    pub use crate::types::{ColumnSchema, DefaultValue, LogicalType, TableSchema};
}
