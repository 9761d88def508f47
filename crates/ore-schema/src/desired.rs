//! Desired-schema construction.
//!
//! Converts a finalized [`ModelDefinition`] into the normalized
//! [`TableSchema`] the reconciler compares against introspection output.
//! Deterministic and store-free: attributes map in declaration order, then
//! the timestamp columns are appended per policy.

use crate::model::{AttributeDefinition, ModelDefinition};
use crate::types::{ColumnSchema, DefaultValue, LogicalType, TableSchema};

/// Builds the desired table schema for a model.
///
/// Timestamp columns are DATETIME NOT NULL with no store-side default;
/// they are stamped at the application layer. A declared attribute that
/// already uses a timestamp column's name wins over the implicit column.
#[must_use]
pub fn desired_schema(model: &ModelDefinition) -> TableSchema {
    let mut table = TableSchema::new(model.table_name());
    for attribute in model.attributes() {
        table = table.column(attribute_column(attribute));
    }

    let policy = model.timestamps();
    for name in [policy.created_column(), policy.updated_column()]
        .into_iter()
        .flatten()
    {
        if table.get_column(name).is_none() {
            table = table.column(ColumnSchema::new(name, LogicalType::DateTime).not_null());
        }
    }
    table
}

fn attribute_column(attribute: &AttributeDefinition) -> ColumnSchema {
    ColumnSchema {
        name: attribute.name.clone(),
        logical_type: attribute.logical_type.clone(),
        nullable: attribute.nullable,
        default: attribute.default.clone(),
        primary_key: attribute.primary_key,
        auto_increment: attribute.auto_increment,
        unique: attribute.unique,
    }
}
