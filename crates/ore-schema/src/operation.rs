//! Structural operations.
//!
//! The reconciler's output vocabulary: every change the engine can ask a
//! store to make is one of these variants. Execution and dialect concerns
//! live elsewhere; this module only describes structure changes and
//! classifies which ones can destroy data.

use serde::{Deserialize, Serialize};

use crate::types::{ColumnSchema, LogicalType, TableSchema};

/// A single structural change to bring a table toward its desired schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuralOperation {
    /// Create a table with the full desired schema.
    CreateTable(TableSchema),

    /// Drop a table wholesale.
    DropTable {
        /// Table name.
        table: String,
    },

    /// Add a column to an existing table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: ColumnSchema,
    },

    /// Drop a column from a table. Inherently destructive.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Re-type a column (also carries constraint-flag changes). The full
    /// desired column definition travels with the operation.
    AlterColumnType {
        /// Table name.
        table: String,
        /// Desired column definition.
        column: ColumnSchema,
    },

    /// Change a column's nullability.
    AlterColumnNullability {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Whether the column should allow NULL.
        nullable: bool,
    },
}

impl StructuralOperation {
    /// Creates a drop table operation.
    #[must_use]
    pub fn drop_table(table: impl Into<String>) -> Self {
        Self::DropTable {
            table: table.into(),
        }
    }

    /// Creates an add column operation.
    #[must_use]
    pub fn add_column(table: impl Into<String>, column: ColumnSchema) -> Self {
        Self::AddColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates a drop column operation.
    #[must_use]
    pub fn drop_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DropColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Returns the name of the table this operation targets.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable(schema) => &schema.name,
            Self::DropTable { table }
            | Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::AlterColumnType { table, .. }
            | Self::AlterColumnNullability { table, .. } => table,
        }
    }

    /// Returns whether this operation can discard existing data.
    ///
    /// Dropping a table or column always can. A type alteration is
    /// destructive when the actual column's current type narrows into the
    /// desired one; `actual` supplies that current type, and when the
    /// current column cannot be found the alteration is treated as
    /// destructive.
    #[must_use]
    pub fn is_destructive(&self, actual: Option<&TableSchema>) -> bool {
        match self {
            Self::CreateTable(_) | Self::AddColumn { .. } => false,
            Self::DropTable { .. } | Self::DropColumn { .. } => true,
            Self::AlterColumnType { column, .. } => actual
                .and_then(|schema| schema.get_column(&column.name))
                .map_or(true, |current| {
                    current.logical_type.narrows_to(&column.logical_type)
                }),
            // Forbidding NULL on a column that may hold NULLs is a
            // constraint tightening, not data loss.
            Self::AlterColumnNullability { .. } => false,
        }
    }

    /// Renders a short human-readable summary for logs and reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateTable(schema) => {
                format!("create table {} ({} columns)", schema.name, schema.columns.len())
            }
            Self::DropTable { table } => format!("drop table {table}"),
            Self::AddColumn { table, column } => {
                format!("add column {}.{}", table, column.name)
            }
            Self::DropColumn { table, column } => format!("drop column {table}.{column}"),
            Self::AlterColumnType { table, column } => {
                format!("alter column {}.{} type", table, column.name)
            }
            Self::AlterColumnNullability {
                table,
                column,
                nullable,
            } => format!(
                "alter column {table}.{column} {}",
                if *nullable { "drop not null" } else { "set not null" }
            ),
        }
    }
}

/// Returns whether any operation in the plan is destructive against the
/// given actual schema.
#[must_use]
pub fn any_destructive(plan: &[StructuralOperation], actual: Option<&TableSchema>) -> bool {
    plan.iter().any(|op| op.is_destructive(actual))
}
