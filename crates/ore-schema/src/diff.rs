//! Schema reconciliation.
//!
//! Compares a desired [`TableSchema`] (built from a model) against the
//! actual schema read from the store and produces the ordered operations
//! needed to bring the store into agreement. The reconciler only reports;
//! destructive-operation gating is the orchestrator's job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::operation::StructuralOperation;
use crate::types::{LogicalType, TableSchema};

/// How a sync treats an existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncMode {
    /// Create the table if absent; never touch an existing one.
    #[default]
    CreateOnly,
    /// Drop and recreate the table unconditionally.
    Force,
    /// Alter an existing table column-by-column.
    Alter,
}

/// Computes the operations required to transform `actual` into `desired`.
///
/// Ordering guarantees: a missing table yields exactly one `CreateTable`;
/// Force yields exactly `DropTable` then `CreateTable`; under Alter all
/// `AddColumn` operations precede all `AlterColumn*` operations, which
/// precede all `DropColumn` operations, so the table stays queryable at
/// every intermediate step.
///
/// Columns whose actual type is [`LogicalType::Unknown`] are left
/// untouched: the engine refuses to guess about data it cannot interpret.
/// Renames are not detected; a renamed column surfaces as a drop + add
/// pair.
#[must_use]
pub fn diff(
    desired: &TableSchema,
    actual: Option<&TableSchema>,
    mode: SyncMode,
) -> Vec<StructuralOperation> {
    let Some(actual) = actual else {
        return vec![StructuralOperation::CreateTable(desired.clone())];
    };

    match mode {
        SyncMode::Force => vec![
            StructuralOperation::drop_table(&actual.name),
            StructuralOperation::CreateTable(desired.clone()),
        ],
        SyncMode::CreateOnly => Vec::new(),
        SyncMode::Alter => diff_columns(desired, actual),
    }
}

/// Column-by-column diff for Alter mode. Compared by name, never by
/// ordinal position.
fn diff_columns(desired: &TableSchema, actual: &TableSchema) -> Vec<StructuralOperation> {
    let desired_names: BTreeSet<&str> = desired.column_names().collect();
    let actual_names: BTreeSet<&str> = actual.column_names().collect();

    let mut add_ops = Vec::new();
    let mut alter_ops = Vec::new();
    let mut drop_ops = Vec::new();

    // Desired declaration order drives adds and alters.
    for column in &desired.columns {
        if !actual_names.contains(column.name.as_str()) {
            add_ops.push(StructuralOperation::add_column(
                &desired.name,
                column.clone(),
            ));
            continue;
        }

        let current = actual
            .get_column(&column.name)
            .expect("column present in actual name set");

        if matches!(current.logical_type, LogicalType::Unknown(_)) {
            continue;
        }

        let type_changed = !current.logical_type.diff_equivalent(&column.logical_type);
        if type_changed || !current.flags_match(column) {
            alter_ops.push(StructuralOperation::AlterColumnType {
                table: desired.name.clone(),
                column: column.clone(),
            });
        }
        if current.nullable != column.nullable {
            alter_ops.push(StructuralOperation::AlterColumnNullability {
                table: desired.name.clone(),
                column: column.name.clone(),
                nullable: column.nullable,
            });
        }
    }

    for column in &actual.columns {
        if !desired_names.contains(column.name.as_str()) {
            drop_ops.push(StructuralOperation::drop_column(
                &desired.name,
                &column.name,
            ));
        }
    }

    let mut operations = add_ops;
    operations.append(&mut alter_ops);
    operations.append(&mut drop_ops);
    operations
}
