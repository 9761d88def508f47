//! Dialect-aware DDL generation.
//!
//! A [`DdlDialect`] translates abstract [`StructuralOperation`]s into the
//! target store's native DDL. This is the only layer where dialect
//! differences are allowed to leak into.

use ore_schema::operation::StructuralOperation;
use ore_schema::types::{ColumnSchema, LogicalType};

/// Translates structural operations into native DDL statements.
pub trait DdlDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Generates DDL statements for a structural operation.
    ///
    /// Statements beginning with `--` mark operations the dialect cannot
    /// express; executors log and skip them instead of running them.
    fn generate_sql(&self, operation: &StructuralOperation) -> Vec<String>;

    /// Returns the native type name for a logical type.
    fn type_name(&self, logical_type: &LogicalType) -> String;

    /// Quotes an identifier (table name, column name).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Generates a full column definition clause.
    fn column_definition(&self, column: &ColumnSchema) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_name(&column.logical_type),
        ];

        if column.primary_key {
            parts.push("PRIMARY KEY".to_string());
            if column.auto_increment {
                parts.push(self.auto_increment_keyword().to_string());
            }
        }

        if !column.nullable && !column.primary_key {
            parts.push("NOT NULL".to_string());
        }

        if column.unique && !column.primary_key {
            parts.push("UNIQUE".to_string());
        }

        if let Some(default_sql) = column.default.to_sql() {
            parts.push(format!("DEFAULT {default_sql}"));
        }

        if let LogicalType::Enum(values) = &column.logical_type {
            let quoted: Vec<String> = values
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect();
            parts.push(format!(
                "CHECK ({} IN ({}))",
                self.quote_identifier(&column.name),
                quoted.join(", ")
            ));
        }

        parts.join(" ")
    }

    /// Returns the auto-increment keyword for this dialect.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Returns whether this dialect can alter a column in place.
    fn supports_alter_column(&self) -> bool;
}

/// SQLite DDL dialect.
///
/// SQLite cannot alter a column's type or nullability in place; those
/// operations generate comment statements which the executor skips with a
/// warning. A full treatment needs the table-recreation strategy.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DdlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn generate_sql(&self, operation: &StructuralOperation) -> Vec<String> {
        match operation {
            StructuralOperation::CreateTable(schema) => {
                let col_defs: Vec<String> = schema
                    .columns
                    .iter()
                    .map(|c| self.column_definition(c))
                    .collect();
                vec![format!(
                    "CREATE TABLE {} (\n  {}\n)",
                    self.quote_identifier(&schema.name),
                    col_defs.join(",\n  ")
                )]
            }

            StructuralOperation::DropTable { table } => {
                vec![format!(
                    "DROP TABLE IF EXISTS {}",
                    self.quote_identifier(table)
                )]
            }

            StructuralOperation::AddColumn { table, column } => {
                // SQLite refuses to add a NOT NULL column without a
                // constant default (CURRENT_TIMESTAMP is also rejected
                // here); synthesize a zero value of the column's type.
                let mut column = column.clone();
                if !column.nullable && column.default.to_sql().is_none() {
                    if let Some(default) = zero_default(&column.logical_type) {
                        column.default = default;
                    }
                }
                vec![format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    self.quote_identifier(table),
                    self.column_definition(&column)
                )]
            }

            StructuralOperation::DropColumn { table, column } => {
                vec![format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    self.quote_identifier(table),
                    self.quote_identifier(column)
                )]
            }

            StructuralOperation::AlterColumnType { table, column } => {
                vec![format!(
                    "-- ALTER COLUMN not directly supported in SQLite. \
                     Table recreation required for: {}.{}",
                    table, column.name
                )]
            }

            StructuralOperation::AlterColumnNullability { table, column, .. } => {
                vec![format!(
                    "-- ALTER COLUMN not directly supported in SQLite. \
                     Table recreation required for: {table}.{column}"
                )]
            }
        }
    }

    fn type_name(&self, logical_type: &LogicalType) -> String {
        match logical_type {
            LogicalType::String | LogicalType::Enum(_) => "TEXT".to_string(),
            LogicalType::Integer => "INTEGER".to_string(),
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Boolean => "BOOLEAN".to_string(),
            LogicalType::DateTime => "DATETIME".to_string(),
            LogicalType::Binary => "BLOB".to_string(),
            // Preserve the original declaration when recreating.
            LogicalType::Unknown(raw) if !raw.is_empty() => raw.clone(),
            LogicalType::Unknown(_) => "TEXT".to_string(),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn supports_alter_column(&self) -> bool {
        false
    }
}

/// A constant zero value for each logical type, used when SQLite demands a
/// default on an added NOT NULL column. Unknown types get none; the engine
/// never invents values for data it cannot interpret.
fn zero_default(logical_type: &LogicalType) -> Option<ore_schema::types::DefaultValue> {
    use ore_schema::types::DefaultValue;
    match logical_type {
        LogicalType::String | LogicalType::Enum(_) => Some(DefaultValue::String(String::new())),
        LogicalType::Integer => Some(DefaultValue::Integer(0)),
        LogicalType::Float => Some(DefaultValue::Float(0.0)),
        LogicalType::Boolean => Some(DefaultValue::Bool(false)),
        LogicalType::DateTime => Some(DefaultValue::String("1970-01-01 00:00:00".to_string())),
        LogicalType::Binary => Some(DefaultValue::Expression("X''".to_string())),
        LogicalType::Unknown(_) => None,
    }
}
