//! Live schema introspection.
//!
//! Reads the actual structure of a named table from the store and maps it
//! into the shared [`TableSchema`] representation. An absent table is a
//! valid outcome (`Ok(None)`), not an error, and native types that cannot
//! be classified surface as [`LogicalType::Unknown`] so the reconciler can
//! treat them conservatively. Introspection is read-only.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::debug;

use ore_schema::types::{ColumnSchema, DefaultValue, LogicalType, TableSchema};

use crate::error::Result;

/// Reads the actual schema of a table from a live store.
#[allow(async_fn_in_trait)]
pub trait SchemaIntrospector {
    /// Describes the named table, or returns `None` if it does not exist.
    async fn describe(&self, table: &str) -> Result<Option<TableSchema>>;
}

/// SQLite schema introspection over a connection pool.
#[derive(Debug, Clone)]
pub struct SqliteIntrospector {
    pool: SqlitePool,
}

impl SqliteIntrospector {
    /// Creates a new introspector.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the stored `CREATE TABLE` statement, if the table exists.
    async fn table_sql(&self, table: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(sql,)| sql))
    }

    /// Marks columns covered by a single-column unique index as unique.
    async fn apply_unique_indexes(&self, table: &str, schema: &mut TableSchema) -> Result<()> {
        let indexes = sqlx::query(&format!("PRAGMA index_list({})", quote_ident(table)))
            .fetch_all(&self.pool)
            .await?;

        for index in indexes {
            let is_unique: i64 = index.get("unique");
            if is_unique == 0 {
                continue;
            }
            let name: String = index.get("name");
            let columns = sqlx::query(&format!("PRAGMA index_info({})", quote_ident(&name)))
                .fetch_all(&self.pool)
                .await?;
            // Multi-column unique indexes have no single-column equivalent
            // in the normalized representation and are skipped.
            if columns.len() != 1 {
                continue;
            }
            let column_name: String = columns[0].get("name");
            if let Some(column) = schema
                .columns
                .iter_mut()
                .find(|c| c.name == column_name)
            {
                column.unique = true;
            }
        }
        Ok(())
    }
}

impl SchemaIntrospector for SqliteIntrospector {
    async fn describe(&self, table: &str) -> Result<Option<TableSchema>> {
        let Some(create_sql) = self.table_sql(table).await? else {
            debug!(table = %table, "table absent");
            return Ok(None);
        };
        let has_autoincrement = create_sql.to_uppercase().contains("AUTOINCREMENT");

        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(table)))
            .fetch_all(&self.pool)
            .await?;

        let mut schema = TableSchema::new(table);
        for row in rows {
            let name: String = row.get("name");
            let declared: String = row.get("type");
            let not_null: i64 = row.get("notnull");
            let default: Option<String> = row.get("dflt_value");
            let pk: i64 = row.get("pk");

            let primary_key = pk > 0;
            schema.columns.push(ColumnSchema {
                name,
                logical_type: map_declared_type(&declared),
                // SQLite reports INTEGER PRIMARY KEY columns as nullable;
                // normalize to the model-side convention.
                nullable: not_null == 0 && !primary_key,
                default: map_default(default.as_deref()),
                primary_key,
                auto_increment: primary_key && has_autoincrement,
                unique: false,
            });
        }

        self.apply_unique_indexes(table, &mut schema).await?;

        debug!(table = %table, columns = schema.columns.len(), "introspected table");
        Ok(Some(schema))
    }
}

/// Quotes an identifier for interpolation into a PRAGMA statement, which
/// cannot take bound parameters.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Maps a declared SQLite column type to the shared logical type.
///
/// Follows SQLite's affinity-style substring rules on the declared name;
/// anything unrecognized becomes [`LogicalType::Unknown`] carrying the raw
/// declaration.
fn map_declared_type(declared: &str) -> LogicalType {
    let upper = declared.to_uppercase();
    let base = upper.split('(').next().unwrap_or("").trim().to_string();

    if base.contains("BOOL") {
        return LogicalType::Boolean;
    }
    if base.contains("DATETIME") || base.contains("TIMESTAMP") || base == "DATE" || base == "TIME" {
        return LogicalType::DateTime;
    }
    if base.contains("INT") {
        return LogicalType::Integer;
    }
    if base.contains("CHAR") || base.contains("TEXT") || base.contains("CLOB") {
        return LogicalType::String;
    }
    if base.contains("BLOB") || base.contains("BINARY") {
        return LogicalType::Binary;
    }
    if base.contains("REAL")
        || base.contains("FLOA")
        || base.contains("DOUB")
        || base.contains("NUMERIC")
        || base.contains("DECIMAL")
    {
        return LogicalType::Float;
    }
    LogicalType::Unknown(declared.to_string())
}

/// Normalizes a raw `dflt_value` into the shared default representation.
fn map_default(raw: Option<&str>) -> DefaultValue {
    let Some(raw) = raw else {
        return DefaultValue::None;
    };
    if raw.eq_ignore_ascii_case("NULL") {
        return DefaultValue::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return DefaultValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return DefaultValue::Float(f);
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return DefaultValue::String(raw[1..raw.len() - 1].replace("''", "'"));
    }
    DefaultValue::Expression(raw.to_string())
}
