//! Normalized schema representation.
//!
//! These types describe the structure of a table and are used on both sides
//! of reconciliation: the desired schema built from a model definition and
//! the actual schema read back from the store.

use serde::{Deserialize, Serialize};

/// Logical column types shared by model definitions and introspection.
///
/// This is a closed enumeration: anything the store reports that cannot be
/// classified maps to [`LogicalType::Unknown`] instead of failing the call,
/// so callers can treat such columns conservatively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Character data of any length.
    String,
    /// 64-bit integer.
    Integer,
    /// Double-precision floating point.
    Float,
    /// Boolean.
    Boolean,
    /// Date and time with sub-second precision.
    DateTime,
    /// Raw binary data.
    Binary,
    /// Closed set of string values.
    Enum(Vec<String>),
    /// A native type introspection could not classify. Carries the raw
    /// declared type name for diagnostics.
    Unknown(String),
}

impl LogicalType {
    /// Returns whether two logical types are equivalent for diff purposes.
    ///
    /// Enum columns are text-backed on stores without a native enum type,
    /// so an enum attribute introspects back as [`LogicalType::String`];
    /// treating the pair as equal keeps repeated syncs idempotent.
    #[must_use]
    pub fn diff_equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Enum(_), Self::String) | (Self::String, Self::Enum(_)) => true,
            (a, b) => a == b,
        }
    }

    /// Returns whether changing a column from `self` to `to` can discard
    /// or truncate existing values.
    ///
    /// Widening conversions (anything to String, Integer to Float, Boolean
    /// to Integer) are safe; everything else is assumed to narrow. Unknown
    /// types never participate in alteration, so any conversion touching
    /// them is reported as narrowing.
    #[must_use]
    pub fn narrows_to(&self, to: &Self) -> bool {
        if self.diff_equivalent(to) {
            return false;
        }
        !matches!(
            (self, to),
            (_, Self::String)
                | (Self::Integer, Self::Float)
                | (Self::Boolean, Self::Integer)
                | (Self::Boolean, Self::Float)
        )
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value, or `None` if
    /// the column has no default.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Null => Some("NULL".to_string()),
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            Self::Expression(expr) => Some(expr.clone()),
        }
    }
}

/// Schema definition for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Logical data type.
    pub logical_type: LogicalType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: DefaultValue,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Whether this column has a UNIQUE constraint.
    pub unique: bool,
}

impl ColumnSchema {
    /// Creates a new nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: true,
            default: DefaultValue::None,
            primary_key: false,
            auto_increment: false,
            unique: false,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column as the primary key. Primary keys are always NOT NULL.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the column as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Returns whether the constraint flags (primary key, auto-increment,
    /// unique) match another column's.
    #[must_use]
    pub fn flags_match(&self, other: &Self) -> bool {
        self.primary_key == other.primary_key
            && self.auto_increment == other.auto_increment
            && self.unique == other.unique
    }
}

/// Normalized schema for a table: its name and ordered columns.
///
/// Both the desired side (built from a model) and the actual side (read
/// from the store) use this representation, compared by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Creates a new table schema with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: ColumnSchema) -> Self {
        self.columns.push(column);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
