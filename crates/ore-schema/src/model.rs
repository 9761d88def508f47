//! Model definitions.
//!
//! A model is a named, declarative description of an entity's attributes,
//! independent of any live table. Models are built once through
//! [`ModelDefinitionBuilder`] and are read-only afterward; the physical
//! table name is resolved at build time and cached, never recomputed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inflect::resolve_table_name;
use crate::types::{DefaultValue, LogicalType};

/// Errors raised while defining models or registering them.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Two attributes on the same model share a name.
    #[error("model '{model}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        /// Model name.
        model: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// A model with this name is already registered.
    #[error("model '{0}' is already registered")]
    DuplicateModel(String),

    /// A model declared no attributes.
    #[error("model '{0}' has no attributes")]
    EmptyModel(String),
}

/// A single declared attribute of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name (becomes the column name).
    pub name: String,
    /// Logical data type.
    pub logical_type: LogicalType,
    /// Whether the attribute allows NULL.
    pub nullable: bool,
    /// Default value.
    pub default: DefaultValue,
    /// Whether this attribute is the primary key.
    pub primary_key: bool,
    /// Whether this attribute auto-increments.
    pub auto_increment: bool,
    /// Whether this attribute is unique.
    pub unique: bool,
}

impl AttributeDefinition {
    /// Creates a new nullable attribute with no default.
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

    /// Sets the attribute as NOT NULL.
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

    /// Sets the attribute as the primary key. Primary keys are NOT NULL.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the attribute to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the attribute as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Controls the automatic creation/update timestamp attributes.
///
/// Enabled by default with the conventional `createdAt` / `updatedAt`
/// names. Either attribute can be renamed or suppressed individually, or
/// the whole policy disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampPolicy {
    enabled: bool,
    created: Option<String>,
    updated: Option<String>,
}

impl Default for TimestampPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            created: Some("createdAt".to_string()),
            updated: Some("updatedAt".to_string()),
        }
    }
}

impl TimestampPolicy {
    /// A policy with both timestamp attributes disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            created: None,
            updated: None,
        }
    }

    /// Renames the creation-timestamp attribute.
    #[must_use]
    pub fn created_as(mut self, name: impl Into<String>) -> Self {
        self.created = Some(name.into());
        self
    }

    /// Renames the update-timestamp attribute.
    #[must_use]
    pub fn updated_as(mut self, name: impl Into<String>) -> Self {
        self.updated = Some(name.into());
        self
    }

    /// Suppresses the creation-timestamp attribute only.
    #[must_use]
    pub fn without_created(mut self) -> Self {
        self.created = None;
        self
    }

    /// Suppresses the update-timestamp attribute only.
    #[must_use]
    pub fn without_updated(mut self) -> Self {
        self.updated = None;
        self
    }

    /// Returns the creation-timestamp column name, if maintained.
    #[must_use]
    pub fn created_column(&self) -> Option<&str> {
        if self.enabled {
            self.created.as_deref()
        } else {
            None
        }
    }

    /// Returns the update-timestamp column name, if maintained.
    #[must_use]
    pub fn updated_column(&self) -> Option<&str> {
        if self.enabled {
            self.updated.as_deref()
        } else {
            None
        }
    }
}

/// A finalized model definition.
///
/// Constructed through [`ModelDefinition::builder`]; immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    name: String,
    attributes: Vec<AttributeDefinition>,
    timestamps: TimestampPolicy,
    table_name: String,
}

impl ModelDefinition {
    /// Starts building a model with the given logical name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ModelDefinitionBuilder {
        ModelDefinitionBuilder {
            name: name.into(),
            attributes: Vec::new(),
            table_override: None,
            freeze_table_name: false,
            timestamps: TimestampPolicy::default(),
        }
    }

    /// The model's logical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved physical table name, computed once at build time.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Declared attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    /// The model's timestamp policy.
    #[must_use]
    pub fn timestamps(&self) -> &TimestampPolicy {
        &self.timestamps
    }
}

/// Builder for [`ModelDefinition`].
#[derive(Debug, Clone)]
pub struct ModelDefinitionBuilder {
    name: String,
    attributes: Vec<AttributeDefinition>,
    table_override: Option<String>,
    freeze_table_name: bool,
    timestamps: TimestampPolicy,
}

impl ModelDefinitionBuilder {
    /// Adds an attribute. Declaration order is preserved.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Overrides the physical table name. Used verbatim, no pluralization.
    #[must_use]
    pub fn table_name(mut self, table: impl Into<String>) -> Self {
        self.table_override = Some(table.into());
        self
    }

    /// Uses the model name as the table name, skipping pluralization.
    #[must_use]
    pub fn freeze_table_name(mut self) -> Self {
        self.freeze_table_name = true;
        self
    }

    /// Replaces the timestamp policy.
    #[must_use]
    pub fn timestamps(mut self, policy: TimestampPolicy) -> Self {
        self.timestamps = policy;
        self
    }

    /// Finalizes the model, resolving and caching its table name.
    pub fn build(self) -> Result<ModelDefinition, DefinitionError> {
        if self.attributes.is_empty() {
            return Err(DefinitionError::EmptyModel(self.name));
        }
        for (i, attribute) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.name == attribute.name) {
                return Err(DefinitionError::DuplicateAttribute {
                    model: self.name,
                    attribute: attribute.name.clone(),
                });
            }
        }
        let table_name = resolve_table_name(
            &self.name,
            self.table_override.as_deref(),
            self.freeze_table_name,
        );
        Ok(ModelDefinition {
            name: self.name,
            attributes: self.attributes,
            timestamps: self.timestamps,
            table_name,
        })
    }
}

/// Registry-wide defaults applied to models built through
/// [`ModelRegistry::builder`], before finalization.
#[derive(Debug, Clone, Default)]
pub struct ModelDefaults {
    /// Freeze table names for every model by default.
    pub freeze_table_names: bool,
    /// Default timestamp policy for every model.
    pub timestamps: Option<TimestampPolicy>,
}

/// An explicit, caller-owned collection of finalized models.
///
/// Registration order is iteration order. There is no process-wide
/// registry; construct one at startup and pass it by reference.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    defaults: ModelDefaults,
    models: Vec<ModelDefinition>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with registry-wide model defaults.
    #[must_use]
    pub fn with_defaults(defaults: ModelDefaults) -> Self {
        Self {
            defaults,
            models: Vec::new(),
        }
    }

    /// Starts a model builder pre-seeded with this registry's defaults.
    #[must_use]
    pub fn builder(&self, name: impl Into<String>) -> ModelDefinitionBuilder {
        let mut builder = ModelDefinition::builder(name);
        if self.defaults.freeze_table_names {
            builder = builder.freeze_table_name();
        }
        if let Some(policy) = &self.defaults.timestamps {
            builder = builder.timestamps(policy.clone());
        }
        builder
    }

    /// Registers a finalized model.
    pub fn register(&mut self, model: ModelDefinition) -> Result<(), DefinitionError> {
        if self.models.iter().any(|m| m.name() == model.name()) {
            return Err(DefinitionError::DuplicateModel(model.name().to_string()));
        }
        self.models.push(model);
        Ok(())
    }

    /// Looks up a model by logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Iterates models in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.models.iter()
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
