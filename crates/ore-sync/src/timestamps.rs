//! Application-layer timestamp lifecycle.
//!
//! Maintains a model's creation/update timestamp attributes at persistence
//! time, independent of any store-side trigger. Direct writes that bypass
//! this layer will not have timestamps maintained, by design.
//!
//! The persistence-execution layer calls [`stamp`] (or
//! [`timestamp_assignments`]) as a pre-persistence hook; attribute storage
//! mechanics stay out of this module.

use chrono::{DateTime, Utc};

use ore_schema::model::ModelDefinition;

/// The kind of persistence operation being intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    /// First persistence of a record.
    Create,
    /// Any subsequent persistence.
    Update,
}

/// Computes the timestamp attribute assignments for one persistence
/// operation.
///
/// The wall clock is read exactly once per call, so every assignment in
/// the returned set carries the same instant: on create, the creation and
/// update attributes agree to the microsecond. The creation attribute is
/// stamped only on [`PersistKind::Create`]; the update attribute on every
/// operation. Policy suppression and renames are respected.
#[must_use]
pub fn timestamp_assignments(
    model: &ModelDefinition,
    kind: PersistKind,
) -> Vec<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let policy = model.timestamps();
    let mut assignments = Vec::new();

    if kind == PersistKind::Create {
        if let Some(created) = policy.created_column() {
            assignments.push((created.to_string(), now));
        }
    }
    if let Some(updated) = policy.updated_column() {
        assignments.push((updated.to_string(), now));
    }
    assignments
}

/// A record the timestamp lifecycle can write into.
pub trait TimestampWrite {
    /// Sets the named attribute to the given instant.
    fn set_timestamp(&mut self, attribute: &str, at: DateTime<Utc>);
}

/// Applies the timestamp assignments for one persistence operation to a
/// record.
pub fn stamp(model: &ModelDefinition, kind: PersistKind, record: &mut impl TimestampWrite) {
    for (attribute, at) in timestamp_assignments(model, kind) {
        record.set_timestamp(&attribute, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use ore_schema::model::{AttributeDefinition, TimestampPolicy};
    use ore_schema::types::LogicalType;

    impl TimestampWrite for BTreeMap<String, DateTime<Utc>> {
        fn set_timestamp(&mut self, attribute: &str, at: DateTime<Utc>) {
            self.insert(attribute.to_string(), at);
        }
    }

    fn model(policy: TimestampPolicy) -> ModelDefinition {
        ModelDefinition::builder("Person")
            .attribute(AttributeDefinition::new("id", LogicalType::Integer).primary_key())
            .timestamps(policy)
            .build()
            .unwrap()
    }

    #[test]
    fn create_stamps_both_with_one_clock_read() {
        let model = model(TimestampPolicy::default());
        let assignments = timestamp_assignments(&model, PersistKind::Create);

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].0, "createdAt");
        assert_eq!(assignments[1].0, "updatedAt");
        // Both attributes carry the same instant, to the microsecond.
        assert_eq!(assignments[0].1, assignments[1].1);
    }

    #[test]
    fn update_stamps_only_the_update_attribute() {
        let model = model(TimestampPolicy::default());
        let assignments = timestamp_assignments(&model, PersistKind::Update);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].0, "updatedAt");
    }

    #[test]
    fn disabled_policy_stamps_nothing() {
        let model = model(TimestampPolicy::disabled());
        assert!(timestamp_assignments(&model, PersistKind::Create).is_empty());
        assert!(timestamp_assignments(&model, PersistKind::Update).is_empty());
    }

    #[test]
    fn renamed_and_suppressed_attributes_respected() {
        let model = model(
            TimestampPolicy::default()
                .created_as("creationDate")
                .without_updated(),
        );

        let create = timestamp_assignments(&model, PersistKind::Create);
        assert_eq!(create.len(), 1);
        assert_eq!(create[0].0, "creationDate");

        assert!(timestamp_assignments(&model, PersistKind::Update).is_empty());
    }

    #[test]
    fn stamp_writes_through_the_record_hook() {
        let model = model(TimestampPolicy::default());
        let mut record = BTreeMap::new();

        stamp(&model, PersistKind::Create, &mut record);
        assert_eq!(record.len(), 2);
        assert_eq!(record["createdAt"], record["updatedAt"]);

        let created_before = record["createdAt"];
        stamp(&model, PersistKind::Update, &mut record);
        assert_eq!(record["createdAt"], created_before);
        assert!(record["updatedAt"] >= created_before);
    }
}
