//! End-to-end reconciliation scenarios: model definition through desired
//! schema through diff, without any store involvement.

use ore_schema::prelude::*;

fn person() -> ModelDefinition {
    ModelDefinition::builder("Person")
        .attribute(
            AttributeDefinition::new("id", LogicalType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .attribute(AttributeDefinition::new("firstName", LogicalType::String).not_null())
        .attribute(AttributeDefinition::new("lastName", LogicalType::String))
        .build()
        .unwrap()
}

#[test]
fn person_resolves_to_people() {
    assert_eq!(person().table_name(), "People");
}

#[test]
fn category_resolves_to_categories() {
    let category = ModelDefinition::builder("Category")
        .attribute(AttributeDefinition::new("id", LogicalType::Integer).primary_key())
        .build()
        .unwrap();
    assert_eq!(category.table_name(), "Categories");
}

#[test]
fn fresh_model_plans_a_single_create() {
    let model = person();
    let desired = desired_schema(&model);

    for mode in [SyncMode::CreateOnly, SyncMode::Force, SyncMode::Alter] {
        let plan = diff(&desired, None, mode);
        assert_eq!(plan, vec![StructuralOperation::CreateTable(desired.clone())]);
    }
}

#[test]
fn partially_created_table_gains_missing_columns_in_order() {
    let model = person();
    let desired = desired_schema(&model);

    let actual = TableSchema::new("People")
        .column(
            ColumnSchema::new("id", LogicalType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .column(ColumnSchema::new("firstName", LogicalType::String).not_null());

    let plan = diff(&desired, Some(&actual), SyncMode::Alter);
    let added: Vec<&str> = plan
        .iter()
        .map(|op| match op {
            StructuralOperation::AddColumn { column, .. } => column.name.as_str(),
            other => panic!("unexpected operation: {other:?}"),
        })
        .collect();
    assert_eq!(added, vec!["lastName", "createdAt", "updatedAt"]);
    assert!(!any_destructive(&plan, Some(&actual)));
}

#[test]
fn legacy_column_drops_after_every_add_and_alter() {
    let model = person();
    let desired = desired_schema(&model);

    let actual = TableSchema::new("People")
        .column(
            ColumnSchema::new("id", LogicalType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .column(ColumnSchema::new("firstName", LogicalType::String).not_null())
        .column(ColumnSchema::new("lastName", LogicalType::String))
        .column(ColumnSchema::new("createdAt", LogicalType::DateTime).not_null())
        .column(ColumnSchema::new("updatedAt", LogicalType::DateTime).not_null())
        .column(ColumnSchema::new("legacyFlag", LogicalType::Boolean));

    let plan = diff(&desired, Some(&actual), SyncMode::Alter);
    assert_eq!(
        plan,
        vec![StructuralOperation::drop_column("People", "legacyFlag")]
    );
    assert!(any_destructive(&plan, Some(&actual)));

    // The drop is last relative to any other operation kind.
    let last = plan.last().unwrap();
    assert!(matches!(last, StructuralOperation::DropColumn { .. }));
}

#[test]
fn matching_schema_is_a_noop_under_alter() {
    let model = person();
    let desired = desired_schema(&model);
    assert!(diff(&desired, Some(&desired), SyncMode::Alter).is_empty());
}

#[test]
fn force_discards_any_similarity() {
    let model = person();
    let desired = desired_schema(&model);

    let plan = diff(&desired, Some(&desired), SyncMode::Force);
    assert_eq!(
        plan,
        vec![
            StructuralOperation::drop_table("People"),
            StructuralOperation::CreateTable(desired.clone()),
        ]
    );
}

#[test]
fn registry_round_trip() {
    let mut registry = ModelRegistry::new();
    registry.register(person()).unwrap();
    registry
        .register(
            ModelDefinition::builder("Category")
                .attribute(AttributeDefinition::new("id", LogicalType::Integer).primary_key())
                .build()
                .unwrap(),
        )
        .unwrap();

    let tables: Vec<&str> = registry.iter().map(ModelDefinition::table_name).collect();
    assert_eq!(tables, vec!["People", "Categories"]);
}
