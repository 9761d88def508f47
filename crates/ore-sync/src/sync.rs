//! Sync orchestration.
//!
//! Drives one full synchronization per model: resolve the table, build the
//! desired schema, introspect the actual schema, reconcile, gate
//! destructive plans, and apply the surviving operations one at a time.
//!
//! A single model's sync runs introspect -> diff -> apply to completion
//! without interleaving; concurrent structural changes to the same table
//! are not coordinated here and must be serialized by the caller. There is
//! no cross-process locking. Cancelling (dropping) a sync future never
//! retracts operations already sent; it only prevents new ones from
//! starting. Failed DDL is never retried automatically.

use regex::Regex;
use tracing::{debug, info};

use ore_schema::desired::desired_schema;
use ore_schema::diff::{diff, SyncMode};
use ore_schema::model::{ModelDefinition, ModelRegistry};
use ore_schema::operation::{any_destructive, StructuralOperation};
use ore_schema::types::TableSchema;

use crate::error::{Result, SyncError};
use crate::executor::DdlExecutor;
use crate::introspect::SchemaIntrospector;

/// Options controlling a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// How to treat an existing table.
    pub mode: SyncMode,
    /// Safety pattern evaluated against the target database identifier
    /// before any destructive plan is applied. When absent, no gating
    /// occurs.
    pub match_pattern: Option<Regex>,
    /// In [`Synchronizer::sync_all`], keep syncing remaining models after
    /// a failure instead of short-circuiting.
    pub continue_on_error: bool,
}

impl SyncOptions {
    /// Creates default options: CreateOnly, ungated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sync mode.
    #[must_use]
    pub fn mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the safety pattern.
    #[must_use]
    pub fn match_pattern(mut self, pattern: Regex) -> Self {
        self.match_pattern = Some(pattern);
        self
    }

    /// Enables continue-on-error batch behavior.
    #[must_use]
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }
}

/// Outcome of one successful model sync.
///
/// `applied` is the authoritative measure of what happened; a failed sync
/// surfaces its own applied count through [`SyncError::DdlFailed`].
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Logical model name.
    pub model: String,
    /// Physical table name.
    pub table: String,
    /// The operations the reconciler planned, in application order.
    pub planned: Vec<StructuralOperation>,
    /// Number of operations applied. Equals `planned.len()` on success.
    pub applied: usize,
}

/// Outcome of a continue-on-error batch sync.
#[derive(Debug)]
pub struct BatchReport {
    /// Reports for the models that synced successfully, in registration
    /// order.
    pub reports: Vec<SyncReport>,
    /// Errors for the models that failed, in registration order.
    pub failures: Vec<SyncError>,
}

impl BatchReport {
    /// Returns whether every model synced.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The sync orchestrator.
///
/// Owns neither the connection nor the models: the introspector and
/// executor are injected, and the store connection's lifecycle belongs to
/// the caller. Keeps no private metadata store; the live catalog is the
/// single source of truth for what exists.
pub struct Synchronizer<I, E> {
    introspector: I,
    executor: E,
    database: String,
}

impl<I: SchemaIntrospector, E: DdlExecutor> Synchronizer<I, E> {
    /// Creates a synchronizer targeting the named database.
    ///
    /// `database` is the identifier the safety pattern is evaluated
    /// against (e.g. a database name or file path).
    pub fn new(introspector: I, executor: E, database: impl Into<String>) -> Self {
        Self {
            introspector,
            executor,
            database: database.into(),
        }
    }

    /// The target database identifier.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Introspects and diffs without executing anything. Always safe to
    /// call for inspection, regardless of gating.
    pub async fn plan(
        &self,
        model: &ModelDefinition,
        mode: SyncMode,
    ) -> Result<(Vec<StructuralOperation>, Option<TableSchema>)> {
        let desired = desired_schema(model);
        let actual = self.introspector.describe(model.table_name()).await?;
        let operations = diff(&desired, actual.as_ref(), mode);
        Ok((operations, actual))
    }

    /// Synchronizes one model.
    ///
    /// Introspection and diffing always run; execution is all-or-nothing
    /// behind the safety gate. Operations apply in reconciler order, one
    /// at a time. On a mid-plan failure the remaining operations are not
    /// attempted and nothing is rolled back.
    pub async fn sync(&self, model: &ModelDefinition, options: &SyncOptions) -> Result<SyncReport> {
        let (plan, actual) = self.plan(model, options.mode).await?;

        let destructive =
            options.mode == SyncMode::Force || any_destructive(&plan, actual.as_ref());
        self.check_gate(destructive, options)?;

        if plan.is_empty() {
            debug!(model = %model.name(), table = %model.table_name(), "schema already in agreement");
        } else {
            info!(
                model = %model.name(),
                table = %model.table_name(),
                operations = plan.len(),
                "synchronizing model"
            );
        }

        let applied = self.apply(model.table_name(), &plan).await?;
        Ok(SyncReport {
            model: model.name().to_string(),
            table: model.table_name().to_string(),
            planned: plan,
            applied,
        })
    }

    /// Synchronizes every registered model, in registration order.
    ///
    /// Short-circuits on the first failure. With
    /// [`SyncOptions::continue_on_error`] the batch keeps going and the
    /// returned [`BatchReport`] records each failure alongside the
    /// successful reports.
    pub async fn sync_all(
        &self,
        registry: &ModelRegistry,
        options: &SyncOptions,
    ) -> Result<BatchReport> {
        let mut reports = Vec::new();
        let mut failures = Vec::new();

        for model in registry.iter() {
            match self.sync(model, options).await {
                Ok(report) => reports.push(report),
                Err(err) if options.continue_on_error => failures.push(err),
                Err(err) => return Err(err),
            }
        }

        Ok(BatchReport { reports, failures })
    }

    /// Unconditionally drops a model's table, with Force-grade safety-gate
    /// semantics.
    pub async fn drop_table(&self, model: &ModelDefinition, options: &SyncOptions) -> Result<()> {
        self.check_gate(true, options)?;
        info!(model = %model.name(), table = %model.table_name(), "dropping table");
        self.apply(
            model.table_name(),
            &[StructuralOperation::drop_table(model.table_name())],
        )
        .await?;
        Ok(())
    }

    /// Evaluates the safety gate. Destructive work with a supplied pattern
    /// must match the database identifier; everything else passes.
    fn check_gate(&self, destructive: bool, options: &SyncOptions) -> Result<()> {
        if !destructive {
            return Ok(());
        }
        let Some(pattern) = &options.match_pattern else {
            return Ok(());
        };
        if pattern.is_match(&self.database) {
            return Ok(());
        }
        Err(SyncError::SafetyCheckFailed {
            database: self.database.clone(),
            pattern: pattern.as_str().to_string(),
        })
    }

    /// Applies operations one at a time, reporting the failing operation
    /// and the count applied before it.
    async fn apply(&self, table: &str, plan: &[StructuralOperation]) -> Result<usize> {
        for (index, operation) in plan.iter().enumerate() {
            if let Err(err) = self.executor.execute(operation).await {
                return Err(match err {
                    SyncError::Database(source) => SyncError::DdlFailed {
                        table: table.to_string(),
                        index,
                        applied: index,
                        operation: operation.clone(),
                        source,
                    },
                    other => other,
                });
            }
        }
        Ok(plan.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use ore_schema::model::AttributeDefinition;
    use ore_schema::types::{ColumnSchema, LogicalType};

    /// Introspector over a fixed set of in-memory tables.
    struct StaticIntrospector {
        tables: HashMap<String, TableSchema>,
    }

    impl StaticIntrospector {
        fn empty() -> Self {
            Self {
                tables: HashMap::new(),
            }
        }

        fn with(table: TableSchema) -> Self {
            let mut tables = HashMap::new();
            tables.insert(table.name.clone(), table);
            Self { tables }
        }
    }

    impl SchemaIntrospector for StaticIntrospector {
        async fn describe(&self, table: &str) -> Result<Option<TableSchema>> {
            Ok(self.tables.get(table).cloned())
        }
    }

    /// Executor that records operations and can fail the nth call.
    #[derive(Default)]
    struct RecordingExecutor {
        executed: Mutex<Vec<StructuralOperation>>,
        calls: Mutex<usize>,
        fail_on_call: Option<usize>,
    }

    impl RecordingExecutor {
        fn failing_at(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::default()
            }
        }

        fn executed(&self) -> Vec<StructuralOperation> {
            self.executed.lock().unwrap().clone()
        }
    }

    impl DdlExecutor for RecordingExecutor {
        async fn execute(&self, operation: &StructuralOperation) -> Result<()> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                let current = *calls;
                *calls += 1;
                current
            };
            if self.fail_on_call == Some(call) {
                return Err(SyncError::Database(sqlx::Error::Protocol(
                    "injected failure".to_string(),
                )));
            }
            self.executed.lock().unwrap().push(operation.clone());
            Ok(())
        }
    }

    fn person() -> ModelDefinition {
        ModelDefinition::builder("Person")
            .attribute(
                AttributeDefinition::new("id", LogicalType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .attribute(AttributeDefinition::new("firstName", LogicalType::String).not_null())
            .build()
            .unwrap()
    }

    fn people_actual() -> TableSchema {
        TableSchema::new("People")
            .column(
                ColumnSchema::new("id", LogicalType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnSchema::new("firstName", LogicalType::String).not_null())
            .column(ColumnSchema::new("createdAt", LogicalType::DateTime).not_null())
            .column(ColumnSchema::new("updatedAt", LogicalType::DateTime).not_null())
    }

    #[tokio::test]
    async fn missing_table_is_created() {
        let sync = Synchronizer::new(
            StaticIntrospector::empty(),
            RecordingExecutor::default(),
            "app_dev",
        );
        let report = sync.sync(&person(), &SyncOptions::new()).await.unwrap();

        assert_eq!(report.model, "Person");
        assert_eq!(report.table, "People");
        assert_eq!(report.applied, 1);
        assert!(matches!(
            report.planned[0],
            StructuralOperation::CreateTable(_)
        ));
    }

    #[tokio::test]
    async fn existing_table_untouched_in_create_only() {
        let executor = RecordingExecutor::default();
        let sync = Synchronizer::new(StaticIntrospector::with(people_actual()), executor, "app");
        let report = sync.sync(&person(), &SyncOptions::new()).await.unwrap();
        assert_eq!(report.applied, 0);
        assert!(report.planned.is_empty());
        assert!(sync.executor.executed().is_empty());
    }

    #[tokio::test]
    async fn gate_blocks_destructive_plan_with_zero_side_effects() {
        let actual = people_actual()
            .column(ColumnSchema::new("legacyFlag", LogicalType::Boolean));
        let sync = Synchronizer::new(
            StaticIntrospector::with(actual),
            RecordingExecutor::default(),
            "app_production",
        );

        let options = SyncOptions::new()
            .mode(SyncMode::Alter)
            .match_pattern(Regex::new(r"_test$").unwrap());
        let err = sync.sync(&person(), &options).await.unwrap_err();

        assert!(matches!(err, SyncError::SafetyCheckFailed { .. }));
        assert_eq!(err.applied_operations(), 0);
        assert!(sync.executor.executed().is_empty());
    }

    #[tokio::test]
    async fn gate_passes_on_matching_database() {
        let actual = people_actual()
            .column(ColumnSchema::new("legacyFlag", LogicalType::Boolean));
        let sync = Synchronizer::new(
            StaticIntrospector::with(actual),
            RecordingExecutor::default(),
            "app_test",
        );

        let options = SyncOptions::new()
            .mode(SyncMode::Alter)
            .match_pattern(Regex::new(r"_test$").unwrap());
        let report = sync.sync(&person(), &options).await.unwrap();

        assert_eq!(report.applied, 1);
        assert_eq!(
            sync.executor.executed(),
            vec![StructuralOperation::drop_column("People", "legacyFlag")]
        );
    }

    #[tokio::test]
    async fn force_without_pattern_is_ungated() {
        let sync = Synchronizer::new(
            StaticIntrospector::with(people_actual()),
            RecordingExecutor::default(),
            "anything",
        );
        let options = SyncOptions::new().mode(SyncMode::Force);
        let report = sync.sync(&person(), &options).await.unwrap();

        assert_eq!(report.applied, 2);
        let executed = sync.executor.executed();
        assert!(matches!(executed[0], StructuralOperation::DropTable { .. }));
        assert!(matches!(
            executed[1],
            StructuralOperation::CreateTable(_)
        ));
    }

    #[tokio::test]
    async fn non_destructive_alter_ignores_pattern() {
        // Adding columns is safe, so a non-matching pattern is irrelevant.
        let actual = TableSchema::new("People").column(
            ColumnSchema::new("id", LogicalType::Integer)
                .primary_key()
                .auto_increment(),
        );
        let sync = Synchronizer::new(
            StaticIntrospector::with(actual),
            RecordingExecutor::default(),
            "app_production",
        );
        let options = SyncOptions::new()
            .mode(SyncMode::Alter)
            .match_pattern(Regex::new(r"_test$").unwrap());
        let report = sync.sync(&person(), &options).await.unwrap();
        assert_eq!(report.applied, 3); // firstName, createdAt, updatedAt
    }

    #[tokio::test]
    async fn mid_plan_failure_reports_count_and_operation() {
        let actual = TableSchema::new("People").column(
            ColumnSchema::new("id", LogicalType::Integer)
                .primary_key()
                .auto_increment(),
        );
        let sync = Synchronizer::new(
            StaticIntrospector::with(actual),
            RecordingExecutor::failing_at(1),
            "app",
        );
        let options = SyncOptions::new().mode(SyncMode::Alter);
        let err = sync.sync(&person(), &options).await.unwrap_err();

        match err {
            SyncError::DdlFailed {
                table,
                index,
                applied,
                operation,
                ..
            } => {
                assert_eq!(table, "People");
                assert_eq!(index, 1);
                assert_eq!(applied, 1);
                assert!(matches!(operation, StructuralOperation::AddColumn { .. }));
            }
            other => panic!("expected DdlFailed, got {other:?}"),
        }
        // The failing operation and everything after it never ran.
        assert_eq!(sync.executor.executed().len(), 1);
    }

    #[tokio::test]
    async fn sync_all_runs_in_registration_order_and_short_circuits() {
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

        // Fail on the second model's create (operation index 1 overall).
        let sync = Synchronizer::new(
            StaticIntrospector::empty(),
            RecordingExecutor::failing_at(1),
            "app",
        );
        let err = sync
            .sync_all(&registry, &SyncOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::DdlFailed { ref table, .. } if table == "Categories"));
        assert_eq!(sync.executor.executed().len(), 1);
    }

    #[tokio::test]
    async fn sync_all_continue_on_error_collects_failures() {
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

        // First model's create fails; the batch keeps going.
        let sync = Synchronizer::new(
            StaticIntrospector::empty(),
            RecordingExecutor::failing_at(0),
            "app",
        );
        let options = SyncOptions::new().continue_on_error();
        let batch = sync.sync_all(&registry, &options).await.unwrap();

        assert!(!batch.is_success());
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.reports.len(), 1);
        assert_eq!(batch.reports[0].table, "Categories");
    }

    #[tokio::test]
    async fn drop_table_is_gated_like_force() {
        let sync = Synchronizer::new(
            StaticIntrospector::with(people_actual()),
            RecordingExecutor::default(),
            "app_production",
        );

        let gated = SyncOptions::new().match_pattern(Regex::new(r"_test$").unwrap());
        assert!(matches!(
            sync.drop_table(&person(), &gated).await,
            Err(SyncError::SafetyCheckFailed { .. })
        ));
        assert!(sync.executor.executed().is_empty());

        // Ungated drop goes through.
        sync.drop_table(&person(), &SyncOptions::new()).await.unwrap();
        assert_eq!(
            sync.executor.executed(),
            vec![StructuralOperation::drop_table("People")]
        );
    }
}
