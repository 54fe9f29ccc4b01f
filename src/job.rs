//! Job: the root aggregate and its coercion to a canonical document
//!
//! A job bundles a scheduler policy, a workflow, a catalog, lifecycles, flow
//! conditions, windows and triggers. Every task belongs to exactly one job.
//!
//! Mutations never fail and never validate; see [`crate::validator`] for
//! opt-in checks. `Clone` is a deep copy: a cloned job shares nothing with
//! its source.

use std::path::Path;

use tracing::{debug, instrument};

use crate::builders::JobBuilder;
use crate::definition::JobDefinition;
use crate::document::CanonicalDocument;
use crate::error::JobError;
use crate::flow_condition::{FlowCondition, FlowConditions};
use crate::lifecycle::{Lifecycle, Lifecycles};
use crate::scheduler::TaskScheduler;
use crate::symbols::{names, registry, SymbolRegistry};
use crate::task::{Catalog, Task};
use crate::value::{Record, Value};
use crate::window::{Trigger, Triggers, Window, Windows};
use crate::workflow::Workflow;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Job {
    task_scheduler: TaskScheduler,
    workflow: Workflow,
    catalog: Catalog,
    lifecycles: Lifecycles,
    flow_conditions: FlowConditions,
    windows: Windows,
    triggers: Triggers,
}

impl Job {
    /// Empty job with the given scheduler
    pub fn new(task_scheduler: TaskScheduler) -> Self {
        Self {
            task_scheduler,
            ..Self::default()
        }
    }

    pub fn builder() -> JobBuilder {
        JobBuilder::new()
    }

    /// Parse a YAML (or JSON) job definition
    pub fn from_yaml_str(text: &str) -> Result<Self, JobError> {
        JobDefinition::from_yaml_str(text)?.into_job()
    }

    /// Read and parse a job definition file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JobError> {
        JobDefinition::from_path(path)?.into_job()
    }

    // ─────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────

    pub fn set_task_scheduler(&mut self, task_scheduler: TaskScheduler) {
        self.task_scheduler = task_scheduler;
    }

    /// Replace the workflow
    pub fn add_workflow(&mut self, workflow: Workflow) {
        self.workflow = workflow;
    }

    pub fn add_workflow_edge(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.workflow.add_edge(source, destination);
    }

    /// Replace the catalog
    pub fn add_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    pub fn add_catalog_task(&mut self, task: Task) {
        self.catalog.add(task);
    }

    /// Replace the lifecycles
    pub fn add_lifecycles(&mut self, lifecycles: Lifecycles) {
        self.lifecycles = lifecycles;
    }

    pub fn add_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycles.add(lifecycle);
    }

    /// Replace the flow conditions
    pub fn add_flow_conditions(&mut self, flow_conditions: FlowConditions) {
        self.flow_conditions = flow_conditions;
    }

    pub fn add_flow_condition(&mut self, flow_condition: FlowCondition) {
        self.flow_conditions.add(flow_condition);
    }

    /// Replace the windows
    pub fn add_windows(&mut self, windows: Windows) {
        self.windows = windows;
    }

    pub fn add_window(&mut self, window: Window) {
        self.windows.add(window);
    }

    /// Replace the triggers
    pub fn add_triggers(&mut self, triggers: Triggers) {
        self.triggers = triggers;
    }

    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.add(trigger);
    }

    // ─────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────

    pub fn task_scheduler(&self) -> &TaskScheduler {
        &self.task_scheduler
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn lifecycles(&self) -> &Lifecycles {
        &self.lifecycles
    }

    pub fn flow_conditions(&self) -> &FlowConditions {
        &self.flow_conditions
    }

    pub fn windows(&self) -> &Windows {
        &self.windows
    }

    pub fn triggers(&self) -> &Triggers {
        &self.triggers
    }

    // ─────────────────────────────────────────────────────────────
    // Coercion
    // ─────────────────────────────────────────────────────────────

    /// Coerce against the process-wide Onyx registry
    pub fn to_canonical_document(&self) -> Result<CanonicalDocument, JobError> {
        self.to_canonical_document_with(registry())
    }

    /// Coerce against an explicit registry
    ///
    /// Keys are inserted in a fixed order: task-scheduler, workflow, catalog,
    /// lifecycles, flow-conditions, windows, triggers. Fails only with
    /// `MissingSymbol`.
    #[instrument(
        skip_all,
        fields(
            scheduler = %self.task_scheduler,
            edges = self.workflow.len(),
            tasks = self.catalog.len()
        )
    )]
    pub fn to_canonical_document_with(
        &self,
        registry: &SymbolRegistry,
    ) -> Result<CanonicalDocument, JobError> {
        let mut document = Record::with_capacity(7);

        document.insert(
            registry.resolve(names::TASK_SCHEDULER)?.clone(),
            self.task_scheduler.to_canonical(registry)?,
        );
        document.insert(
            registry.resolve(names::WORKFLOW)?.clone(),
            Value::Vector(self.workflow.to_canonical_edges()),
        );
        document.insert(
            registry.resolve(names::CATALOG)?.clone(),
            Value::Vector(self.catalog.to_canonical_sequence(registry)?),
        );
        document.insert(
            registry.resolve(names::LIFECYCLES)?.clone(),
            Value::Vector(self.lifecycles.to_canonical_sequence(registry)?),
        );
        document.insert(
            registry.resolve(names::FLOW_CONDITIONS)?.clone(),
            Value::Vector(self.flow_conditions.to_canonical_sequence(registry)?),
        );
        document.insert(
            registry.resolve(names::WINDOWS)?.clone(),
            Value::Vector(self.windows.to_canonical_sequence(registry)?),
        );
        document.insert(
            registry.resolve(names::TRIGGERS)?.clone(),
            Value::Vector(self.triggers.to_canonical_sequence(registry)?),
        );

        debug!(keys = document.len(), "coerced job");
        Ok(CanonicalDocument::new(document))
    }
}
