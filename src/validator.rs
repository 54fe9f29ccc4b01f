//! Job Validator
//!
//! Runs the 4 validation layers over a [`Job`] and collects every finding
//! into a single [`ValidationResult`]. Validation is opt-in: coercion never
//! calls it.

use std::path::Path;

use tracing::{debug, instrument};

use crate::error::JobError;
use crate::errors::ValidationResult;
use crate::job::Job;
use crate::validators::{
    validate_catalog, validate_references, validate_scheduler, validate_workflow,
};

/// Runs all 4 layers
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a job through all 4 layers
    #[instrument(skip_all, fields(tasks = job.catalog().len(), edges = job.workflow().len()))]
    pub fn validate(&self, job: &Job) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.task_count = job.catalog().len();
        result.edge_count = job.workflow().len();

        // Layer 1: Catalog
        for error in validate_catalog(job) {
            result.add_error(error);
        }

        // Layer 2: Workflow (unused tasks come back as warnings)
        for error in validate_workflow(job) {
            result.add_error(error);
        }

        // Layer 3: References
        for error in validate_references(job) {
            result.add_error(error);
        }

        // Layer 4: Scheduler
        for error in validate_scheduler(job) {
            result.add_error(error);
        }

        debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated job"
        );
        result
    }

    /// Load a job definition file and validate it
    pub fn validate_file(&self, path: &Path) -> Result<ValidationResult, JobError> {
        let job = Job::from_path(path)?;
        Ok(self.validate(&job))
    }
}
