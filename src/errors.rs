//! Validation error types
//!
//! Structured findings for each validation layer, designed for
//! helpful error messages with suggestions.

use thiserror::Error;

/// Validation layer (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLayer {
    Catalog = 1,
    Workflow = 2,
    References = 3,
    Scheduler = 4,
}

impl std::fmt::Display for ValidationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationLayer::Catalog => write!(f, "Catalog"),
            ValidationLayer::Workflow => write!(f, "Workflow"),
            ValidationLayer::References => write!(f, "References"),
            ValidationLayer::Scheduler => write!(f, "Scheduler"),
        }
    }
}

/// Severity of validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding with context
#[derive(Debug, Error)]
pub enum ValidationError {
    // Layer 1: Catalog
    #[error("Duplicate task name: '{name}'")]
    DuplicateTask { layer: ValidationLayer, name: String },

    // Layer 2: Workflow
    #[error("Self-loop detected: task '{task}' flows into itself")]
    SelfLoop { layer: ValidationLayer, task: String },

    #[error("Workflow references task '{task}' which is not in the catalog")]
    EdgeTaskNotFound {
        layer: ValidationLayer,
        task: String,
        available_tasks: Vec<String>,
    },

    #[error("Cycle detected: {cycle_path}")]
    CycleDetected {
        layer: ValidationLayer,
        cycle_path: String,
    },

    #[error("Catalog task '{name}' does not appear in the workflow")]
    UnusedTask {
        layer: ValidationLayer,
        name: String,
        severity: Severity,
    },

    // Layer 3: References
    #[error("{kind} references task '{task}' which is not in the catalog")]
    UnknownTaskReference {
        layer: ValidationLayer,
        kind: &'static str,
        task: String,
        available_tasks: Vec<String>,
    },

    #[error("Trigger references window '{window_id}' which is not defined")]
    UnknownWindow {
        layer: ValidationLayer,
        window_id: String,
        available_windows: Vec<String>,
    },

    // Layer 4: Scheduler
    #[error("Percentage scheduler names task '{task}' which is not in the catalog")]
    PercentageTaskNotFound { layer: ValidationLayer, task: String },

    #[error("Task percentages sum to {total}, expected 100")]
    PercentageSum {
        layer: ValidationLayer,
        total: u64,
        severity: Severity,
    },
}

impl ValidationError {
    /// Get the validation layer for this finding
    pub fn layer(&self) -> ValidationLayer {
        match self {
            ValidationError::DuplicateTask { layer, .. } => *layer,
            ValidationError::SelfLoop { layer, .. } => *layer,
            ValidationError::EdgeTaskNotFound { layer, .. } => *layer,
            ValidationError::CycleDetected { layer, .. } => *layer,
            ValidationError::UnusedTask { layer, .. } => *layer,
            ValidationError::UnknownTaskReference { layer, .. } => *layer,
            ValidationError::UnknownWindow { layer, .. } => *layer,
            ValidationError::PercentageTaskNotFound { layer, .. } => *layer,
            ValidationError::PercentageSum { layer, .. } => *layer,
        }
    }

    /// Get severity (error vs warning)
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::UnusedTask { severity, .. } => *severity,
            ValidationError::PercentageSum { severity, .. } => *severity,
            _ => Severity::Error,
        }
    }

    /// Get suggestion for fixing this finding
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ValidationError::DuplicateTask { .. } => {
                Some("Give every catalog task a unique name".to_string())
            }
            ValidationError::SelfLoop { .. } => {
                Some("Remove the edge or route through another task".to_string())
            }
            ValidationError::EdgeTaskNotFound {
                available_tasks, ..
            }
            | ValidationError::UnknownTaskReference {
                available_tasks, ..
            } => Some(available_hint("tasks", available_tasks)),
            ValidationError::UnknownWindow {
                available_windows, ..
            } => Some(available_hint("windows", available_windows)),
            ValidationError::CycleDetected { .. } => {
                Some("Workflows must be acyclic; break the cycle".to_string())
            }
            ValidationError::PercentageTaskNotFound { .. } => {
                Some("Add the task to the catalog or drop its percentage".to_string())
            }
            _ => None,
        }
    }
}

fn available_hint(what: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!("No {} defined", what)
    } else if available.len() <= 5 {
        format!("Available {}: {}", what, available.join(", "))
    } else {
        format!(
            "Available {}: {} (and {} more)",
            what,
            available[..3].join(", "),
            available.len() - 3
        )
    }
}

/// Result of validating a job
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub task_count: usize,
    pub edge_count: usize,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        if error.severity() == Severity::Warning {
            self.warnings.push(error);
        } else {
            self.errors.push(error);
        }
    }
}
