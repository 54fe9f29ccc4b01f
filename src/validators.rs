//! Validation layer implementations
//!
//! Each layer checks one aspect of a job:
//! - Layer 1: Catalog - task names
//! - Layer 2: Workflow - edges against the catalog, cycles
//! - Layer 3: References - lifecycles, flow conditions, windows, triggers
//! - Layer 4: Scheduler - percentage shares

use std::collections::HashSet;

use crate::errors::{Severity, ValidationError, ValidationLayer};
use crate::flow_condition::FlowTarget;
use crate::flow_graph::WorkflowGraph;
use crate::job::Job;
use crate::lifecycle::ALL_TASKS;

fn task_names(job: &Job) -> Vec<String> {
    job.catalog().iter().map(|t| t.name().to_string()).collect()
}

/// Layer 1: Validate catalog task names
pub fn validate_catalog(job: &Job) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for task in job.catalog() {
        if !seen.insert(task.name()) && reported.insert(task.name()) {
            errors.push(ValidationError::DuplicateTask {
                layer: ValidationLayer::Catalog,
                name: task.name().to_string(),
            });
        }
    }

    errors
}

/// Layer 2: Validate workflow edges and structure
pub fn validate_workflow(job: &Job) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let catalog: HashSet<&str> = job.catalog().iter().map(|t| t.name()).collect();
    let mut missing_reported = HashSet::new();

    for edge in job.workflow().edges() {
        if edge.source == edge.destination {
            errors.push(ValidationError::SelfLoop {
                layer: ValidationLayer::Workflow,
                task: edge.source.clone(),
            });
        }

        for task in [&edge.source, &edge.destination] {
            if !catalog.contains(task.as_str()) && missing_reported.insert(task.as_str()) {
                errors.push(ValidationError::EdgeTaskNotFound {
                    layer: ValidationLayer::Workflow,
                    task: task.clone(),
                    available_tasks: task_names(job),
                });
            }
        }
    }

    let graph = WorkflowGraph::from_workflow(job.workflow());

    // Self-loops are already reported
    if let Some(cycle) = graph.find_cycle_excluding_self_loops() {
        let path: Vec<&str> = cycle.iter().map(|t| t.as_ref()).collect();
        errors.push(ValidationError::CycleDetected {
            layer: ValidationLayer::Workflow,
            cycle_path: path.join(" → "),
        });
    }

    if !graph.tasks().is_empty() {
        for task in job.catalog() {
            if !graph.contains(task.name()) {
                errors.push(ValidationError::UnusedTask {
                    layer: ValidationLayer::Workflow,
                    name: task.name().to_string(),
                    severity: Severity::Warning,
                });
            }
        }
    }

    errors
}

/// Layer 3: Validate task and window references
pub fn validate_references(job: &Job) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let catalog: HashSet<&str> = job.catalog().iter().map(|t| t.name()).collect();

    let mut check = |kind: &'static str, task: &str| {
        if !catalog.contains(task) {
            errors.push(ValidationError::UnknownTaskReference {
                layer: ValidationLayer::References,
                kind,
                task: task.to_string(),
                available_tasks: task_names(job),
            });
        }
    };

    for lifecycle in job.lifecycles() {
        if lifecycle.task() != ALL_TASKS {
            check("lifecycle", lifecycle.task());
        }
    }

    for condition in job.flow_conditions() {
        check("flow condition", condition.from_task());
        if let FlowTarget::Tasks(targets) = condition.to() {
            for target in targets {
                check("flow condition", target);
            }
        }
    }

    for window in job.windows() {
        check("window", window.task());
    }

    let windows: HashSet<&str> = job.windows().iter().map(|w| w.id()).collect();
    for trigger in job.triggers() {
        if !windows.contains(trigger.window_id()) {
            errors.push(ValidationError::UnknownWindow {
                layer: ValidationLayer::References,
                window_id: trigger.window_id().to_string(),
                available_windows: job.windows().iter().map(|w| w.id().to_string()).collect(),
            });
        }
    }

    errors
}

/// Layer 4: Validate percentage shares
pub fn validate_scheduler(job: &Job) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(shares) = job.task_scheduler().percentages() else {
        return errors;
    };

    let catalog: HashSet<&str> = job.catalog().iter().map(|t| t.name()).collect();
    for task in shares.keys() {
        if !catalog.contains(task.as_str()) {
            errors.push(ValidationError::PercentageTaskNotFound {
                layer: ValidationLayer::Scheduler,
                task: task.clone(),
            });
        }
    }

    let total: u64 = shares.values().map(|&p| u64::from(p)).sum();
    if total != 100 {
        errors.push(ValidationError::PercentageSum {
            layer: ValidationLayer::Scheduler,
            total,
            severity: Severity::Warning,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::JobBuilder;
    use crate::flow_condition::FlowCondition;
    use crate::lifecycle::Lifecycle;
    use crate::scheduler::TaskScheduler;
    use crate::task::Task;
    use crate::value::Value;
    use crate::window::{Trigger, Window, WindowType};

    fn linear() -> JobBuilder {
        JobBuilder::new()
            .chain(["in", "process", "out"])
            .task(Task::input("in"))
            .task(Task::function("process"))
            .task(Task::output("out"))
    }

    #[test]
    fn test_validate_catalog_valid() {
        assert!(validate_catalog(&linear().build()).is_empty());
    }

    #[test]
    fn test_validate_catalog_duplicate_reported_once() {
        let job = linear()
            .task(Task::output("out"))
            .task(Task::output("out"))
            .build();
        let errors = validate_catalog(&job);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::DuplicateTask { name, .. } if name == "out"
        ));
    }

    #[test]
    fn test_validate_workflow_valid() {
        assert!(validate_workflow(&linear().build()).is_empty());
    }

    #[test]
    fn test_validate_workflow_missing_task() {
        let job = linear().edge("out", "sink").build();
        let errors = validate_workflow(&job);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::EdgeTaskNotFound { task, .. } if task == "sink"
        ));
    }

    #[test]
    fn test_validate_workflow_self_loop() {
        let job = linear().edge("process", "process").build();
        let errors = validate_workflow(&job);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::SelfLoop { .. }));
    }

    #[test]
    fn test_validate_workflow_cycle() {
        let job = linear().edge("out", "in").build();
        let errors = validate_workflow(&job);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::CycleDetected { cycle_path, .. } => {
                assert_eq!(cycle_path, "in → process → out → in");
            }
            other => panic!("Expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_workflow_cycle_behind_self_loop() {
        let job = JobBuilder::new()
            .edge("a", "a")
            .edge("a", "b")
            .edge("b", "a")
            .task(Task::function("a"))
            .task(Task::function("b"))
            .build();
        let errors = validate_workflow(&job);

        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(matches!(&errors[0], ValidationError::SelfLoop { task, .. } if task == "a"));
        match &errors[1] {
            ValidationError::CycleDetected { cycle_path, .. } => {
                assert_eq!(cycle_path, "a → b → a");
            }
            other => panic!("Expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_workflow_unused_task_warning() {
        let job = linear().task(Task::output("audit")).build();
        let errors = validate_workflow(&job);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_validate_references() {
        let job = linear()
            .lifecycle(Lifecycle::all("my/metrics"))
            .lifecycle(Lifecycle::new("ghost", "my/calls"))
            .flow_condition(FlowCondition::new(
                "process",
                FlowTarget::tasks(["out", "nowhere"]),
            ))
            .flow_condition(FlowCondition::new("in", FlowTarget::All))
            .window(Window::new(
                "w",
                "process",
                WindowType::Global,
                Value::keyword("my/agg"),
            ))
            .trigger(Trigger::new("w", "onyx.triggers/segment"))
            .trigger(Trigger::new("missing", "onyx.triggers/segment"))
            .build();

        let errors = validate_references(&job);
        assert_eq!(errors.len(), 3, "{:?}", errors);
        let unknown_task = |name: &str| {
            errors.iter().any(|e| {
                matches!(e, ValidationError::UnknownTaskReference { task, .. } if task == name)
            })
        };
        assert!(unknown_task("ghost"));
        assert!(unknown_task("nowhere"));
        assert!(errors.iter().any(|e| {
            matches!(e, ValidationError::UnknownWindow { window_id, .. } if window_id == "missing")
        }));
    }

    #[test]
    fn test_validate_scheduler_balanced_has_nothing_to_check() {
        assert!(validate_scheduler(&linear().build()).is_empty());
    }

    #[test]
    fn test_validate_scheduler_percentages() {
        let mut job = linear().build();
        job.set_task_scheduler(TaskScheduler::percentage([
            ("process", 75),
            ("out", 20),
            ("gone", 1),
        ]));

        let errors = validate_scheduler(&job);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            ValidationError::PercentageTaskNotFound { task, .. } if task == "gone"
        ));
        assert!(matches!(errors[1], ValidationError::PercentageSum { total: 96, .. }));
    }
}
