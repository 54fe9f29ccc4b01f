//! Builder pattern for ergonomic job construction
//!
//! Provides a fluent API over [`Job`]'s mutation operations.

use crate::flow_condition::{FlowCondition, FlowTarget};
use crate::job::Job;
use crate::lifecycle::Lifecycle;
use crate::scheduler::TaskScheduler;
use crate::task::{Task, TaskType};
use crate::value::Value;
use crate::window::{Trigger, Window, WindowType};

// ============================================================================
// JOB BUILDER
// ============================================================================

/// Fluent builder for constructing jobs
///
/// `build()` never fails: nothing is validated here.
#[derive(Debug, Clone, Default)]
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing job (deep copy)
    pub fn from_job(job: &Job) -> Self {
        Self { job: job.clone() }
    }

    pub fn scheduler(mut self, scheduler: TaskScheduler) -> Self {
        self.job.set_task_scheduler(scheduler);
        self
    }

    pub fn balanced(self) -> Self {
        self.scheduler(TaskScheduler::Balanced)
    }

    /// Give `task` a percentage share, switching to the percentage scheduler
    pub fn percentage(mut self, task: impl Into<String>, share: u32) -> Self {
        let mut scheduler = self.job.task_scheduler().clone();
        scheduler.set_percentage(task, share);
        self.job.set_task_scheduler(scheduler);
        self
    }

    /// Add a workflow edge
    pub fn edge(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.job.add_workflow_edge(source, destination);
        self
    }

    /// Add a linear chain of edges: `a -> b -> c`
    pub fn chain<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tasks: Vec<String> = tasks.into_iter().map(Into::into).collect();
        for pair in tasks.windows(2) {
            self.job.add_workflow_edge(pair[0].clone(), pair[1].clone());
        }
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.job.add_catalog_task(task);
        self
    }

    /// Add a task using a closure over the new descriptor
    pub fn with_task<F>(self, name: &str, task_type: TaskType, f: F) -> Self
    where
        F: FnOnce(Task) -> Task,
    {
        self.task(f(Task::new(name, task_type)))
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.job.add_lifecycle(lifecycle);
        self
    }

    pub fn flow_condition(mut self, condition: FlowCondition) -> Self {
        self.job.add_flow_condition(condition);
        self
    }

    /// Route segments from `from` to `to` when `predicate` holds
    pub fn route<I, S>(self, from: &str, to: I, predicate: impl Into<Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flow_condition(
            FlowCondition::new(from, FlowTarget::tasks(to)).with_predicate(predicate),
        )
    }

    pub fn window(mut self, window: Window) -> Self {
        self.job.add_window(window);
        self
    }

    /// Add a window using a closure over the new definition
    pub fn with_window<F>(
        self,
        id: &str,
        task: &str,
        window_type: WindowType,
        aggregation: impl Into<Value>,
        f: F,
    ) -> Self
    where
        F: FnOnce(Window) -> Window,
    {
        self.window(f(Window::new(id, task, window_type, aggregation)))
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.job.add_trigger(trigger);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_linear_job() {
        let job = JobBuilder::new()
            .chain(["in", "inc", "out"])
            .with_task("in", TaskType::Input, |t| t.with_batch_size(10))
            .with_task("inc", TaskType::Function, |t| t.with_fn("my.app/inc"))
            .with_task("out", TaskType::Output, |t| t.with_batch_size(10))
            .build();

        assert_eq!(job.workflow().len(), 2);
        assert_eq!(job.workflow().edges()[1].source, "inc");
        assert_eq!(job.catalog().len(), 3);
        assert_eq!(job.task_scheduler(), &TaskScheduler::Balanced);
    }

    #[test]
    fn chain_of_one_adds_nothing() {
        let job = JobBuilder::new().chain(["solo"]).build();
        assert!(job.workflow().is_empty());
    }

    #[test]
    fn percentage_accumulates() {
        let job = JobBuilder::new()
            .percentage("process", 75)
            .percentage("out", 25)
            .build();

        let shares = job.task_scheduler().percentages().unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares.get("process"), Some(&75));
    }

    #[test]
    fn route_and_window() {
        let job = JobBuilder::new()
            .route("process", ["out"], Value::keyword("my.app/even?"))
            .with_window(
                "sums",
                "process",
                WindowType::Fixed,
                Value::keyword("onyx.windowing.aggregation/sum"),
                |w| w.with_range(1, "hour"),
            )
            .trigger(Trigger::new("sums", "onyx.triggers/timer"))
            .build();

        assert_eq!(job.flow_conditions().len(), 1);
        assert_eq!(job.windows().get(0).unwrap().id(), "sums");
        assert_eq!(job.triggers().get(0).unwrap().window_id(), "sums");
    }

    #[test]
    fn from_job_copies() {
        let original = JobBuilder::new().edge("a", "b").build();
        let extended = JobBuilder::from_job(&original).edge("b", "c").build();

        assert_eq!(original.workflow().len(), 1);
        assert_eq!(extended.workflow().len(), 2);
    }
}
