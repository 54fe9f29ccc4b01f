//! Lifecycle calls

use crate::entries::{Entries, Entry};
use crate::symbols::names;
use crate::value::{Keyword, Record, Value};

pub type Lifecycles = Entries<Lifecycle>;

/// Task name matching every task in a lifecycle or flow condition
pub const ALL_TASKS: &str = "all";

/// Hooks a calls map onto a task (or every task, via [`Lifecycle::all`])
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    task: String,
    calls: String,
    properties: Record,
}

impl Lifecycle {
    pub fn new(task: impl Into<String>, calls: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            calls: calls.into(),
            properties: Record::new(),
        }
    }

    /// Lifecycle applied to every task in the job
    pub fn all(calls: impl Into<String>) -> Self {
        Self::new(ALL_TASKS, calls)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(Keyword::new(key), value.into());
        self
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn calls(&self) -> &str {
        &self.calls
    }
}

impl Entry for Lifecycle {
    const NAMESPACE_SYMBOL: &'static str = names::LIFECYCLE_ENTRY;
    const KIND: &'static str = "lifecycle";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("task", Value::keyword(self.task.as_str())),
            ("calls", Value::keyword(self.calls.as_str())),
        ]
    }

    fn properties(&self) -> &Record {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edn;

    #[test]
    fn canonical_lifecycle() {
        let lifecycle = Lifecycle::new("in", "my.app/in-calls").with("doc", "open channel");
        let record = lifecycle.to_canonical(&Keyword::from_static("lifecycle"));
        assert_eq!(
            edn::to_string(&Value::Map(record)),
            "{:lifecycle/task :in, :lifecycle/calls :my.app/in-calls, \
             :lifecycle/doc \"open channel\"}"
        );
    }

    #[test]
    fn all_targets_every_task() {
        assert_eq!(Lifecycle::all("my.app/metrics").task(), "all");
    }
}
