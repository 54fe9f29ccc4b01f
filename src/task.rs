//! Task descriptors and the catalog

use std::fmt;
use std::str::FromStr;

use crate::entries::{Entries, Entry};
use crate::error::JobError;
use crate::symbols::names;
use crate::value::{Keyword, Record, Value};

/// Ordered collection of task descriptors
pub type Catalog = Entries<Task>;

/// Property name carrying a task's percentage allocation
pub const PERCENTAGE: &str = "percentage";

/// Role of a task in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Input,
    Function,
    Output,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Input => "input",
            TaskType::Function => "function",
            TaskType::Output => "output",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(':').unwrap_or(s) {
            "input" => Ok(TaskType::Input),
            "function" => Ok(TaskType::Function),
            "output" => Ok(TaskType::Output),
            other => Err(JobError::InvalidKeyword {
                text: other.to_string(),
            }),
        }
    }
}

/// One catalog entry
///
/// Name uniqueness is not enforced; the engine resolves duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    name: String,
    task_type: TaskType,
    properties: Record,
}

impl Task {
    pub fn new(name: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            name: name.into(),
            task_type,
            properties: Record::new(),
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, TaskType::Input)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, TaskType::Function)
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, TaskType::Output)
    }

    /// Set a property (bare names are qualified with `onyx/` on coercion)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(Keyword::new(key), value.into());
    }

    /// `:onyx/fn`
    pub fn with_fn(self, function: impl Into<String>) -> Self {
        self.with("fn", Value::keyword(function))
    }

    /// `:onyx/plugin`
    pub fn with_plugin(self, plugin: impl Into<String>) -> Self {
        self.with("plugin", Value::keyword(plugin))
    }

    /// `:onyx/medium`
    pub fn with_medium(self, medium: impl Into<String>) -> Self {
        self.with("medium", Value::keyword(medium))
    }

    /// `:onyx/batch-size`
    pub fn with_batch_size(self, batch_size: u32) -> Self {
        self.with("batch-size", batch_size)
    }

    /// `:onyx/max-peers`
    pub fn with_max_peers(self, max_peers: u32) -> Self {
        self.with("max-peers", max_peers)
    }

    /// `:onyx/percentage`, read by the percentage scheduler
    pub fn with_percentage(self, percentage: u32) -> Self {
        self.with(PERCENTAGE, percentage)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl Entry for Task {
    const NAMESPACE_SYMBOL: &'static str = names::CATALOG_ENTRY;
    const KIND: &'static str = "catalog";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::keyword(self.name.as_str())),
            ("type", Value::keyword(self.task_type.as_str())),
        ]
    }

    fn properties(&self) -> &Record {
        &self.properties
    }
}
