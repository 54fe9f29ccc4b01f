//! Job definition files
//!
//! A YAML (or JSON) description of a job. Top-level keys mirror the
//! canonical document; every section is optional.
//!
//! ```yaml
//! task-scheduler: balanced
//! workflow:
//!   - [in, out]
//! catalog:
//!   - { name: in, type: input, plugin: ":onyx.plugin.core-async/input" }
//!   - { name: out, type: output, plugin: ":onyx.plugin.core-async/output" }
//! ```
//!
//! Strings starting with `:` become keywords. Entry keys other than the
//! required ones become properties, in file order.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_yaml::{Mapping, Value as Yaml};
use tracing::{debug, instrument};

use crate::error::JobError;
use crate::flow_condition::{FlowCondition, FlowTarget};
use crate::job::Job;
use crate::lifecycle::Lifecycle;
use crate::scheduler::TaskScheduler;
use crate::task::{Task, TaskType};
use crate::value::{Keyword, Record, Value};
use crate::window::{Trigger, Window, WindowType};

/// Raw job definition as read from a file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JobDefinition {
    #[serde(default)]
    pub task_scheduler: Option<Yaml>,
    #[serde(default)]
    pub workflow: Vec<(String, String)>,
    #[serde(default)]
    pub catalog: Vec<Mapping>,
    #[serde(default)]
    pub lifecycles: Vec<Mapping>,
    #[serde(default)]
    pub flow_conditions: Vec<Mapping>,
    #[serde(default)]
    pub windows: Vec<Mapping>,
    #[serde(default)]
    pub triggers: Vec<Mapping>,
}

impl JobDefinition {
    pub fn from_yaml_str(text: &str) -> Result<Self, JobError> {
        Ok(serde_yaml::from_str(text)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let definition = Self::from_yaml_str(&text)?;
        debug!(
            edges = definition.workflow.len(),
            tasks = definition.catalog.len(),
            "loaded job definition"
        );
        Ok(definition)
    }

    /// Build the job. Entries keep file order.
    pub fn into_job(self) -> Result<Job, JobError> {
        let mut job = Job::default();

        for (source, destination) in &self.workflow {
            job.add_workflow_edge(task_name(source)?, task_name(destination)?);
        }

        for (index, map) in self.catalog.iter().enumerate() {
            job.add_catalog_task(task_entry(map, index)?);
        }
        for (index, map) in self.lifecycles.iter().enumerate() {
            job.add_lifecycle(lifecycle_entry(map, index)?);
        }
        for (index, map) in self.flow_conditions.iter().enumerate() {
            job.add_flow_condition(flow_condition_entry(map, index)?);
        }
        for (index, map) in self.windows.iter().enumerate() {
            job.add_window(window_entry(map, index)?);
        }
        for (index, map) in self.triggers.iter().enumerate() {
            job.add_trigger(trigger_entry(map, index)?);
        }

        // Resolved last: a bare `percentage` reads shares from the catalog
        let scheduler = match &self.task_scheduler {
            Some(raw) => scheduler(raw, &job)?,
            None => TaskScheduler::Balanced,
        };
        job.set_task_scheduler(scheduler);

        Ok(job)
    }
}

// ============================================================================
// VALUE CONVERSION
// ============================================================================

/// Convert a YAML value to a canonical value
pub fn to_value(yaml: &Yaml) -> Result<Value, JobError> {
    match yaml {
        Yaml::Null => Ok(Value::Nil),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => Ok(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Yaml::String(s) if s.starts_with(':') => Ok(Value::Keyword(Keyword::parse(s)?)),
        Yaml::String(s) => Ok(Value::Str(s.clone())),
        Yaml::Sequence(items) => Ok(Value::Vector(
            items.iter().map(to_value).collect::<Result<_, _>>()?,
        )),
        Yaml::Mapping(map) => {
            let mut record = Record::with_capacity(map.len());
            for (key, value) in map {
                record.insert(key_of(key)?, to_value(value)?);
            }
            Ok(Value::Map(record))
        }
        Yaml::Tagged(tagged) => to_value(&tagged.value),
    }
}

fn key_of(key: &Yaml) -> Result<Keyword, JobError> {
    match key {
        Yaml::String(s) => Keyword::parse(s),
        other => Err(JobError::InvalidKeyword {
            text: format!("{:?}", other),
        }),
    }
}

fn strip_colon(text: &str) -> &str {
    text.strip_prefix(':').unwrap_or(text)
}

/// A task name as it appears in the document: keyword text, no colon
fn task_name(text: &str) -> Result<String, JobError> {
    Ok(Keyword::parse(text)?.as_str().to_string())
}

// ============================================================================
// ENTRY EXTRACTION
// ============================================================================

/// One entry map with its position, for error reporting
struct RawEntry<'a> {
    kind: &'static str,
    index: usize,
    map: &'a Mapping,
}

impl<'a> RawEntry<'a> {
    fn new(kind: &'static str, index: usize, map: &'a Mapping) -> Self {
        Self { kind, index, map }
    }

    fn required(&self, field: &'static str) -> Result<&'a Yaml, JobError> {
        self.map.get(field).ok_or(JobError::MissingField {
            kind: self.kind,
            index: self.index,
            field,
        })
    }

    /// A required task, window or function name
    fn name(&self, field: &'static str) -> Result<String, JobError> {
        match self.required(field)? {
            Yaml::String(s) => task_name(s),
            other => Err(self.invalid(field, format!("expected a name, found {:?}", other))),
        }
    }

    fn invalid(&self, field: &str, details: impl Into<String>) -> JobError {
        JobError::InvalidField {
            kind: self.kind,
            index: self.index,
            field: field.to_string(),
            details: details.into(),
        }
    }

    /// Everything but `reserved`, in file order
    fn properties(&self, reserved: &[&str]) -> Result<Vec<(String, Value)>, JobError> {
        let mut properties = Vec::new();
        for (key, value) in self.map {
            if key
                .as_str()
                .is_some_and(|k| reserved.contains(&strip_colon(k)))
            {
                continue;
            }
            let key = key_of(key)?;
            properties.push((key.as_str().to_string(), to_value(value)?));
        }
        Ok(properties)
    }
}

fn task_entry(map: &Mapping, index: usize) -> Result<Task, JobError> {
    let raw = RawEntry::new("catalog", index, map);
    let name = raw.name("name")?;
    let task_type = match raw.required("type")? {
        Yaml::String(s) => TaskType::from_str(s)
            .map_err(|_| raw.invalid("type", format!("unknown task type '{}'", s)))?,
        other => {
            let details = format!("expected a task type, found {:?}", other);
            return Err(raw.invalid("type", details));
        }
    };

    let mut task = Task::new(name, task_type);
    for (key, value) in raw.properties(&["name", "type"])? {
        task.set(key, value);
    }
    Ok(task)
}

fn lifecycle_entry(map: &Mapping, index: usize) -> Result<Lifecycle, JobError> {
    let raw = RawEntry::new("lifecycle", index, map);
    let mut lifecycle = Lifecycle::new(raw.name("task")?, raw.name("calls")?);
    for (key, value) in raw.properties(&["task", "calls"])? {
        lifecycle = lifecycle.with(key, value);
    }
    Ok(lifecycle)
}

fn flow_condition_entry(map: &Mapping, index: usize) -> Result<FlowCondition, JobError> {
    let raw = RawEntry::new("flow condition", index, map);
    let from = raw.name("from")?;
    let to = match raw.required("to")? {
        Yaml::String(s) => match strip_colon(s) {
            "all" => FlowTarget::All,
            "none" => FlowTarget::None,
            // A lone task name
            _ => FlowTarget::tasks([task_name(s)?]),
        },
        Yaml::Sequence(items) => {
            let mut tasks = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Yaml::String(s) => tasks.push(task_name(s)?),
                    other => {
                        let details = format!("expected a task name, found {:?}", other);
                        return Err(raw.invalid("to", details));
                    }
                }
            }
            FlowTarget::Tasks(tasks)
        }
        other => {
            let details = format!("expected a list of tasks, all or none, found {:?}", other);
            return Err(raw.invalid("to", details));
        }
    };

    let mut condition = FlowCondition::new(from, to);
    if let Some(predicate) = map.get("predicate") {
        condition = condition.with_predicate(to_value(predicate)?);
    }
    for (key, value) in raw.properties(&["from", "to", "predicate"])? {
        condition = condition.with(key, value);
    }
    Ok(condition)
}

fn window_entry(map: &Mapping, index: usize) -> Result<Window, JobError> {
    let raw = RawEntry::new("window", index, map);
    let id = raw.name("id")?;
    let task = raw.name("task")?;
    let window_type = match raw.required("type")? {
        Yaml::String(s) => WindowType::from_str(s)
            .map_err(|_| raw.invalid("type", format!("unknown window type '{}'", s)))?,
        other => {
            let details = format!("expected a window type, found {:?}", other);
            return Err(raw.invalid("type", details));
        }
    };
    let aggregation = to_value(raw.required("aggregation")?)?;

    let mut window = Window::new(id, task, window_type, aggregation);
    for (key, value) in raw.properties(&["id", "task", "type", "aggregation"])? {
        window = window.with(key, value);
    }
    Ok(window)
}

fn trigger_entry(map: &Mapping, index: usize) -> Result<Trigger, JobError> {
    let raw = RawEntry::new("trigger", index, map);
    let mut trigger = Trigger::new(raw.name("window-id")?, raw.name("on")?);
    for (key, value) in raw.properties(&["window-id", "on"])? {
        trigger = trigger.with(key, value);
    }
    Ok(trigger)
}

/// `balanced`, `percentage` (shares from catalog `percentage` properties),
/// or `{ percentage: { task: share, ... } }`
fn scheduler(raw: &Yaml, job: &Job) -> Result<TaskScheduler, JobError> {
    let invalid = |details: String| JobError::InvalidField {
        kind: "task-scheduler",
        index: 0,
        field: "task-scheduler".to_string(),
        details,
    };

    match raw {
        Yaml::String(s) => match strip_colon(s) {
            "balanced" | "onyx.task-scheduler/balanced" => Ok(TaskScheduler::Balanced),
            "percentage" | "onyx.task-scheduler/percentage" => {
                Ok(TaskScheduler::from_catalog(job.catalog()))
            }
            other => Err(invalid(format!("unknown scheduler '{}'", other))),
        },
        Yaml::Mapping(map) => {
            let shares = map
                .get("percentage")
                .ok_or_else(|| invalid("expected a 'percentage' map".to_string()))?;
            let shares: BTreeMap<String, u32> = serde_yaml::from_value(shares.clone())
                .map_err(|e| invalid(format!("percentages: {}", e)))?;
            Ok(TaskScheduler::Percentage(shares))
        }
        other => Err(invalid(format!("expected a scheduler name, found {:?}", other))),
    }
}
