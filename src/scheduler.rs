//! Task scheduler policies
//!
//! Decide how the engine spreads peers across a job's tasks.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::error::JobError;
use crate::symbols::{names, SymbolRegistry};
use crate::task::{Catalog, PERCENTAGE};
use crate::value::{Keyword, Record, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskScheduler {
    /// Peers spread evenly over tasks
    #[default]
    Balanced,
    /// Each task receives a share of the peers, keyed by task name.
    /// Shares are not required to sum to 100.
    Percentage(BTreeMap<String, u32>),
}

impl TaskScheduler {
    pub fn percentage<I, S>(shares: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        TaskScheduler::Percentage(shares.into_iter().map(|(t, p)| (t.into(), p)).collect())
    }

    /// Percentage policy built from catalog tasks carrying a `percentage` property
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut shares = BTreeMap::new();
        for task in catalog {
            let Some(value) = task.property(PERCENTAGE) else {
                continue;
            };
            match value.as_int().and_then(|p| u32::try_from(p).ok()) {
                Some(share) => {
                    shares.insert(task.name().to_string(), share);
                }
                None => warn!(
                    task = task.name(),
                    value = ?value,
                    "ignoring non-integer percentage"
                ),
            }
        }
        TaskScheduler::Percentage(shares)
    }

    /// Set one task's share, switching a balanced policy to percentage
    pub fn set_percentage(&mut self, task: impl Into<String>, share: u32) {
        match self {
            TaskScheduler::Percentage(shares) => {
                shares.insert(task.into(), share);
            }
            TaskScheduler::Balanced => {
                *self = TaskScheduler::Percentage(BTreeMap::from([(task.into(), share)]));
            }
        }
    }

    pub fn percentages(&self) -> Option<&BTreeMap<String, u32>> {
        match self {
            TaskScheduler::Percentage(shares) => Some(shares),
            TaskScheduler::Balanced => None,
        }
    }

    /// Registry symbol naming this policy
    pub fn symbol(&self) -> &'static str {
        match self {
            TaskScheduler::Balanced => names::BALANCED_TASK_SCHEDULE,
            TaskScheduler::Percentage(_) => names::PERCENT_TASK_SCHEDULE,
        }
    }

    /// Balanced coerces to the bare policy keyword; percentage to a map of
    /// the policy keyword and the per-task shares (ordered by task name).
    pub fn to_canonical(&self, registry: &SymbolRegistry) -> Result<Value, JobError> {
        let policy = registry.resolve(self.symbol())?.clone();
        match self {
            TaskScheduler::Balanced => Ok(Value::Keyword(policy)),
            TaskScheduler::Percentage(shares) => {
                let shares: Record = shares
                    .iter()
                    .map(|(task, share)| (Keyword::new(task.as_str()), Value::from(*share)))
                    .collect();

                let mut record = Record::with_capacity(2);
                record.insert(
                    registry.resolve(names::SCHEDULER_POLICY)?.clone(),
                    Value::Keyword(policy),
                );
                record.insert(
                    registry.resolve(names::SCHEDULER_PERCENTAGES)?.clone(),
                    Value::Map(shares),
                );
                Ok(Value::Map(record))
            }
        }
    }
}

impl fmt::Display for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
