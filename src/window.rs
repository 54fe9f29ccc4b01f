//! Windows and triggers

use std::fmt;
use std::str::FromStr;

use crate::entries::{Entries, Entry};
use crate::error::JobError;
use crate::symbols::names;
use crate::value::{Keyword, Record, Value};

pub type Windows = Entries<Window>;
pub type Triggers = Entries<Trigger>;

// ============================================================================
// WINDOW
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    Fixed,
    Sliding,
    Global,
    Session,
}

impl WindowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowType::Fixed => "fixed",
            WindowType::Sliding => "sliding",
            WindowType::Global => "global",
            WindowType::Session => "session",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(':').unwrap_or(s) {
            "fixed" => Ok(WindowType::Fixed),
            "sliding" => Ok(WindowType::Sliding),
            "global" => Ok(WindowType::Global),
            "session" => Ok(WindowType::Session),
            other => Err(JobError::InvalidKeyword {
                text: other.to_string(),
            }),
        }
    }
}

/// Aggregates segments of one task over a window
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    id: String,
    task: String,
    window_type: WindowType,
    aggregation: Value,
    properties: Record,
}

impl Window {
    /// `aggregation` is usually a keyword (`:onyx.windowing.aggregation/sum`)
    /// or a vector of keyword and key (`[:onyx.windowing.aggregation/sum :amount]`)
    pub fn new(
        id: impl Into<String>,
        task: impl Into<String>,
        window_type: WindowType,
        aggregation: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            window_type,
            aggregation: aggregation.into(),
            properties: Record::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(Keyword::new(key), value.into());
        self
    }

    /// `:window/window-key`
    pub fn with_window_key(self, key: impl Into<String>) -> Self {
        self.with("window-key", Value::keyword(key))
    }

    /// `:window/range`, e.g. `[5 :minutes]`
    pub fn with_range(self, amount: i64, unit: impl Into<String>) -> Self {
        self.with("range", Value::vector([Value::Int(amount), Value::keyword(unit)]))
    }

    /// `:window/slide`
    pub fn with_slide(self, amount: i64, unit: impl Into<String>) -> Self {
        self.with("slide", Value::vector([Value::Int(amount), Value::keyword(unit)]))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }
}

impl Entry for Window {
    const NAMESPACE_SYMBOL: &'static str = names::WINDOW_ENTRY;
    const KIND: &'static str = "window";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::keyword(self.id.as_str())),
            ("task", Value::keyword(self.task.as_str())),
            ("type", Value::keyword(self.window_type.as_str())),
            ("aggregation", self.aggregation.clone()),
        ]
    }

    fn properties(&self) -> &Record {
        &self.properties
    }
}

// ============================================================================
// TRIGGER
// ============================================================================

/// Fires a sync function when a window's trigger condition holds
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    window_id: String,
    on: String,
    properties: Record,
}

impl Trigger {
    pub fn new(window_id: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            window_id: window_id.into(),
            on: on.into(),
            properties: Record::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(Keyword::new(key), value.into());
        self
    }

    /// `:trigger/sync`
    pub fn with_sync(self, sync: impl Into<String>) -> Self {
        self.with("sync", Value::keyword(sync))
    }

    /// `:trigger/refinement`
    pub fn with_refinement(self, refinement: impl Into<String>) -> Self {
        self.with("refinement", Value::keyword(refinement))
    }

    /// `:trigger/threshold`, e.g. `[5 :elements]`
    pub fn with_threshold(self, amount: i64, unit: impl Into<String>) -> Self {
        self.with("threshold", Value::vector([Value::Int(amount), Value::keyword(unit)]))
    }

    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    pub fn on(&self) -> &str {
        &self.on
    }
}

impl Entry for Trigger {
    const NAMESPACE_SYMBOL: &'static str = names::TRIGGER_ENTRY;
    const KIND: &'static str = "trigger";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("window-id", Value::keyword(self.window_id.as_str())),
            ("on", Value::keyword(self.on.as_str())),
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
    fn canonical_window() {
        let window = Window::new(
            "collect",
            "process",
            WindowType::Fixed,
            Value::keyword("onyx.windowing.aggregation/conj"),
        )
        .with_window_key("event-time")
        .with_range(5, "minutes");

        let record = window.to_canonical(&Keyword::from_static("window"));
        assert_eq!(
            edn::to_string(&Value::Map(record)),
            "{:window/id :collect, :window/task :process, :window/type :fixed, \
             :window/aggregation :onyx.windowing.aggregation/conj, \
             :window/window-key :event-time, :window/range [5 :minutes]}"
        );
    }

    #[test]
    fn canonical_trigger() {
        let trigger = Trigger::new("collect", "onyx.triggers/segment")
            .with_threshold(5, "elements")
            .with_sync("my.app/dump-window!");

        let record = trigger.to_canonical(&Keyword::from_static("trigger"));
        assert_eq!(
            edn::to_string(&Value::Map(record)),
            "{:trigger/window-id :collect, :trigger/on :onyx.triggers/segment, \
             :trigger/threshold [5 :elements], :trigger/sync :my.app/dump-window!}"
        );
    }

    #[test]
    fn window_type_from_str() {
        assert_eq!("session".parse::<WindowType>().unwrap(), WindowType::Session);
        assert!("tumbling".parse::<WindowType>().is_err());
    }
}
