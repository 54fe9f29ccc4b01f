//! Flow conditions: predicate-based routing between tasks

use crate::entries::{Entries, Entry};
use crate::symbols::names;
use crate::value::{Keyword, Record, Value};

pub type FlowConditions = Entries<FlowCondition>;

/// Where matching segments are routed
#[derive(Debug, Clone, PartialEq)]
pub enum FlowTarget {
    /// Every downstream task
    All,
    /// No downstream task
    None,
    /// These tasks
    Tasks(Vec<String>),
}

impl FlowTarget {
    pub fn tasks<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FlowTarget::Tasks(tasks.into_iter().map(Into::into).collect())
    }

    fn to_value(&self) -> Value {
        match self {
            FlowTarget::All => Value::keyword("all"),
            FlowTarget::None => Value::keyword("none"),
            FlowTarget::Tasks(tasks) => {
                Value::vector(tasks.iter().map(|t| Value::keyword(t.as_str())))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowCondition {
    from: String,
    to: FlowTarget,
    predicate: Option<Value>,
    properties: Record,
}

impl FlowCondition {
    pub fn new(from: impl Into<String>, to: FlowTarget) -> Self {
        Self {
            from: from.into(),
            to,
            predicate: None,
            properties: Record::new(),
        }
    }

    /// `:flow/predicate`, a keyword or a vector expression such as
    /// `[:and :my/a? :my/b?]`
    pub fn with_predicate(mut self, predicate: impl Into<Value>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(Keyword::new(key), value.into());
        self
    }

    /// `:flow/short-circuit?`
    pub fn short_circuit(self) -> Self {
        self.with("short-circuit?", true)
    }

    pub fn from_task(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &FlowTarget {
        &self.to
    }

    pub fn predicate(&self) -> Option<&Value> {
        self.predicate.as_ref()
    }
}

impl Entry for FlowCondition {
    const NAMESPACE_SYMBOL: &'static str = names::FLOW_CONDITIONS_ENTRY;
    const KIND: &'static str = "flow-condition";

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("from", Value::keyword(self.from.as_str())),
            ("to", self.to.to_value()),
        ];
        if let Some(predicate) = &self.predicate {
            fields.push(("predicate", predicate.clone()));
        }
        fields
    }

    fn properties(&self) -> &Record {
        &self.properties
    }
}
