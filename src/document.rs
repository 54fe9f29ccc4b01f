//! Canonical job document
//!
//! The immutable result of coercing a [`Job`](crate::Job). It owns its data
//! and keeps no link to the job that produced it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::edn;
use crate::error::JobError;
use crate::value::{Keyword, Record, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDocument {
    entries: Record,
}

impl CanonicalDocument {
    pub(crate) fn new(entries: Record) -> Self {
        Self { entries }
    }

    /// Value under a top-level key (keyword text, no colon)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Keyword, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_record(&self) -> &Record {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Map(self.entries)
    }

    /// EDN text, one top-level key per line
    ///
    /// Collections holding more than one map put each map on its own line.
    pub fn to_edn(&self) -> String {
        let mut out = String::from("{");
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str("\n ");
            }
            let prefix = format!("{} ", key);
            out.push_str(&prefix);

            match value {
                Value::Vector(items)
                    if items.len() > 1 && items.iter().any(|v| matches!(v, Value::Map(_))) =>
                {
                    // column of the first element: "{" or " ", the key, "["
                    let indent = " ".repeat(prefix.len() + 2);
                    out.push('[');
                    for (j, item) in items.iter().enumerate() {
                        if j > 0 {
                            out.push('\n');
                            out.push_str(&indent);
                        }
                        edn::write_value(&mut out, item);
                    }
                    out.push(']');
                }
                _ => edn::write_value(&mut out, value),
            }
        }
        out.push('}');
        out
    }

    pub fn to_json(&self) -> Result<String, JobError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, JobError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Serialize for CanonicalDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl fmt::Display for CanonicalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_edn())
    }
}
