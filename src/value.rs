//! Canonical value model
//!
//! The engine speaks EDN: keywords are distinct from strings and maps keep
//! their key order when printed. [`Value`] mirrors that model so a coerced
//! job can be rendered natively (see [`crate::edn`]) or through serde.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::JobError;

/// Keyword syntax: `name` or `ns/name`, leading `:` optional.
static KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z*+!_?<>=.\-][\w*+!?<>=.'#\-]*(?:/[A-Za-z*+!_?<>=.\-][\w*+!?<>=.'#\-]*)?$")
        .unwrap()
});

// ============================================================================
// KEYWORD
// ============================================================================

/// An engine keyword, stored without its leading colon
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Cow<'static, str>);

impl Keyword {
    /// Keyword from a static string (no allocation, no validation)
    pub const fn from_static(text: &'static str) -> Self {
        Keyword(Cow::Borrowed(text))
    }

    /// Keyword from arbitrary text, unchecked. A single leading `:` is dropped.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.strip_prefix(':') {
            Some(stripped) => Keyword(Cow::Owned(stripped.to_string())),
            None => Keyword(Cow::Owned(text)),
        }
    }

    /// Keyword from user-supplied text, checked against keyword syntax
    pub fn parse(text: &str) -> Result<Self, JobError> {
        let bare = text.strip_prefix(':').unwrap_or(text);
        if KEYWORD_PATTERN.is_match(bare) {
            Ok(Keyword(Cow::Owned(bare.to_string())))
        } else {
            Err(JobError::InvalidKeyword {
                text: text.to_string(),
            })
        }
    }

    /// `ns/name`
    pub fn qualified(namespace: &str, name: &str) -> Self {
        Keyword(Cow::Owned(format!("{}/{}", namespace, name)))
    }

    /// Text without the leading colon
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(ns, _)| ns)
    }

    pub fn name(&self) -> &str {
        self.0.split_once('/').map_or(&self.0, |(_, name)| name)
    }

    pub fn is_qualified(&self) -> bool {
        self.namespace().is_some()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A canonical engine value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Keyword(Keyword),
    Vector(Vec<Value>),
    Map(Record),
}

impl Value {
    pub fn keyword(text: impl Into<String>) -> Self {
        Value::Keyword(Keyword::new(text))
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Keyword or string text, used where either names a task
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Keyword(k) => Some(k.as_str()),
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Keyword> for Value {
    fn from(k: Keyword) -> Self {
        Value::Keyword(k)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Vector(v)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Map(r)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Keyword(k) => k.serialize(serializer),
            Value::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(record) => record.serialize(serializer),
        }
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// Insertion-ordered keyword map
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(Keyword, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace; returns the previous value
    pub fn insert(&mut self, key: Keyword, value: Value) -> Option<Value> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up by keyword text (without the colon)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Keyword, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(Keyword, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (Keyword, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}
