//! Ordered entry collections with canonical projection
//!
//! Catalog, lifecycles, flow conditions, windows and triggers all share the
//! same shape: an ordered list of records that is projected, in insertion
//! order, into a vector of keyword maps. [`Entries`] implements that once;
//! the [`Entry`] trait supplies each record type's fields and namespace.

use std::fmt;

use tracing::trace;

use crate::error::JobError;
use crate::symbols::SymbolRegistry;
use crate::value::{Keyword, Record, Value};

/// A record type that can live in an [`Entries`] collection
pub trait Entry: Clone + fmt::Debug {
    /// Registry symbol resolving to this entry's field namespace
    const NAMESPACE_SYMBOL: &'static str;

    /// Short label for logs and errors
    const KIND: &'static str;

    /// Typed fields in canonical order, keyed by bare field name
    fn fields(&self) -> Vec<(&'static str, Value)>;

    /// Open-ended properties, applied after the typed fields
    fn properties(&self) -> &Record;

    /// Project into a keyword map under `namespace`
    ///
    /// Bare names are qualified (`batch-size` -> `onyx/batch-size`); names
    /// that already carry a namespace are kept. A property that collides
    /// with a typed field replaces the field's value.
    fn to_canonical(&self, namespace: &Keyword) -> Record {
        let properties = self.properties();
        let fields = self.fields();
        let mut record = Record::with_capacity(fields.len() + properties.len());

        for (field, value) in fields {
            record.insert(Keyword::qualified(namespace.as_str(), field), value);
        }
        for (key, value) in properties.iter() {
            record.insert(qualify(namespace, key), value.clone());
        }
        record
    }
}

fn qualify(namespace: &Keyword, key: &Keyword) -> Keyword {
    if key.is_qualified() {
        key.clone()
    } else {
        Keyword::qualified(namespace.as_str(), key.as_str())
    }
}

/// Ordered collection of entries of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<E> {
    entries: Vec<E>,
}

impl<E> Default for Entries<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Entry> Entries<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; no uniqueness or reference checks
    pub fn add(&mut self, entry: E) {
        self.entries.push(entry);
    }

    /// Replace every entry
    pub fn set_all(&mut self, entries: impl IntoIterator<Item = E>) {
        self.entries = entries.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Canonical vector of keyword maps, in insertion order
    pub fn to_canonical_sequence(
        &self,
        registry: &SymbolRegistry,
    ) -> Result<Vec<Value>, JobError> {
        let namespace = registry.resolve(E::NAMESPACE_SYMBOL)?;
        trace!(
            kind = E::KIND,
            count = self.entries.len(),
            namespace = %namespace,
            "projecting entries"
        );

        Ok(self
            .entries
            .iter()
            .map(|entry| Value::Map(entry.to_canonical(namespace)))
            .collect())
    }
}

impl<E: Entry> FromIterator<E> for Entries<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<E: Entry> Extend<E> for Entries<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a, E> IntoIterator for &'a Entries<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
