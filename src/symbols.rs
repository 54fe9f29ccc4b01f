//! Symbol registry for canonical engine keywords
//!
//! Maps the internal names used by the job model to the keywords the engine
//! recognises. The table is fixed at compile time and materialised once into
//! a process-wide registry; reads need no synchronisation.
//!
//! Entry-kind symbols (`catalog-entry`, `window-entry`, ...) resolve to the
//! namespace that qualifies that entry's field names, so a catalog field
//! `batch-size` becomes `:onyx/batch-size`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::JobError;
use crate::value::Keyword;

/// Internal symbol names
pub mod names {
    // Top-level document keys
    pub const TASK_SCHEDULER: &str = "task-scheduler";
    pub const WORKFLOW: &str = "workflow";
    pub const CATALOG: &str = "catalog";
    pub const LIFECYCLES: &str = "lifecycles";
    pub const FLOW_CONDITIONS: &str = "flow-conditions";
    pub const WINDOWS: &str = "windows";
    pub const TRIGGERS: &str = "triggers";

    // Entry field namespaces
    pub const CATALOG_ENTRY: &str = "catalog-entry";
    pub const LIFECYCLE_ENTRY: &str = "lifecycle-entry";
    pub const FLOW_CONDITIONS_ENTRY: &str = "flow-conditions-entry";
    pub const WINDOW_ENTRY: &str = "window-entry";
    pub const TRIGGER_ENTRY: &str = "trigger-entry";

    // Task scheduling
    pub const BALANCED_TASK_SCHEDULE: &str = "balanced";
    pub const PERCENT_TASK_SCHEDULE: &str = "percentage";
    pub const SCHEDULER_POLICY: &str = "scheduler-policy";
    pub const SCHEDULER_PERCENTAGES: &str = "scheduler-percentages";
}

/// Canonical Onyx keywords, keyed by internal name
const ONYX_SYMBOLS: &[(&str, &str)] = &[
    (names::TASK_SCHEDULER, "task-scheduler"),
    (names::WORKFLOW, "workflow"),
    (names::CATALOG, "catalog"),
    (names::LIFECYCLES, "lifecycles"),
    (names::FLOW_CONDITIONS, "flow-conditions"),
    (names::WINDOWS, "windows"),
    (names::TRIGGERS, "triggers"),
    (names::CATALOG_ENTRY, "onyx"),
    (names::LIFECYCLE_ENTRY, "lifecycle"),
    (names::FLOW_CONDITIONS_ENTRY, "flow"),
    (names::WINDOW_ENTRY, "window"),
    (names::TRIGGER_ENTRY, "trigger"),
    (names::BALANCED_TASK_SCHEDULE, "onyx.task-scheduler/balanced"),
    (names::PERCENT_TASK_SCHEDULE, "onyx.task-scheduler/percentage"),
    (names::SCHEDULER_POLICY, "onyx.task-scheduler/policy"),
    (names::SCHEDULER_PERCENTAGES, "onyx.task-scheduler/percentages"),
];

/// Global registry (read-only after first access)
static REGISTRY: Lazy<SymbolRegistry> = Lazy::new(SymbolRegistry::onyx);

/// The process-wide Onyx registry
#[inline]
pub fn registry() -> &'static SymbolRegistry {
    &REGISTRY
}

/// Lookup table from internal names to canonical keywords
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    symbols: HashMap<&'static str, Keyword>,
}

impl SymbolRegistry {
    /// Registry holding the standard Onyx table
    pub fn onyx() -> Self {
        let symbols = ONYX_SYMBOLS
            .iter()
            .map(|(name, canonical)| (*name, Keyword::from_static(canonical)))
            .collect();
        Self { symbols }
    }

    /// Registry with no symbols at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or override a symbol
    pub fn with(mut self, name: &'static str, canonical: Keyword) -> Self {
        self.symbols.insert(name, canonical);
        self
    }

    /// Drop a symbol
    pub fn without(mut self, name: &str) -> Self {
        self.symbols.remove(name);
        self
    }

    /// Canonical keyword for `name`, or `MissingSymbol`
    pub fn resolve(&self, name: &str) -> Result<&Keyword, JobError> {
        self.symbols
            .get(name)
            .ok_or_else(|| JobError::MissingSymbol {
                symbol: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onyx_registry_resolves_document_keys() {
        let registry = SymbolRegistry::onyx();
        for name in [
            names::TASK_SCHEDULER,
            names::WORKFLOW,
            names::CATALOG,
            names::LIFECYCLES,
            names::FLOW_CONDITIONS,
            names::WINDOWS,
            names::TRIGGERS,
        ] {
            assert_eq!(registry.resolve(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn scheduler_identifiers() {
        let registry = registry();
        assert_eq!(
            registry.resolve(names::BALANCED_TASK_SCHEDULE).unwrap().to_string(),
            ":onyx.task-scheduler/balanced"
        );
        assert_eq!(
            registry.resolve(names::PERCENT_TASK_SCHEDULE).unwrap().to_string(),
            ":onyx.task-scheduler/percentage"
        );
    }

    #[test]
    fn entry_namespaces() {
        let registry = registry();
        assert_eq!(registry.resolve(names::CATALOG_ENTRY).unwrap().as_str(), "onyx");
        assert_eq!(registry.resolve(names::FLOW_CONDITIONS_ENTRY).unwrap().as_str(), "flow");
    }

    #[test]
    fn missing_symbol_is_an_error() {
        let registry = SymbolRegistry::onyx().without(names::WINDOWS);
        match registry.resolve(names::WINDOWS) {
            Err(JobError::MissingSymbol { symbol }) => assert_eq!(symbol, "windows"),
            other => panic!("expected MissingSymbol, got {:?}", other),
        }
        assert!(SymbolRegistry::empty().is_empty());
    }

    #[test]
    fn with_overrides_existing() {
        let registry = SymbolRegistry::onyx()
            .with(names::CATALOG_ENTRY, Keyword::from_static("task"));
        assert_eq!(registry.resolve(names::CATALOG_ENTRY).unwrap().as_str(), "task");
        assert_eq!(registry.len(), ONYX_SYMBOLS.len());
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::thread;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    for _ in 0..100 {
                        assert!(registry().resolve(names::CATALOG).is_ok());
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
    }
}
