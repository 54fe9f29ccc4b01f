//! Workflow: directed edges between task names

use crate::value::Value;

/// `source -> destination`: segments flow from source to destination, so
/// destination depends on source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub destination: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// `[:source :destination]`
    pub fn to_canonical(&self) -> Value {
        Value::vector([
            Value::keyword(self.source.as_str()),
            Value::keyword(self.destination.as_str()),
        ])
    }
}

/// Ordered edge list
///
/// Nodes are implied by edge endpoints. Cycles, self-loops, duplicate
/// edges and disconnected parts are all accepted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workflow {
    edges: Vec<Edge>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.edges.push(Edge::new(source, destination));
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Two-element keyword vectors, in insertion order
    pub fn to_canonical_edges(&self) -> Vec<Value> {
        self.edges.iter().map(Edge::to_canonical).collect()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for Workflow {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().map(|(s, d)| Edge::new(s, d)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, destination: &str) -> Value {
        Value::vector([Value::keyword(source), Value::keyword(destination)])
    }

    #[test]
    fn edges_keep_call_order() {
        let mut workflow = Workflow::new();
        workflow.add_edge("in", "process");
        workflow.add_edge("process", "out");
        workflow.add_edge("in", "audit");

        assert_eq!(
            workflow.to_canonical_edges(),
            vec![pair("in", "process"), pair("process", "out"), pair("in", "audit")]
        );
    }

    #[test]
    fn accepts_cycles_self_loops_and_duplicates() {
        let workflow: Workflow = [("a", "b"), ("b", "a"), ("c", "c"), ("a", "b")]
            .into_iter()
            .collect();

        assert_eq!(workflow.len(), 4);
        assert_eq!(workflow.to_canonical_edges()[2], pair("c", "c"));
    }

    #[test]
    fn empty_workflow_has_no_edges() {
        let workflow = Workflow::new();
        assert!(workflow.is_empty());
        assert!(workflow.to_canonical_edges().is_empty());
    }
}
