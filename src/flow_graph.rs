//! Graph analysis over a workflow's edges (Arc<str> optimized)
//!
//! Coercion never needs this; the validator does.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::workflow::Workflow;

/// Adjacency view of a workflow
///
/// Uses Arc<str> internally for zero-cost cloning.
pub struct WorkflowGraph {
    /// task -> successors, in edge order
    adjacency: HashMap<Arc<str>, Vec<Arc<str>>>,
    /// task -> predecessors, in edge order
    predecessors: HashMap<Arc<str>, Vec<Arc<str>>>,
    /// Tasks in order of first appearance
    tasks: Vec<Arc<str>>,
}

impl WorkflowGraph {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut adjacency: HashMap<Arc<str>, Vec<Arc<str>>> = HashMap::new();
        let mut predecessors: HashMap<Arc<str>, Vec<Arc<str>>> = HashMap::new();
        let mut tasks: Vec<Arc<str>> = Vec::new();
        let mut seen: HashSet<Arc<str>> = HashSet::new();

        // One Arc per task, reused for every edge
        let mut intern = |name: &str| -> Arc<str> {
            if let Some(existing) = seen.get(name) {
                return Arc::clone(existing);
            }
            let id: Arc<str> = Arc::from(name);
            seen.insert(Arc::clone(&id));
            tasks.push(Arc::clone(&id));
            id
        };

        for edge in workflow.edges() {
            let source = intern(&edge.source);
            let destination = intern(&edge.destination);

            adjacency
                .entry(Arc::clone(&source))
                .or_default()
                .push(Arc::clone(&destination));
            predecessors.entry(destination).or_default().push(source);
        }

        Self {
            adjacency,
            predecessors,
            tasks,
        }
    }

    /// Every task named by an edge, in order of first appearance
    pub fn tasks(&self) -> &[Arc<str>] {
        &self.tasks
    }

    pub fn contains(&self, task: &str) -> bool {
        self.adjacency.contains_key(task) || self.predecessors.contains_key(task)
    }

    #[inline]
    pub fn successors(&self, task: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.adjacency
            .get(task)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY)
    }

    #[inline]
    pub fn predecessors(&self, task: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.predecessors
            .get(task)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY)
    }

    /// Tasks with no incoming edge (typically inputs)
    pub fn roots(&self) -> Vec<Arc<str>> {
        self.tasks
            .iter()
            .filter(|t| self.predecessors(t).is_empty())
            .cloned()
            .collect()
    }

    /// Tasks with no outgoing edge (typically outputs)
    pub fn leaves(&self) -> Vec<Arc<str>> {
        self.tasks
            .iter()
            .filter(|t| self.successors(t).is_empty())
            .cloned()
            .collect()
    }

    /// Check if there's a path from `from` to `to` (BFS)
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        queue.push_back(from);
        visited.insert(from);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.successors(current) {
                if neighbor.as_ref() == to {
                    return true;
                }
                if visited.insert(neighbor.as_ref()) {
                    queue.push_back(neighbor.as_ref());
                }
            }
        }

        false
    }

    /// First cycle found by DFS, as a closed path (`a -> b -> a`)
    pub fn find_cycle(&self) -> Option<Vec<Arc<str>>> {
        self.first_cycle(false)
    }

    /// First cycle spanning at least two tasks; self-loops are ignored
    pub fn find_cycle_excluding_self_loops(&self) -> Option<Vec<Arc<str>>> {
        self.first_cycle(true)
    }

    fn first_cycle(&self, skip_self_loops: bool) -> Option<Vec<Arc<str>>> {
        fn visit<'a>(
            graph: &'a WorkflowGraph,
            node: &'a Arc<str>,
            skip_self_loops: bool,
            visited: &mut HashSet<&'a str>,
            on_stack: &mut HashSet<&'a str>,
            path: &mut Vec<&'a Arc<str>>,
        ) -> Option<Vec<Arc<str>>> {
            visited.insert(node.as_ref());
            on_stack.insert(node.as_ref());
            path.push(node);

            for next in graph.successors(node) {
                if skip_self_loops && next == node {
                    continue;
                }
                if on_stack.contains(next.as_ref()) {
                    let start = path.iter().position(|n| *n == next)?;
                    let mut cycle: Vec<Arc<str>> =
                        path[start..].iter().map(|n| Arc::clone(n)).collect();
                    cycle.push(Arc::clone(next));
                    return Some(cycle);
                }
                if !visited.contains(next.as_ref()) {
                    let found = visit(graph, next, skip_self_loops, visited, on_stack, path);
                    if found.is_some() {
                        return found;
                    }
                }
            }

            on_stack.remove(node.as_ref());
            path.pop();
            None
        }

        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for task in &self.tasks {
            if !visited.contains(task.as_ref()) {
                let found = visit(
                    self,
                    task,
                    skip_self_loops,
                    &mut visited,
                    &mut on_stack,
                    &mut path,
                );
                if found.is_some() {
                    return found;
                }
            }
        }
        None
    }
}
