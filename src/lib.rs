//! onyx-job - typed job builder for the Onyx dataflow engine
//!
//! Build a [`Job`] from tasks, edges, lifecycles, flow conditions, windows
//! and triggers, then coerce it into the [`CanonicalDocument`] the engine
//! accepts.

pub mod builders;
pub mod definition;
pub mod document;
pub mod edn;
pub mod entries;
pub mod error;
pub mod errors;
pub mod flow_condition;
pub mod flow_graph;
pub mod job;
pub mod lifecycle;
pub mod scheduler;
pub mod submit;
pub mod symbols;
pub mod task;
pub mod validator;
pub mod validators;
pub mod value;
pub mod window;
pub mod workflow;

pub use builders::JobBuilder;
pub use definition::JobDefinition;
pub use document::CanonicalDocument;
pub use entries::{Entries, Entry};
pub use error::{FixSuggestion, JobError};
pub use errors::{Severity, ValidationError, ValidationLayer, ValidationResult};
pub use flow_condition::{FlowCondition, FlowConditions, FlowTarget};
pub use flow_graph::WorkflowGraph;
pub use job::Job;
pub use lifecycle::{Lifecycle, Lifecycles};
pub use scheduler::TaskScheduler;
pub use submit::{submit_job, JobSubmitter, MockSubmitter, SubmittedJob};
pub use symbols::{registry, SymbolRegistry};
pub use task::{Catalog, Task, TaskType};
pub use validator::Validator;
pub use value::{Keyword, Record, Value};
pub use window::{Trigger, Triggers, Window, WindowType, Windows};
pub use workflow::{Edge, Workflow};
