//! Submission boundary
//!
//! The engine takes a [`CanonicalDocument`] and answers with the ids it
//! assigned. [`MockSubmitter`] records documents instead of talking to a
//! cluster.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, instrument};

use crate::document::CanonicalDocument;
use crate::error::JobError;
use crate::job::Job;
use crate::symbols::{names, registry};

/// Ids assigned by the engine on submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub job_id: String,
    pub task_ids: Vec<String>,
}

/// Anything that can accept a coerced job
pub trait JobSubmitter: Send + Sync {
    fn name(&self) -> &str;

    fn submit(&self, document: CanonicalDocument) -> Result<SubmittedJob, JobError>;
}

/// Coerce `job` against the process-wide registry and submit it
#[instrument(skip_all, fields(submitter = submitter.name()))]
pub fn submit_job(submitter: &dyn JobSubmitter, job: &Job) -> Result<SubmittedJob, JobError> {
    let document = job.to_canonical_document()?;
    let submitted = submitter.submit(document)?;
    debug!(job_id = %submitted.job_id, tasks = submitted.task_ids.len(), "submitted job");
    Ok(submitted)
}

/// Task names listed in a document's catalog, in catalog order
pub fn catalog_task_names(document: &CanonicalDocument) -> Vec<String> {
    let registry = registry();
    let (Ok(catalog_key), Ok(namespace)) = (
        registry.resolve(names::CATALOG),
        registry.resolve(names::CATALOG_ENTRY),
    ) else {
        return Vec::new();
    };
    let name_key = format!("{}/name", namespace.as_str());

    document
        .get(catalog_key.as_str())
        .and_then(|c| c.as_vector())
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| entry.as_map()?.get(&name_key)?.as_name())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// MOCK
// ============================================================================

/// Records submitted documents and hands out sequential ids
pub struct MockSubmitter {
    submitted: Arc<Mutex<Vec<CanonicalDocument>>>,
    /// Fail every submission with this message
    failure: Option<String>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self {
            submitted: Arc::new(Mutex::new(vec![])),
            failure: None,
        }
    }

    /// A submitter that rejects every job
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    fn documents(&self) -> MutexGuard<'_, Vec<CanonicalDocument>> {
        self.submitted.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All documents submitted so far
    pub fn submitted(&self) -> Vec<CanonicalDocument> {
        self.documents().clone()
    }

    pub fn last_submitted(&self) -> Option<CanonicalDocument> {
        self.documents().last().cloned()
    }

    pub fn submission_count(&self) -> usize {
        self.documents().len()
    }

    pub fn clear(&self) {
        self.documents().clear();
    }
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JobSubmitter for MockSubmitter {
    fn name(&self) -> &str {
        "mock"
    }

    fn submit(&self, document: CanonicalDocument) -> Result<SubmittedJob, JobError> {
        if let Some(message) = &self.failure {
            return Err(JobError::Submission(message.clone()));
        }

        let task_ids = catalog_task_names(&document)
            .into_iter()
            .map(|name| format!("task-{}", name))
            .collect();

        let mut documents = self.documents();
        documents.push(document);
        Ok(SubmittedJob {
            job_id: format!("job-{}", documents.len()),
            task_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::JobBuilder;
    use crate::task::Task;

    fn job() -> Job {
        JobBuilder::new()
            .edge("in", "out")
            .task(Task::input("in"))
            .task(Task::output("out"))
            .build()
    }

    #[test]
    fn test_mock_records_documents() {
        let submitter = MockSubmitter::new();
        let first = submit_job(&submitter, &job()).unwrap();
        let second = submit_job(&submitter, &job()).unwrap();

        assert_eq!(first.job_id, "job-1");
        assert_eq!(second.job_id, "job-2");
        assert_eq!(first.task_ids, vec!["task-in", "task-out"]);
        assert_eq!(submitter.submission_count(), 2);
        assert_eq!(
            submitter.last_submitted(),
            Some(job().to_canonical_document().unwrap())
        );

        submitter.clear();
        assert_eq!(submitter.submission_count(), 0);
    }

    #[test]
    fn test_failing_mock() {
        let submitter = MockSubmitter::failing("no peers");
        let err = submit_job(&submitter, &job()).unwrap_err();

        assert!(matches!(err, JobError::Submission(ref m) if m == "no peers"));
        assert!(submitter.submitted().is_empty());
    }

    #[test]
    fn test_submitter_shared_across_threads() {
        let submitter: Arc<dyn JobSubmitter> = Arc::new(MockSubmitter::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let submitter = Arc::clone(&submitter);
                std::thread::spawn(move || submit_job(submitter.as_ref(), &job()).unwrap())
            })
            .collect();

        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap().job_id).collect();
        ids.sort();
        assert_eq!(ids, ["job-1", "job-2", "job-3", "job-4"]);
    }

    #[test]
    fn test_catalog_task_names_on_empty_job() {
        let document = Job::default().to_canonical_document().unwrap();
        assert!(catalog_task_names(&document).is_empty());
    }
}
