use chrono::{DateTime, Utc};

use super::HostHandle;

/// Result of processing one host record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Host was absent and has been created
    Created(HostHandle),
    /// Host already exists in the inventory, nothing was done
    AlreadyExists(HostHandle),
    /// Record had an empty name or address and was not processed
    SkippedInvalid,
    /// Creation was attempted and the remote call failed
    Failed(String),
}

/// One audit line of a run: which file, which host, what happened
#[derive(Debug, Clone)]
pub struct HostOutcome {
    pub file: String,
    pub host: String,
    pub outcome: SyncOutcome,
}

/// Aggregate result of one synchronization run.
///
/// Collects every per-record outcome plus the files that could not be read,
/// so a batch can be audited without re-querying the inventory.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<HostOutcome>,
    pub unreadable_files: Vec<String>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
            unreadable_files: Vec::new(),
        }
    }

    pub fn record(&mut self, file: &str, host: &str, outcome: SyncOutcome) {
        self.outcomes.push(HostOutcome {
            file: file.to_string(),
            host: host.to_string(),
            outcome,
        });
    }

    pub fn record_unreadable(&mut self, file: &str) {
        self.unreadable_files.push(file.to_string());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Created(_)))
    }

    pub fn already_exists(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::AlreadyExists(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::SkippedInvalid))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
