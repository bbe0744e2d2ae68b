use std::io;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::CfgDirectorySource;
use crate::domain::{
    Credentials, GroupRef, HostRecord, ParsedFile, ProxyRef, RunSummary, SessionToken,
    SyncOutcome, TemplateRef,
};
use crate::ports::{Inventory, InventoryError};

/// Errors that abort a run before or during host processing.
///
/// Everything else (unreadable files, invalid records, failed creations) is
/// isolated to its unit of work and lands in the run summary instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("cannot read source directory: {0}")]
    Source(io::Error),
}

/// Drives one synchronization run: authenticate, resolve the target group,
/// then walk every config file and reconcile its records against the
/// inventory, strictly in sequence.
pub struct SyncService {
    inventory: Arc<dyn Inventory>,
    source: CfgDirectorySource,
    credentials: Credentials,
    group_name: String,
    template: TemplateRef,
    proxy: ProxyRef,
}

impl SyncService {
    pub fn new(
        inventory: Arc<dyn Inventory>,
        source: CfgDirectorySource,
        credentials: Credentials,
        group_name: impl Into<String>,
        template: TemplateRef,
        proxy: ProxyRef,
    ) -> Self {
        Self {
            inventory,
            source,
            credentials,
            group_name: group_name.into(),
            template,
            proxy,
        }
    }

    /// Run the full reconciliation. Authentication failure aborts before any
    /// file is read; once authenticated, logout is attempted no matter how
    /// the rest of the run went.
    pub async fn run(&self) -> Result<RunSummary, SyncError> {
        let token = self.inventory.authenticate(&self.credentials).await?;
        info!("✓ Authenticated against inventory API");

        let result = self.run_authenticated(&token).await;

        if let Err(e) = self.inventory.logout(&token).await {
            warn!("⚠ Logout failed: {}", e);
        }

        result
    }

    async fn run_authenticated(&self, token: &SessionToken) -> Result<RunSummary, SyncError> {
        let mut summary = RunSummary::new();

        let group = self
            .inventory
            .find_group_or_create(&self.group_name, token)
            .await?;
        info!("✓ Host group '{}' resolved to id {}", self.group_name, group.as_str());

        let files = self.source.list_files().map_err(SyncError::Source)?;
        info!("Processing {} config file(s)", files.len());

        for path in files {
            let label = file_label(&path);
            match self.source.load(&path) {
                Ok(parsed) => {
                    self.process_file(&label, &parsed, &group, token, &mut summary)
                        .await;
                }
                Err(e) => {
                    warn!("⚠ Skipping unreadable file {}: {}", label, e);
                    summary.record_unreadable(&label);
                }
            }
        }

        summary.finish();
        Ok(summary)
    }

    /// A file with exactly one record is processed unconditionally; a batch
    /// file only processes records with both fields non-empty.
    async fn process_file(
        &self,
        file: &str,
        parsed: &ParsedFile,
        group: &GroupRef,
        token: &SessionToken,
        summary: &mut RunSummary,
    ) {
        let sole_record = parsed.len() == 1;

        for record in parsed.iter() {
            if !sole_record && !record.is_complete() {
                info!("– {}: skipping incomplete record '{}'", file, record.name);
                summary.record(file, &record.name, SyncOutcome::SkippedInvalid);
                continue;
            }

            let outcome = self.process_record(record, group, token).await;
            summary.record(file, &record.name, outcome);
        }
    }

    async fn process_record(
        &self,
        record: &HostRecord,
        group: &GroupRef,
        token: &SessionToken,
    ) -> SyncOutcome {
        match self.inventory.find_host_by_name(&record.name, token).await {
            Ok(Some(handle)) => {
                info!("– Host '{}' already exists with id {}", record.name, handle.as_str());
                SyncOutcome::AlreadyExists(handle)
            }
            Ok(None) => match self
                .inventory
                .create_host(record, group, &self.template, &self.proxy, token)
                .await
            {
                Ok(handle) => {
                    info!("✓ Created host '{}' with id {}", record.name, handle.as_str());
                    SyncOutcome::Created(handle)
                }
                Err(e) => {
                    warn!("⚠ Failed to create host '{}': {}", record.name, e);
                    SyncOutcome::Failed(e.to_string())
                }
            },
            Err(e) => {
                warn!("⚠ Lookup failed for host '{}': {}", record.name, e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::adapters::NamePolicy;
    use crate::domain::HostHandle;

    #[derive(Default)]
    struct MockState {
        existing_hosts: HashMap<String, String>,
        existing_group: Option<String>,
        created_hosts: Vec<HostRecord>,
        create_calls: Vec<String>,
        lookup_calls: Vec<String>,
        group_calls: usize,
        logout_calls: usize,
        fail_auth: bool,
        fail_group: bool,
        fail_create_for: Vec<String>,
    }

    struct MockInventory {
        state: Mutex<MockState>,
    }

    impl MockInventory {
        fn new(state: MockState) -> Arc<Self> {
            Arc::new(Self {
                state: Mutex::new(state),
            })
        }
    }

    #[async_trait]
    impl Inventory for MockInventory {
        async fn authenticate(
            &self,
            _credentials: &Credentials,
        ) -> Result<SessionToken, InventoryError> {
            if self.state.lock().unwrap().fail_auth {
                return Err(InventoryError::Authentication);
            }
            Ok(SessionToken::new("session-1"))
        }

        async fn logout(&self, _token: &SessionToken) -> Result<(), InventoryError> {
            self.state.lock().unwrap().logout_calls += 1;
            Ok(())
        }

        async fn find_group_or_create(
            &self,
            name: &str,
            _token: &SessionToken,
        ) -> Result<GroupRef, InventoryError> {
            let mut state = self.state.lock().unwrap();
            state.group_calls += 1;
            if state.fail_group {
                return Err(InventoryError::GroupCreation(name.to_string()));
            }
            Ok(GroupRef::new(
                state.existing_group.clone().unwrap_or_else(|| "42".to_string()),
            ))
        }

        async fn find_host_by_name(
            &self,
            name: &str,
            _token: &SessionToken,
        ) -> Result<Option<HostHandle>, InventoryError> {
            let mut state = self.state.lock().unwrap();
            state.lookup_calls.push(name.to_string());
            Ok(state.existing_hosts.get(name).cloned().map(HostHandle::new))
        }

        async fn create_host(
            &self,
            record: &HostRecord,
            _group: &GroupRef,
            _template: &TemplateRef,
            _proxy: &ProxyRef,
            _token: &SessionToken,
        ) -> Result<HostHandle, InventoryError> {
            let mut state = self.state.lock().unwrap();
            state.create_calls.push(record.name.clone());
            if state.fail_create_for.contains(&record.name) {
                return Err(InventoryError::Api {
                    code: -32602,
                    message: "Invalid params.".to_string(),
                    data: "No permissions.".to_string(),
                });
            }
            state.created_hosts.push(record.clone());
            let handle = format!("1{:04}", state.created_hosts.len());
            Ok(HostHandle::new(handle))
        }
    }

    fn write_cfg(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn service(inventory: Arc<MockInventory>, dir: &Path) -> SyncService {
        SyncService::new(
            inventory,
            CfgDirectorySource::new(dir, NamePolicy::Lenient),
            Credentials::new("api-user", "secret"),
            "Universal/Availability",
            TemplateRef::new("11664"),
            ProxyRef::new("10416"),
        )
    }

    #[tokio::test]
    async fn test_creates_missing_and_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "hosts.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\ndefine host{\n  host_name  webB\n  address  10.0.0.6\n}\n",
        );

        let inventory = MockInventory::new(MockState {
            existing_hosts: HashMap::from([("webA".to_string(), "10105".to_string())]),
            ..Default::default()
        });

        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert_eq!(summary.already_exists(), 1);
        assert_eq!(summary.created(), 1);

        let state = inventory.state.lock().unwrap();
        // A found host is never created again in the same run
        assert_eq!(state.create_calls, vec!["webB".to_string()]);
        assert_eq!(state.created_hosts[0].address, "10.0.0.6");
        assert_eq!(state.logout_calls, 1);
    }

    #[tokio::test]
    async fn test_sole_incomplete_record_is_still_attempted() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "lonely.cfg",
            "define host{\n  host_name  webA\n}\n",
        );

        let inventory = MockInventory::new(MockState::default());
        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert_eq!(summary.created(), 1);
        let state = inventory.state.lock().unwrap();
        assert_eq!(state.created_hosts[0], HostRecord::new("webA", ""));
    }

    #[tokio::test]
    async fn test_incomplete_records_skipped_in_batch_files() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "batch.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\ndefine host{\n  host_name  webB\n}\n",
        );

        let inventory = MockInventory::new(MockState::default());
        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert_eq!(summary.created(), 1);
        assert_eq!(summary.skipped(), 1);

        let state = inventory.state.lock().unwrap();
        assert_eq!(state.create_calls, vec!["webA".to_string()]);
        // Skipped records are never even looked up
        assert_eq!(state.lookup_calls, vec!["webA".to_string()]);
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "hosts.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\n",
        );

        let inventory = MockInventory::new(MockState {
            fail_auth: true,
            ..Default::default()
        });

        let result = service(inventory.clone(), dir.path()).run().await;
        assert!(matches!(
            result,
            Err(SyncError::Inventory(InventoryError::Authentication))
        ));

        let state = inventory.state.lock().unwrap();
        assert_eq!(state.group_calls, 0);
        assert!(state.lookup_calls.is_empty());
        assert_eq!(state.logout_calls, 0);
    }

    #[tokio::test]
    async fn test_group_failure_aborts_but_still_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "hosts.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\n",
        );

        let inventory = MockInventory::new(MockState {
            fail_group: true,
            ..Default::default()
        });

        let result = service(inventory.clone(), dir.path()).run().await;
        assert!(matches!(
            result,
            Err(SyncError::Inventory(InventoryError::GroupCreation(_)))
        ));

        let state = inventory.state.lock().unwrap();
        assert!(state.lookup_calls.is_empty());
        assert_eq!(state.logout_calls, 1);
    }

    #[tokio::test]
    async fn test_creation_failure_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(
            dir.path(),
            "hosts.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\ndefine host{\n  host_name  webB\n  address  10.0.0.6\n}\n",
        );

        let inventory = MockInventory::new(MockState {
            fail_create_for: vec!["webA".to_string()],
            ..Default::default()
        });

        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.created(), 1);

        let state = inventory.state.lock().unwrap();
        assert_eq!(state.created_hosts[0].name, "webB");
        assert_eq!(state.logout_calls, 1);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        // Invalid UTF-8 makes read_to_string fail for this file only
        fs::write(dir.path().join("a-broken.cfg"), [0xff, 0xfe, 0xfd]).unwrap();
        write_cfg(
            dir.path(),
            "b-good.cfg",
            "define host{\n  host_name  webA\n  address  10.0.0.5\n}\n",
        );

        let inventory = MockInventory::new(MockState::default());
        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert_eq!(summary.unreadable_files, vec!["a-broken.cfg".to_string()]);
        assert_eq!(summary.created(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_yields_no_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        write_cfg(dir.path(), "empty.cfg", "# nothing here\n");

        let inventory = MockInventory::new(MockState::default());
        let summary = service(inventory.clone(), dir.path()).run().await.unwrap();

        assert!(summary.outcomes.is_empty());
        assert!(summary.unreadable_files.is_empty());
    }
}
