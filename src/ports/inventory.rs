use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Credentials, GroupRef, HostHandle, HostRecord, ProxyRef, SessionToken, TemplateRef,
};

#[derive(Debug, Error)]
pub enum InventoryError {
    /// Login succeeded at the transport level but no session token came back
    #[error("authentication failed: no session token returned")]
    Authentication,

    /// Group was absent and the creation call returned no identifier
    #[error("failed to create host group '{0}'")]
    GroupCreation(String),

    /// The remote API reported an error object
    #[error("api error {code}: {message} ({data})")]
    Api {
        code: i64,
        message: String,
        data: String,
    },

    /// Request could not be sent or the response could not be read
    #[error("transport error: {0}")]
    Transport(String),

    /// Response parsed as JSON but did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Port for the remote monitoring inventory.
///
/// Every operation is one request/response exchange, no retries. Callers
/// sequence them; nothing here is called concurrently.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// `user.login` — exchange credentials for a session token
    async fn authenticate(&self, credentials: &Credentials)
        -> Result<SessionToken, InventoryError>;

    /// `user.logout` — invalidate the session; callers treat failure as
    /// best-effort
    async fn logout(&self, token: &SessionToken) -> Result<(), InventoryError>;

    /// Look up a host group by exact name, creating it when absent
    async fn find_group_or_create(
        &self,
        name: &str,
        token: &SessionToken,
    ) -> Result<GroupRef, InventoryError>;

    /// Exact-name host lookup; absence is the normal "not created yet" signal
    async fn find_host_by_name(
        &self,
        name: &str,
        token: &SessionToken,
    ) -> Result<Option<HostHandle>, InventoryError>;

    /// Create a host with one agent interface built from the record's
    /// address, in the given group, with the run's fixed template and proxy
    async fn create_host(
        &self,
        record: &HostRecord,
        group: &GroupRef,
        template: &TemplateRef,
        proxy: &ProxyRef,
        token: &SessionToken,
    ) -> Result<HostHandle, InventoryError>;
}
