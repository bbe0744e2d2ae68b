use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{
    Credentials, GroupRef, HostHandle, HostRecord, InterfaceSpec, ProxyRef, SessionToken,
    TemplateRef,
};
use crate::ports::{Inventory, InventoryError};

use super::protocol::{
    CreatedGroups, CreatedHosts, EmptyParams, GroupCreateParams, GroupFilter, GroupGetParams,
    GroupId, GroupRow, HostCreateParams, HostFilter, HostGetParams, HostRow, LoginParams,
    RpcRequest, RpcResponse, TemplateId,
};

/// Zabbix adapter speaking JSON-RPC over HTTP POST to a single endpoint
pub struct ZabbixClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ZabbixClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// One request/response exchange: no retries, transport default timeout
    async fn call<P, R>(
        &self,
        method: &'static str,
        params: P,
        token: Option<&SessionToken>,
    ) -> Result<R, InventoryError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = RpcRequest::new(method, params, token.map(|t| t.as_str().to_string()));

        debug!("→ {} {}", self.endpoint, method);
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        let body: RpcResponse<R> = response
            .json()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(InventoryError::Api {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        body.result
            .ok_or_else(|| InventoryError::UnexpectedResponse(format!("{method}: empty result")))
    }
}

#[async_trait]
impl Inventory for ZabbixClient {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionToken, InventoryError> {
        let params = LoginParams {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        };

        // A rejected login surfaces as an API error object or an empty
        // token; both mean the run cannot proceed
        let token: String = self
            .call("user.login", params, None)
            .await
            .map_err(|e| match e {
                InventoryError::Api { .. } | InventoryError::UnexpectedResponse(_) => {
                    InventoryError::Authentication
                }
                other => other,
            })?;

        if token.is_empty() {
            return Err(InventoryError::Authentication);
        }

        Ok(SessionToken::new(token))
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), InventoryError> {
        let _: bool = self.call("user.logout", EmptyParams {}, Some(token)).await?;
        Ok(())
    }

    async fn find_group_or_create(
        &self,
        name: &str,
        token: &SessionToken,
    ) -> Result<GroupRef, InventoryError> {
        let params = GroupGetParams {
            output: "extend",
            filter: GroupFilter {
                name: name.to_string(),
            },
        };
        let existing: Vec<GroupRow> = self.call("hostgroup.get", params, Some(token)).await?;

        if let Some(group) = existing.into_iter().next() {
            return Ok(GroupRef::new(group.groupid));
        }

        let params = GroupCreateParams {
            name: name.to_string(),
        };
        let created: CreatedGroups = self
            .call("hostgroup.create", params, Some(token))
            .await
            .map_err(|e| match e {
                InventoryError::Api { .. } | InventoryError::UnexpectedResponse(_) => {
                    InventoryError::GroupCreation(name.to_string())
                }
                other => other,
            })?;

        created
            .groupids
            .into_iter()
            .next()
            .map(GroupRef::new)
            .ok_or_else(|| InventoryError::GroupCreation(name.to_string()))
    }

    async fn find_host_by_name(
        &self,
        name: &str,
        token: &SessionToken,
    ) -> Result<Option<HostHandle>, InventoryError> {
        let params = HostGetParams {
            filter: HostFilter {
                host: name.to_string(),
            },
        };
        let existing: Vec<HostRow> = self.call("host.get", params, Some(token)).await?;

        Ok(existing.into_iter().next().map(|h| HostHandle::new(h.hostid)))
    }

    async fn create_host(
        &self,
        record: &HostRecord,
        group: &GroupRef,
        template: &TemplateRef,
        proxy: &ProxyRef,
        token: &SessionToken,
    ) -> Result<HostHandle, InventoryError> {
        let params = HostCreateParams {
            host: record.name.clone(),
            proxy_hostid: proxy.as_str().to_string(),
            interfaces: vec![InterfaceSpec::agent(record.address.clone())],
            groups: vec![GroupId {
                groupid: group.as_str().to_string(),
            }],
            templates: vec![TemplateId {
                templateid: template.as_str().to_string(),
            }],
        };

        let created: CreatedHosts = self.call("host.create", params, Some(token)).await?;

        created
            .hostids
            .into_iter()
            .next()
            .map(HostHandle::new)
            .ok_or_else(|| {
                InventoryError::UnexpectedResponse("host.create: no hostid returned".to_string())
            })
    }
}
