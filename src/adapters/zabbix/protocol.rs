use serde::{Deserialize, Serialize};

use crate::domain::InterfaceSpec;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope. The session token travels in the top-level
/// `auth` field, absent only for `user.login`.
#[derive(Debug, Serialize)]
pub struct RpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    pub id: u32,
}

impl<P: Serialize> RpcRequest<P> {
    pub fn new(method: &'static str, params: P, auth: Option<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            auth,
            id: 1,
        }
    }
}

/// JSON-RPC response envelope: exactly one of `result` / `error` is present
#[derive(Debug, Deserialize)]
pub struct RpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

/// `user.logout` takes an empty params object
#[derive(Debug, Serialize)]
pub struct EmptyParams {}

#[derive(Debug, Serialize)]
pub struct GroupGetParams {
    pub output: &'static str,
    pub filter: GroupFilter,
}

#[derive(Debug, Serialize)]
pub struct GroupFilter {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GroupCreateParams {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct HostGetParams {
    pub filter: HostFilter,
}

#[derive(Debug, Serialize)]
pub struct HostFilter {
    pub host: String,
}

#[derive(Debug, Serialize)]
pub struct HostCreateParams {
    pub host: String,
    pub proxy_hostid: String,
    pub interfaces: Vec<InterfaceSpec>,
    pub groups: Vec<GroupId>,
    pub templates: Vec<TemplateId>,
}

#[derive(Debug, Serialize)]
pub struct GroupId {
    pub groupid: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateId {
    pub templateid: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupRow {
    pub groupid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HostRow {
    pub hostid: String,
    #[serde(default)]
    pub host: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedGroups {
    pub groupids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedHosts {
    pub hostids: Vec<String>,
}
