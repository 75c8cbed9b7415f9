//! CraftServer CRD
//!
//! A single running server instance, backed by a pod with the same name.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::ServerTemplateSpec;

/// CraftServer is one concrete server instance.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "craftfleet.io",
    version = "v1",
    kind = "CraftServer",
    namespaced,
    status = "CraftServerStatus",
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Players", "type":"integer", "jsonPath":".status.players"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CraftServerSpec {
    /// How this server instance is launched.
    pub template: ServerTemplateSpec,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CraftServerStatus {
    /// Lifecycle state reported by the server.
    #[serde(default)]
    pub state: CraftServerState,

    /// Players currently connected.
    #[serde(default)]
    pub players: i32,
}

/// Lifecycle state of a server instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CraftServerState {
    #[default]
    Starting,
    Ready,
    Stopping,
}
