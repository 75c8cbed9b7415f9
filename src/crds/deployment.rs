//! CraftDeployment CRD
//!
//! A replicated group of interchangeable servers, tagged with the role the
//! group serves within the fleet.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::ServerTemplateSpec;

/// CraftDeployment describes a replicated group of interchangeable servers.
///
/// Servers in a deployment carry no identity of their own; they are created
/// and discarded freely to satisfy `replicas`.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "craftfleet.io",
    version = "v1",
    kind = "CraftDeployment",
    namespaced,
    status = "CraftDeploymentStatus",
    printcolumn = r#"{"name":"Role", "type":"string", "jsonPath":".spec.role"}"#,
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CraftDeploymentSpec {
    /// Fleet role this deployment serves.
    pub role: CraftRole,

    /// Desired number of servers.
    #[serde(default)]
    pub replicas: i32,

    /// Template applied to every server in the deployment.
    pub template: ServerTemplateSpec,
}

/// Role of a deployment within the fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CraftRole {
    /// A game server players play on.
    Server,
    /// A proxy fronting the fleet.
    Proxy,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CraftDeploymentStatus {
    /// Servers currently ready to accept players.
    #[serde(default)]
    pub ready_replicas: i32,
}
