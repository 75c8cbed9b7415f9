//! CraftServerSet CRD
//!
//! A fixed-size set of servers scaled as a unit.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::ServerTemplateSpec;

/// CraftServerSet describes a set of servers scaled as one unit.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "craftfleet.io",
    version = "v1",
    kind = "CraftServerSet",
    namespaced,
    status = "CraftServerSetStatus",
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CraftServerSetSpec {
    /// Desired number of servers in the set.
    #[serde(default)]
    pub replicas: i32,

    /// Template applied to every server in the set.
    pub template: ServerTemplateSpec,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CraftServerSetStatus {
    /// Servers currently ready to accept players.
    #[serde(default)]
    pub ready_replicas: i32,
}
