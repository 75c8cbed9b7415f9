//! CraftStatefulSet CRD
//!
//! Servers with stable identity and ordered naming, for worlds that persist.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::ServerTemplateSpec;

/// CraftStatefulSet describes servers with stable, ordered identities.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "craftfleet.io",
    version = "v1",
    kind = "CraftStatefulSet",
    namespaced,
    status = "CraftStatefulSetStatus",
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CraftStatefulSetSpec {
    /// Desired number of servers.
    #[serde(default)]
    pub replicas: i32,

    /// Template applied to every server in the set.
    pub template: ServerTemplateSpec,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CraftStatefulSetStatus {
    /// Servers currently ready to accept players.
    #[serde(default)]
    pub ready_replicas: i32,
}
