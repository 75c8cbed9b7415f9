use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server template shared by every workload kind.
///
/// Describes how a single server instance is launched.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerTemplateSpec {
    /// Container image the server runs.
    pub image: String,

    /// Player cap advertised by the server, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_players: Option<i32>,

    /// Extra server.properties entries applied at startup.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}
