use std::env;

use kube::Client;

use crate::core::client::deployments::CraftDeployments;
use crate::core::client::kube_client::build_kube_client;
use crate::core::client::servers::CraftServers;
use crate::core::client::serversets::CraftServerSets;
use crate::core::client::statefulsets::CraftStatefulSets;
use crate::crds::CraftServer;
use crate::errors::{Error, Result};

/// Namespace used when the caller does not pick one.
pub const DEFAULT_NAMESPACE: &str = "craftfleet-system";

/// Environment variable naming the pod this process runs in.
const POD_NAME_ENV: &str = "POD_NAME";

/// Entry point wiring one repository per resource kind over a shared client.
pub struct CraftFleetSdk {
    client: Client,
    default_namespace: String,
    deployments: CraftDeployments,
    stateful_sets: CraftStatefulSets,
    server_sets: CraftServerSets,
    servers: CraftServers,
    current_pod_name: Option<String>,
}

impl CraftFleetSdk {
    /// Builds an SDK over an existing client.
    pub fn new(client: Client, default_namespace: impl Into<String>) -> Self {
        let default_namespace = default_namespace.into();
        Self {
            deployments: CraftDeployments::new(client.clone(), default_namespace.clone()),
            stateful_sets: CraftStatefulSets::new(client.clone(), default_namespace.clone()),
            server_sets: CraftServerSets::new(client.clone(), default_namespace.clone()),
            servers: CraftServers::new(client.clone(), default_namespace.clone()),
            current_pod_name: env::var(POD_NAME_ENV).ok(),
            client,
            default_namespace,
        }
    }

    /// Builds an SDK with an inferred client and the [`DEFAULT_NAMESPACE`].
    pub async fn try_default() -> Result<Self> {
        Self::with_namespace(DEFAULT_NAMESPACE).await
    }

    /// Builds an SDK with an inferred client and an explicit default
    /// namespace.
    pub async fn with_namespace(default_namespace: impl Into<String>) -> Result<Self> {
        let client = build_kube_client().await?;
        Ok(Self::new(client, default_namespace))
    }

    /// The deployments repository.
    pub fn deployments(&self) -> &CraftDeployments {
        &self.deployments
    }

    /// The stateful sets repository.
    pub fn stateful_sets(&self) -> &CraftStatefulSets {
        &self.stateful_sets
    }

    /// The server sets repository.
    pub fn server_sets(&self) -> &CraftServerSets {
        &self.server_sets
    }

    /// The servers repository.
    pub fn servers(&self) -> &CraftServers {
        &self.servers
    }

    /// The shared client handle.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The namespace used by the bare operation variants.
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Name of the server this process runs as.
    ///
    /// Available only inside a cluster pod; otherwise fails with
    /// [`Error::Configuration`].
    pub fn current_server_name(&self) -> Result<&str> {
        current_server_name_from(self.current_pod_name.as_deref())
    }

    /// The server resource this process runs as, if still present.
    pub async fn current_server(&self) -> Result<Option<CraftServer>> {
        let name = self.current_server_name()?.to_owned();
        self.servers.get(&name).await
    }
}

fn current_server_name_from(pod_name: Option<&str>) -> Result<&str> {
    pod_name.ok_or_else(|| {
        Error::Configuration(format!(
            "{POD_NAME_ENV} is not set; not running inside a cluster pod"
        ))
    })
}
