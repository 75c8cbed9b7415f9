use kube::api::Api;
use kube::ResourceExt;
use tracing::debug;

use crate::core::client::kube_resources::Pod;
use crate::core::repository::CrudRepository;
use crate::crds::CraftServer;
use crate::errors::Result;

/// Repository over [`CraftServer`] resources.
pub type CraftServers = CrudRepository<CraftServer>;

impl CrudRepository<CraftServer> {
    /// Fetches the pod backing a server in the default namespace.
    pub async fn pod_for_server(&self, server: &CraftServer) -> Result<Option<Pod>> {
        self.pod_for_server_in(self.default_namespace(), server).await
    }

    /// Fetches the pod backing a server; a server and its pod share a name.
    /// Absence is `Ok(None)`.
    pub async fn pod_for_server_in(
        &self,
        namespace: &str,
        server: &CraftServer,
    ) -> Result<Option<Pod>> {
        let name = server.name_any();
        let pods: Api<Pod> = Api::namespaced(self.client().clone(), namespace);
        let pod = pods.get_opt(&name).await?;

        debug!("Looked up pod for server {}/{}", namespace, name);
        Ok(pod)
    }
}
