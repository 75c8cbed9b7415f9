use tracing::debug;

use crate::core::repository::CrudRepository;
use crate::crds::{CraftDeployment, CraftRole};
use crate::errors::Result;

/// Repository over [`CraftDeployment`] resources, with role-based listing on
/// top of the generic CRUD surface.
pub type CraftDeployments = CrudRepository<CraftDeployment>;

impl CrudRepository<CraftDeployment> {
    /// Lists deployments with the given role in the default namespace.
    pub async fn list_with_role(&self, role: CraftRole) -> Result<Vec<CraftDeployment>> {
        self.list_with_role_in(self.default_namespace(), role).await
    }

    /// Lists deployments with the given role. The filter runs client-side on
    /// the full listing; no extra cluster calls.
    pub async fn list_with_role_in(
        &self,
        namespace: &str,
        role: CraftRole,
    ) -> Result<Vec<CraftDeployment>> {
        let deployments = self.list_in(namespace).await?;
        let matching = filter_by_role(deployments, role);

        debug!(
            "Found {} deployment(s) with role {:?} in namespace '{}'",
            matching.len(),
            role,
            namespace
        );
        Ok(matching)
    }

    /// Lists all proxy deployments in the default namespace.
    pub async fn list_proxies(&self) -> Result<Vec<CraftDeployment>> {
        self.list_with_role(CraftRole::Proxy).await
    }

    /// Lists all proxy deployments in the namespace.
    pub async fn list_proxies_in(&self, namespace: &str) -> Result<Vec<CraftDeployment>> {
        self.list_with_role_in(namespace, CraftRole::Proxy).await
    }

    /// Lists all server deployments in the default namespace.
    pub async fn list_servers(&self) -> Result<Vec<CraftDeployment>> {
        self.list_with_role(CraftRole::Server).await
    }

    /// Lists all server deployments in the namespace.
    pub async fn list_servers_in(&self, namespace: &str) -> Result<Vec<CraftDeployment>> {
        self.list_with_role_in(namespace, CraftRole::Server).await
    }
}

fn filter_by_role(deployments: Vec<CraftDeployment>, role: CraftRole) -> Vec<CraftDeployment> {
    deployments
        .into_iter()
        .filter(|deployment| deployment.spec.role == role)
        .collect()
}

#[cfg(test)]
mod tests {
    use kube::ResourceExt;

    use super::*;
    use crate::crds::{CraftDeploymentSpec, ServerTemplateSpec};

    fn deployment(name: &str, role: CraftRole) -> CraftDeployment {
        CraftDeployment::new(
            name,
            CraftDeploymentSpec {
                role,
                replicas: 1,
                template: ServerTemplateSpec {
                    image: "craftfleet/server:latest".into(),
                    max_players: None,
                    properties: Default::default(),
                },
            },
        )
    }

    fn names(deployments: &[CraftDeployment]) -> Vec<String> {
        let mut names: Vec<String> = deployments.iter().map(|d| d.name_any()).collect();
        names.sort();
        names
    }

    #[test]
    fn filter_keeps_exactly_the_matching_role() {
        let all = vec![
            deployment("lobby", CraftRole::Server),
            deployment("gate", CraftRole::Proxy),
            deployment("arena", CraftRole::Server),
        ];

        let servers = filter_by_role(all.clone(), CraftRole::Server);
        assert_eq!(names(&servers), ["arena", "lobby"]);

        let proxies = filter_by_role(all, CraftRole::Proxy);
        assert_eq!(names(&proxies), ["gate"]);
    }

    #[test]
    fn filter_is_independent_of_listing_order() {
        let forward = vec![
            deployment("lobby", CraftRole::Server),
            deployment("gate", CraftRole::Proxy),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            names(&filter_by_role(forward, CraftRole::Server)),
            names(&filter_by_role(backward, CraftRole::Server)),
        );
    }

    #[test]
    fn filter_yields_empty_when_nothing_matches() {
        let all = vec![deployment("lobby", CraftRole::Server)];
        assert!(filter_by_role(all, CraftRole::Proxy).is_empty());
    }
}
