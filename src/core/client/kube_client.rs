use kube::Client;
use tracing::debug;

use crate::errors::Result;

/// Creates a Kubernetes client configured for in-cluster or local development
///
/// Inside a pod the service account token is read automatically; otherwise
/// the local kubeconfig is used.
pub async fn build_kube_client() -> Result<Client> {
    let client = Client::try_default().await?;

    debug!("Kubernetes client initialized successfully");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_client_does_not_panic_outside_a_cluster() {
        // Succeeds against a kubeconfig, fails cleanly without one
        let _ = build_kube_client().await;
    }
}
