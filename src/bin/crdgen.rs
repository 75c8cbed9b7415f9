//! Prints the CraftFleet CustomResourceDefinition manifests as a YAML stream.
//!
//! Usage: `cargo run --bin crdgen | kubectl apply -f -`

use kube::CustomResourceExt;

use craftfleet_sdk::crds::{CraftDeployment, CraftServer, CraftServerSet, CraftStatefulSet};

fn main() -> Result<(), serde_yaml::Error> {
    for crd in [
        CraftDeployment::crd(),
        CraftStatefulSet::crd(),
        CraftServerSet::crd(),
        CraftServer::crd(),
    ] {
        println!("---");
        print!("{}", serde_yaml::to_string(&crd)?);
    }
    Ok(())
}
