//! Custom resource definitions for the CraftFleet control plane.
//!
//! All kinds live under the `craftfleet.io/v1` API group and are namespaced.
//! Schemas are deliberately small; the SDK core never interprets them.

pub mod deployment;
pub mod server;
pub mod serverset;
pub mod statefulset;
pub mod template;

pub use deployment::{CraftDeployment, CraftDeploymentSpec, CraftDeploymentStatus, CraftRole};
pub use server::{CraftServer, CraftServerSpec, CraftServerState, CraftServerStatus};
pub use serverset::{CraftServerSet, CraftServerSetSpec, CraftServerSetStatus};
pub use statefulset::{CraftStatefulSet, CraftStatefulSetSpec, CraftStatefulSetStatus};
pub use template::ServerTemplateSpec;
