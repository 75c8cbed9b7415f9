//! Typed data access over the CraftFleet control plane's custom resources.
//!
//! The core is [`CrudRepository`], a namespace-scoped CRUD surface over any
//! namespaced resource kind, together with its read-modify-write
//! [`CrudRepository::update_with`] protocol and the change-notification
//! [`InformerBuilder`]. The typed repositories and the [`CraftFleetSdk`]
//! facade are thin wiring on top.
//!
//! ```no_run
//! use craftfleet_sdk::CraftFleetSdk;
//!
//! # async fn example() -> craftfleet_sdk::Result<()> {
//! let sdk = CraftFleetSdk::try_default().await?;
//!
//! let proxies = sdk.deployments().list_proxies().await?;
//! println!("{} proxies deployed", proxies.len());
//!
//! let _informer = sdk
//!     .servers()
//!     .informer()
//!     .on_add(|server| println!("server added: {:?}", server.metadata.name))
//!     .inform();
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod crds;
pub mod errors;
pub mod sdk;

pub use crate::core::client::deployments::CraftDeployments;
pub use crate::core::client::kube_client::build_kube_client;
pub use crate::core::client::servers::CraftServers;
pub use crate::core::client::serversets::CraftServerSets;
pub use crate::core::client::statefulsets::CraftStatefulSets;
pub use crate::core::repository::{CrudRepository, Deleted, Informer, InformerBuilder};
pub use crate::crds::{CraftDeployment, CraftRole, CraftServer, CraftServerSet, CraftStatefulSet};
pub use crate::errors::{Error, Result};
pub use crate::sdk::{CraftFleetSdk, DEFAULT_NAMESPACE};
