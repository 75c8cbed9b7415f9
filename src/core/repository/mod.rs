//! The generic repository core: CRUD over arbitrary namespaced resource kinds
//! and the change-notification informer built on the watch primitive.

pub mod crud;
pub mod informer;

pub use crud::CrudRepository;
pub use informer::{Deleted, Informer, InformerBuilder};
