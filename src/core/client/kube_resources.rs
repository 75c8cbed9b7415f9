/// Re-export of the k8s-openapi resource types the SDK touches directly.
/// This module provides a centralized place for all K8s resource types
pub use k8s_openapi::api::core::v1::Pod;

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
