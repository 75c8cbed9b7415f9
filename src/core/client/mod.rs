// Kube-rs based Kubernetes client
pub mod kube_client;
pub mod kube_resources;

// Typed repositories per resource kind
pub mod deployments;
pub mod servers;
pub mod serversets;
pub mod statefulsets;
