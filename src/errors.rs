use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A `create` collided with an existing (namespace, name) identity.
    #[error("resource {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    /// A mutating update targeted a resource that does not exist.
    #[error("resource {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// A mutating update kept losing its version check to concurrent writers.
    #[error("resource {namespace}/{name} was modified concurrently, gave up after {attempts} attempt(s)")]
    ConcurrentModification {
        namespace: String,
        name: String,
        attempts: u32,
    },

    /// Invalid or missing construction-time input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other transport or server-side failure, forwarded as-is.
    #[error("K8s API error: {0}")]
    Api(#[from] kube::Error),
}

/// Whether the API server rejected a create because the identity is taken.
pub(crate) fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.reason == "AlreadyExists")
}

/// Whether the API server rejected a versioned write because the
/// resourceVersion is stale.
pub(crate) fn is_version_conflict(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 409 && resp.reason == "Conflict")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message: String::new(),
            reason: reason.into(),
            code,
        })
    }

    #[test]
    fn already_exists_is_classified_by_reason() {
        assert!(is_already_exists(&api_error(409, "AlreadyExists")));
        assert!(!is_already_exists(&api_error(409, "Conflict")));
        assert!(!is_already_exists(&api_error(404, "NotFound")));
    }

    #[test]
    fn version_conflict_is_distinct_from_identity_collision() {
        assert!(is_version_conflict(&api_error(409, "Conflict")));
        assert!(!is_version_conflict(&api_error(409, "AlreadyExists")));
        assert!(!is_version_conflict(&api_error(500, "Conflict")));
    }

    #[test]
    fn concurrent_modification_names_the_resource() {
        let err = Error::ConcurrentModification {
            namespace: "ns1".into(),
            name: "srv-1".into(),
            attempts: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("ns1/srv-1"));
        assert!(msg.contains("3 attempt"));
    }
}
