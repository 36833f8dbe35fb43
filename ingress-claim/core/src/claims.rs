use ingress_claim_k8s_api::{Ingress, ResourceExt};
use std::fmt;
use thiserror::Error;

/// Identifies an ingress by namespace and name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngressRef {
    pub namespace: String,
    pub name: String,
}

/// Read access to the cluster-wide domain claims.
///
/// Implementations reflect the most recently observed cluster state and must
/// refuse lookups until they have observed a complete listing of ingresses.
pub trait ClaimLookup {
    /// Fails unless the claims have been fully synchronized.
    fn ready(&self) -> Result<(), IndexError>;

    /// Returns the ingresses that claim `domain` under `provider`.
    fn lookup_by_domain(&self, provider: &str, domain: &str)
        -> Result<Vec<IngressRef>, IndexError>;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("the domain claim index has not completed its initial sync; retry later")]
    NotSynced,

    #[error("no domain claim index exists for provider {0}")]
    UnknownProvider(String),

    #[error("timed out waiting to read the domain claim index; retry later")]
    Timeout,
}

// === impl IngressRef ===

impl IngressRef {
    pub fn new(namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn from_ingress(ingress: &Ingress) -> Self {
        Self {
            namespace: ingress.namespace().unwrap_or_default(),
            name: ingress.name_any(),
        }
    }
}

impl fmt::Display for IngressRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
