use crate::{ClaimLookup, IndexError, IngressRef, Provider, Registry, SemanticError};
use ingress_claim_k8s_api::{
    admission::{AdmissionRequest, Operation},
    DynamicObject, Ingress, IngressSpec, Resource,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Decides whether ingress admission requests may proceed.
///
/// The engine holds no per-request state; the only shared state it reads is
/// the claim index. Every request fails closed until that index has synced.
///
/// The index learns of admitted ingresses only through the watch, so two
/// concurrent creations that claim the same domain may both be admitted.
/// Both are then recorded as owners, and later updates to either are denied
/// while the other still holds the domain.
#[derive(Debug)]
pub struct Engine<L> {
    registry: Arc<Registry>,
    claims: L,
    admit_all: bool,
}

#[derive(Debug)]
pub enum Verdict {
    Allow,
    Deny(Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode the admission request object into an Ingress: {0}")]
    Decode(String),

    #[error("resource {0} is not an Ingress")]
    ResourceMismatch(String),

    #[error("Ingress validation checks failed: {0}")]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Conflict(#[from] DomainConflict),

    #[error(transparent)]
    IndexUnavailable(#[from] IndexError),
}

/// A domain is already claimed by another ingress under the same provider.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "Domain {domain} already exists. Ingress {} in namespace {} owns this domain.",
    .owner.name,
    .owner.namespace
)]
pub struct DomainConflict {
    pub domain: String,
    pub owner: IngressRef,
}

// === impl Engine ===

impl<L: ClaimLookup> Engine<L> {
    /// When `admit_all` is set, every request is admitted without validation.
    pub fn new(registry: Arc<Registry>, claims: L, admit_all: bool) -> Self {
        Self {
            registry,
            claims,
            admit_all,
        }
    }

    pub fn review(&self, req: &AdmissionRequest<DynamicObject>) -> Verdict {
        match self.try_review(req) {
            Ok(()) => Verdict::Allow,
            Err(error) => Verdict::Deny(error),
        }
    }

    fn try_review(&self, req: &AdmissionRequest<DynamicObject>) -> Result<(), Error> {
        if self.admit_all {
            warn!(
                ns = req.namespace.as_deref().unwrap_or_default(),
                name = %req.name,
                "Admitting ingress without validation"
            );
            return Ok(());
        }

        self.claims.ready()?;

        // Removing an ingress never claims a domain.
        if matches!(req.operation, Operation::Delete | Operation::Connect) {
            return Ok(());
        }

        if !is_kind::<Ingress>(req) {
            return Err(Error::ResourceMismatch(format!(
                "{}/{}, Kind={}",
                req.kind.group, req.kind.version, req.kind.kind
            )));
        }

        let ingress = parse_ingress(req)?;
        self.check(&ingress)
    }

    /// Validates a decoded ingress against its provider's rules and the
    /// current domain claims.
    pub fn check(&self, ingress: &Ingress) -> Result<(), Error> {
        let provider = self.registry.resolve(ingress);
        debug!(%provider, "Resolved claim provider");

        provider.validate_semantics(ingress)?;
        self.check_claims(provider, ingress)
    }

    /// Fails on the first domain that is claimed by a different ingress under
    /// the same provider. Claims held by the ingress itself are ignored.
    ///
    /// This reads a snapshot of the index, so it does not serialize against
    /// other reviews in flight.
    fn check_claims(&self, provider: &Provider, ingress: &Ingress) -> Result<(), Error> {
        let id = IngressRef::from_ingress(ingress);
        for domain in provider.domains(ingress) {
            let owners = self.claims.lookup_by_domain(provider.name(), &domain)?;
            if let Some(owner) = owners.into_iter().find(|owner| *owner != id) {
                return Err(DomainConflict { domain, owner }.into());
            }
            debug!(%domain, "Domain is unclaimed");
        }
        Ok(())
    }
}

// === impl Verdict ===

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// A human-readable explanation of a denial. Empty when allowed.
    pub fn reason(&self) -> String {
        match self {
            Self::Allow => String::new(),
            Self::Deny(error) => error.to_string(),
        }
    }
}

// === impl Error ===

impl Error {
    /// A short, stable name for the class of error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::ResourceMismatch(_) => "resource_mismatch",
            Self::Semantic(_) => "semantic",
            Self::Conflict(_) => "conflict",
            Self::IndexUnavailable(_) => "index_unavailable",
        }
    }
}

fn is_kind<T>(req: &AdmissionRequest<DynamicObject>) -> bool
where
    T: Resource,
    T::DynamicType: Default,
{
    let dt = Default::default();
    req.kind.group.eq_ignore_ascii_case(&T::group(&dt))
        && req.kind.kind.eq_ignore_ascii_case(&T::kind(&dt))
}

/// Builds an `Ingress` from the request object's metadata and spec.
fn parse_ingress(req: &AdmissionRequest<DynamicObject>) -> Result<Ingress, Error> {
    let obj = req
        .object
        .as_ref()
        .ok_or_else(|| Error::Decode("admission request missing 'object'".to_string()))?;

    let spec = obj
        .data
        .get("spec")
        .cloned()
        .ok_or_else(|| Error::Decode("admission request missing 'spec'".to_string()))?;
    let spec = serde_json::from_value::<IngressSpec>(spec)
        .map_err(|error| Error::Decode(error.to_string()))?;

    let mut metadata = obj.metadata.clone();
    if metadata.namespace.is_none() {
        metadata.namespace = req.namespace.clone();
    }
    if metadata.name.is_none() && !req.name.is_empty() {
        metadata.name = Some(req.name.clone());
    }

    Ok(Ingress {
        metadata,
        spec: Some(spec),
        status: None,
    })
}
