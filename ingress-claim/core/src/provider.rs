//! Claim providers.
//!
//! A provider recognizes the ingresses routed by one class of ingress
//! controller and knows how that class declares the hostnames it serves.

mod ats;
mod istio;

use ingress_claim_k8s_api::{Ingress, ResourceExt};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Apache Traffic Server. Domains are declared with the `default_domain`
    /// and `aliases` annotations.
    ///
    /// This is the default provider: it owns every ingress that does not
    /// select another class.
    Ats,

    /// Istio. Domains are declared by the hosts of the ingress's rules.
    Istio,
}

/// The domains an ingress claims under a single provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub provider: &'static str,
    pub domains: Vec<String>,
}

/// A provider-specific structural rule was violated.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Ingress {name} in namespace {namespace} {rule}")]
pub struct SemanticError {
    pub namespace: String,
    pub name: String,
    pub rule: Rule,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rule {
    #[error("does not have a default backend specified.")]
    MissingDefaultBackend,

    #[error("does not have a ports annotation specified.")]
    MissingPorts,

    #[error("does not have a default_domain annotation specified.")]
    MissingDefaultDomain,

    #[error(
        "specifies a default backend which is currently NOT supported for provider class: {0}"
    )]
    DefaultBackendUnsupported(&'static str),

    #[error(
        "specifies an IngressRule without a Host which is currently NOT supported for provider \
         class: {0}"
    )]
    RuleWithoutHost(&'static str),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown claim provider: {0}")]
pub struct UnknownProvider(pub String);

// === impl Provider ===

impl Provider {
    /// The provider that owns ingresses no other provider serves.
    pub const DEFAULT: Self = Self::Ats;

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ats => ats::NAME,
            Self::Istio => istio::NAME,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Indicates whether this provider owns the given ingress.
    pub fn serves_ingress(&self, ingress: &Ingress) -> bool {
        match self {
            Self::Ats => ats::serves(ingress),
            Self::Istio => istio::serves(ingress),
        }
    }

    /// Returns the sanitized, de-duplicated domains the ingress claims under
    /// this provider. Empty if this provider does not own the ingress.
    pub fn domains(&self, ingress: &Ingress) -> Vec<String> {
        if !self.serves_ingress(ingress) {
            return Vec::new();
        }
        match self {
            Self::Ats => ats::domains(ingress),
            Self::Istio => istio::domains(ingress),
        }
    }

    /// Checks provider-specific structural rules. Ingresses this provider does
    /// not own always pass.
    pub fn validate_semantics(&self, ingress: &Ingress) -> Result<(), SemanticError> {
        if !self.serves_ingress(ingress) {
            return Ok(());
        }
        let rule = match self {
            Self::Ats => ats::validate(ingress),
            Self::Istio => istio::validate(ingress),
        };
        rule.map_err(|rule| SemanticError {
            namespace: ingress.namespace().unwrap_or_default(),
            name: ingress.name_any(),
            rule,
        })
    }

    /// Returns this provider's claim for an arbitrary ingress, so that the same
    /// object may be probed against every provider when building an index.
    pub fn claim_domains(&self, ingress: &Ingress) -> Claim {
        Claim {
            provider: self.name(),
            domains: self.domains(ingress),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ats::NAME) {
            return Ok(Self::Ats);
        }
        if s.eq_ignore_ascii_case(istio::NAME) {
            return Ok(Self::Istio);
        }
        Err(UnknownProvider(s.to_string()))
    }
}
