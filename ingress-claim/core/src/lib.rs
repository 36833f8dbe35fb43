//! Domain claims for ingress resources.
//!
//! Every ingress is owned by exactly one claim [`Provider`]. The provider
//! decides which hostnames the ingress claims and which structural rules it
//! must satisfy. Claims are scoped per provider: the same hostname may be
//! claimed once under each provider.
//!
//! The [`Engine`] admits an ingress only if none of its domains are claimed by
//! a different ingress under the same provider, consulting a [`ClaimLookup`]
//! that reflects the claims of all ingresses in the cluster.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod claims;
pub mod domain;
mod engine;
pub mod provider;
mod registry;


pub use self::{
    claims::{ClaimLookup, IndexError, IngressRef},
    engine::{DomainConflict, Engine, Error, Verdict},
    provider::{Claim, Provider, Rule, SemanticError, UnknownProvider},
    registry::Registry,
};
