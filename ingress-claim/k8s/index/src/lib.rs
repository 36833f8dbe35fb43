//! Domain claim index
//!
//! The index watches all `Ingress` resources in the cluster and records, for each claim provider,
//! which ingresses claim each domain. Every ingress is probed against every registered provider,
//! so an ingress that changes class moves its claims between providers on the next update.
//!
//! ```text
//! [ Ingress ] -> [ Provider ] -> { domain -> [ IngressRef ] }
//! ```
//!
//! The admission webhook reads the index through a [`Lookup`], which refuses to answer until the
//! initial listing of ingresses has been applied.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod index;
pub mod metrics;


pub use self::index::{Index, Lookup, Phase, SharedIndex};
