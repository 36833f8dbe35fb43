pub use ingress_claim_core as core;
pub use ingress_claim_k8s_api as k8s;
pub use ingress_claim_k8s_index as index;

mod admission;
mod args;
mod metrics;

pub use self::args::Args;
