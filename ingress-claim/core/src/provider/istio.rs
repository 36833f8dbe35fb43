use super::Rule;
use crate::domain::{self, sanitize};
use ingress_claim_k8s_api::{Ingress, IngressExt};

pub(super) const NAME: &str = "istio";

/// Istio only serves ingresses that explicitly select it.
pub(super) fn serves(ingress: &Ingress) -> bool {
    ingress.ingress_class() == Some(NAME)
}

/// Rule hosts in rule order. Rules without a host are skipped.
pub(super) fn domains(ingress: &Ingress) -> Vec<String> {
    domain::collect(ingress.rules().iter().filter_map(|rule| rule.host.as_deref()))
}

pub(super) fn validate(ingress: &Ingress) -> Result<(), Rule> {
    if ingress.default_backend().is_some() {
        return Err(Rule::DefaultBackendUnsupported(NAME));
    }

    let hostless = ingress
        .rules()
        .iter()
        .any(|rule| rule.host.as_deref().map_or(true, |host| sanitize(host).is_empty()));
    if hostless {
        return Err(Rule::RuleWithoutHost(NAME));
    }

    Ok(())
}
