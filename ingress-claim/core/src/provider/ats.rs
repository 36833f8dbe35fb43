use super::Rule;
use crate::domain::{self, sanitize};
use ingress_claim_k8s_api::{
    annotations::{ALIASES, DEFAULT_DOMAIN, PORTS},
    Ingress, IngressExt,
};

pub(super) const NAME: &str = "ATS";

/// ATS serves ingresses that either don't select a class or select ATS.
pub(super) fn serves(ingress: &Ingress) -> bool {
    ingress.ingress_class().map_or(true, |class| class == NAME)
}

/// The default domain first, followed by aliases in declared order.
pub(super) fn domains(ingress: &Ingress) -> Vec<String> {
    let default_domain = ingress.annotation(DEFAULT_DOMAIN);
    let aliases = ingress
        .annotation(ALIASES)
        .into_iter()
        .flat_map(|aliases| aliases.split(','));
    domain::collect(default_domain.into_iter().chain(aliases))
}

pub(super) fn validate(ingress: &Ingress) -> Result<(), Rule> {
    if ingress.default_backend().is_none() {
        return Err(Rule::MissingDefaultBackend);
    }

    let has_ports = ingress
        .annotation(PORTS)
        .is_some_and(|ports| ports.split(',').any(|port| !sanitize(port).is_empty()));
    if !has_ports {
        return Err(Rule::MissingPorts);
    }

    let has_default_domain = ingress
        .annotation(DEFAULT_DOMAIN)
        .is_some_and(|domain| !sanitize(domain).is_empty());
    if !has_default_domain {
        return Err(Rule::MissingDefaultDomain);
    }

    Ok(())
}
