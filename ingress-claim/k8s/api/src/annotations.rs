use crate::{Ingress, IngressBackend, IngressRule, ResourceExt};

/// Selects the class of controller responsible for an ingress.
pub const INGRESS_CLASS: &str = "kubernetes.io/ingress.class";

/// The primary domain claimed by an ATS ingress.
pub const DEFAULT_DOMAIN: &str = "default_domain";

/// A comma-separated list of additional domains claimed by an ATS ingress.
pub const ALIASES: &str = "aliases";

/// A comma-separated list of ports served by an ATS ingress.
pub const PORTS: &str = "ports";

/// Read-only accessors over the parts of an `Ingress` that claim providers
/// inspect.
pub trait IngressExt {
    fn annotation(&self, key: &str) -> Option<&str>;

    fn default_backend(&self) -> Option<&IngressBackend>;

    fn rules(&self) -> &[IngressRule];

    /// Returns the value of the `kubernetes.io/ingress.class` annotation, if
    /// it is set.
    ///
    /// The `spec.ingressClassName` field is not consulted.
    fn ingress_class(&self) -> Option<&str> {
        self.annotation(INGRESS_CLASS)
    }
}

// === impl IngressExt ===

impl IngressExt for Ingress {
    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations().get(key).map(String::as_str)
    }

    fn default_backend(&self) -> Option<&IngressBackend> {
        self.spec.as_ref()?.default_backend.as_ref()
    }

    fn rules(&self) -> &[IngressRule] {
        self.spec
            .as_ref()
            .and_then(|spec| spec.rules.as_deref())
            .unwrap_or_default()
    }
}
