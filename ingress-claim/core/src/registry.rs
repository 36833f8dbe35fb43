use crate::Provider;
use ingress_claim_k8s_api::Ingress;

/// The set of claim providers known to the controller.
///
/// The default provider is always registered and is consulted last, so every
/// ingress resolves to exactly one provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry {
    /// Non-default providers in registration order, followed by the default.
    providers: Vec<Provider>,
}

// === impl Registry ===

impl Registry {
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        let mut registered = Vec::new();
        for provider in providers {
            if !provider.is_default() && !registered.contains(&provider) {
                registered.push(provider);
            }
        }
        registered.push(Provider::DEFAULT);
        Self {
            providers: registered,
        }
    }

    /// Returns the provider that owns the ingress.
    pub fn resolve(&self, ingress: &Ingress) -> &Provider {
        self.providers
            .iter()
            .find(|provider| provider.serves_ingress(ingress))
            .unwrap_or_else(|| self.default_provider())
    }

    pub fn by_name(&self, name: &str) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    pub fn default_provider(&self) -> &Provider {
        &Provider::DEFAULT
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> + '_ {
        self.providers.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new([Provider::Ats, Provider::Istio])
    }
}
