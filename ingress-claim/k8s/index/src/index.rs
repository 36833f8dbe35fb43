use ahash::AHashMap as HashMap;
use ingress_claim_core::{domain, Claim, ClaimLookup, IndexError, IngressRef, Registry};
use ingress_claim_k8s_api::Ingress;
use kubert::index::NamespacedRemoved;
use parking_lot::{RwLock, RwLockReadGuard};
use std::{collections::BTreeSet, sync::Arc, time::Duration};
use tokio::sync::watch;

/// Holds the domain claims of all ingresses in the cluster. Owned and updated by a single task that
/// processes watch events; read by the admission webhook.
#[derive(Debug)]
pub struct Index {
    registry: Arc<Registry>,

    /// Publishes the index's phase so that startup can wait for the initial sync.
    phase: watch::Sender<Phase>,

    /// Per provider, the ingresses that claim each domain.
    by_provider: HashMap<&'static str, DomainClaims>,

    /// The (provider, domain) pairs each ingress currently claims, so that stale claims can be
    /// dropped when an ingress is updated or deleted.
    by_ingress: HashMap<IngressRef, Vec<(&'static str, String)>>,
}

pub type SharedIndex = Arc<RwLock<Index>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The initial listing of ingresses has not been applied.
    Uninitialized,
    Ready,
}

/// Reads a [`SharedIndex`] without blocking indefinitely behind a writer.
#[derive(Clone, Debug)]
pub struct Lookup {
    index: SharedIndex,
    timeout: Duration,
}

#[derive(Debug, Default)]
struct DomainClaims {
    by_domain: HashMap<String, BTreeSet<IngressRef>>,
}

// === impl Index ===

impl Index {
    pub fn new(registry: Arc<Registry>) -> Self {
        let by_provider = registry
            .iter()
            .map(|provider| (provider.name(), DomainClaims::default()))
            .collect();
        Self {
            registry,
            phase: watch::Sender::new(Phase::Uninitialized),
            by_provider,
            by_ingress: HashMap::default(),
        }
    }

    pub fn shared(registry: Arc<Registry>) -> SharedIndex {
        Arc::new(RwLock::new(Self::new(registry)))
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Watches the index's phase. It changes once, when the initial listing is applied.
    pub fn phase_rx(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// The number of ingresses that claim at least one domain.
    pub fn ingresses(&self) -> usize {
        self.by_ingress.len()
    }

    /// Iterates over each registered provider and the number of domains claimed under it.
    pub fn domains_by_provider(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.by_provider
            .iter()
            .map(|(provider, claims)| (*provider, claims.by_domain.len()))
    }

    /// Records the domains an ingress claims under each provider, replacing any claims it
    /// previously held.
    pub fn apply_ingress(&mut self, ingress: &Ingress) {
        let id = IngressRef::from_ingress(ingress);
        let claims = self
            .registry
            .iter()
            .flat_map(|provider| {
                let Claim { provider, domains } = provider.claim_domains(ingress);
                domains.into_iter().map(move |domain| (provider, domain))
            })
            .collect::<Vec<_>>();

        self.remove(&id);
        if claims.is_empty() {
            tracing::trace!(ingress = %id, "Ingress claims no domains");
            return;
        }

        for (provider, domain) in &claims {
            self.by_provider
                .entry(*provider)
                .or_default()
                .by_domain
                .entry(domain.clone())
                .or_default()
                .insert(id.clone());
        }
        tracing::debug!(ingress = %id, claims = claims.len(), "Indexed ingress");
        self.by_ingress.insert(id, claims);
    }

    /// Drops all claims held by the ingress. Returns false if it held none.
    pub fn remove(&mut self, id: &IngressRef) -> bool {
        let Some(claims) = self.by_ingress.remove(id) else {
            return false;
        };
        for (provider, domain) in claims {
            if let Some(provider) = self.by_provider.get_mut(provider) {
                provider.release(&domain, id);
            }
        }
        tracing::debug!(ingress = %id, "Removed ingress claims");
        true
    }
}

impl ClaimLookup for Index {
    fn ready(&self) -> Result<(), IndexError> {
        match self.phase() {
            Phase::Ready => Ok(()),
            Phase::Uninitialized => Err(IndexError::NotSynced),
        }
    }

    fn lookup_by_domain(
        &self,
        provider: &str,
        domain: &str,
    ) -> Result<Vec<IngressRef>, IndexError> {
        self.ready()?;
        let claims = self
            .by_provider
            .get(provider)
            .ok_or_else(|| IndexError::UnknownProvider(provider.to_string()))?;
        Ok(claims
            .by_domain
            .get(&domain::sanitize(domain))
            .map(|owners| owners.iter().cloned().collect())
            .unwrap_or_default())
    }
}

impl kubert::index::IndexNamespacedResource<Ingress> for Index {
    fn apply(&mut self, ingress: Ingress) {
        self.apply_ingress(&ingress);
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.remove(&IngressRef::new(namespace, name));
    }

    /// Replaces the index's contents with a complete listing of ingresses. The first reset marks
    /// the index as ready.
    fn reset(&mut self, ingresses: Vec<Ingress>, removed: NamespacedRemoved) {
        for (namespace, names) in removed {
            for name in names {
                self.remove(&IngressRef::new(&namespace, name));
            }
        }
        for ingress in &ingresses {
            self.apply_ingress(ingress);
        }

        if self.phase() == Phase::Uninitialized {
            tracing::info!(
                ingresses = ingresses.len(),
                claimants = self.by_ingress.len(),
                "Domain claim index synced"
            );
            self.phase.send_replace(Phase::Ready);
        }
    }
}

// === impl DomainClaims ===

impl DomainClaims {
    fn release(&mut self, domain: &str, id: &IngressRef) {
        if let Some(owners) = self.by_domain.get_mut(domain) {
            owners.remove(id);
            if owners.is_empty() {
                self.by_domain.remove(domain);
            }
        }
    }
}

// === impl Lookup ===

impl Lookup {
    /// Reads that cannot acquire the index within `timeout` fail with [`IndexError::Timeout`].
    pub fn new(index: SharedIndex, timeout: Duration) -> Self {
        Self { index, timeout }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Index>, IndexError> {
        self.index
            .try_read_for(self.timeout)
            .ok_or(IndexError::Timeout)
    }
}

impl ClaimLookup for Lookup {
    fn ready(&self) -> Result<(), IndexError> {
        self.read()?.ready()
    }

    fn lookup_by_domain(
        &self,
        provider: &str,
        domain: &str,
    ) -> Result<Vec<IngressRef>, IndexError> {
        self.read()?.lookup_by_domain(provider, domain)
    }
}
