use crate::{
    admission::Admission,
    core::{self, Engine, Provider, UnknownProvider},
    index::{self, Index, Lookup, Phase},
    k8s,
    metrics::AdmissionMetrics,
};
use anyhow::{bail, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{
    sync::watch,
    time::{self, Duration},
};
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Parser)]
#[clap(
    name = "ingress-claim",
    about = "Admits ingresses only when their domains are not claimed by another ingress"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "ingress_claim=info,warn",
        env = "INGRESS_CLAIM_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    server: kubert::ServerArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Admits every ingress without validating it or checking its claims.
    #[clap(long, env = "INGRESS_CLAIM_ADMIT_ALL")]
    admit_all: bool,

    /// Claim providers to register. The default provider (ATS) is always registered.
    #[clap(long, default_value = "ATS,istio")]
    providers: Providers,

    /// How long an admission review may wait to read the claim index.
    #[clap(long, default_value = "1000")]
    index_read_timeout_ms: u64,

    /// How long startup may wait for the initial listing of ingresses before failing.
    #[clap(long, default_value = "60")]
    index_sync_timeout_secs: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            admin,
            client,
            log_level,
            log_format,
            server,
            admit_all,
            providers: Providers(providers),
            index_read_timeout_ms,
            index_sync_timeout_secs,
        } = self;

        let registry = Arc::new(core::Registry::new(providers));

        // Build the claim index, which is populated by the ingress watch and read by the
        // admission server.
        let claim_index = Index::shared(registry.clone());
        let lookup = Lookup::new(
            claim_index.clone(),
            Duration::from_millis(index_read_timeout_ms),
        );

        let mut prom = <Registry>::default();
        index::metrics::register(
            prom.sub_registry_with_prefix("claim_index"),
            claim_index.clone(),
        );
        let admission_metrics =
            AdmissionMetrics::register(prom.sub_registry_with_prefix("admission"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .with_server(server)
            .build()
            .await?;

        info!(
            providers = ?registry.iter().map(Provider::name).collect::<Vec<_>>(),
            "Registered claim providers"
        );
        if admit_all {
            warn!("Admitting all ingresses without validation");
        }

        let synced = claim_index.read().phase_rx();
        let ingresses = runtime.watch_all::<k8s::Ingress>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(claim_index, ingresses).instrument(info_span!("ingresses")),
        );

        // Reviews are not served until the ingress watch has delivered its initial listing.
        await_sync(synced, Duration::from_secs(index_sync_timeout_secs)).await?;
        info!("Ingress watch synced");

        let admission = Admission::new(
            Engine::new(registry, lookup, admit_all),
            admission_metrics,
        );
        let runtime = runtime.spawn_server(admission);

        // Block the main thread on the shutdown signal. Once it fires, wait for the background tasks to
        // complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}

async fn await_sync(mut phase: watch::Receiver<Phase>, timeout: Duration) -> Result<()> {
    match time::timeout(timeout, phase.wait_for(|phase| *phase == Phase::Ready)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) => bail!("claim index was dropped before the ingress watch synced"),
        Err(_) => bail!("ingress watch did not sync within {timeout:?}"),
    }
}

#[derive(Clone, Debug)]
struct Providers(Vec<Provider>);

impl std::str::FromStr for Providers {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Provider>, _>>()
            .map(Self)
    }
}
