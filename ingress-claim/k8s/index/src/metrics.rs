use crate::{Phase, SharedIndex};
use prometheus_client::{
    collector::Collector,
    encoding::{DescriptorEncoder, EncodeMetric},
    metrics::{gauge::ConstGauge, MetricType},
    registry::Registry,
};

#[derive(Debug)]
struct Instrumented(SharedIndex);

pub fn register(reg: &mut Registry, index: SharedIndex) {
    reg.register_collector(Box::new(Instrumented(index)));
}

impl Collector for Instrumented {
    fn encode(&self, mut encoder: DescriptorEncoder<'_>) -> Result<(), std::fmt::Error> {
        let this = self.0.read();

        let mut domains_encoder = encoder.encode_descriptor(
            "domain_claims",
            "The number of claimed domains in index",
            None,
            MetricType::Gauge,
        )?;
        for (provider, domains) in this.domains_by_provider() {
            let labels = [("provider", provider)];
            let domains = ConstGauge::new(domains as u32);
            let domains_encoder = domains_encoder.encode_family(&labels)?;
            domains.encode(domains_encoder)?;
        }

        let ingresses_encoder = encoder.encode_descriptor(
            "ingresses",
            "The number of ingresses that claim at least one domain",
            None,
            MetricType::Gauge,
        )?;
        ConstGauge::new(this.ingresses() as u32).encode(ingresses_encoder)?;

        let synced_encoder = encoder.encode_descriptor(
            "synced",
            "Whether the initial listing of ingresses has been indexed",
            None,
            MetricType::Gauge,
        )?;
        let synced = u32::from(this.phase() == Phase::Ready);
        ConstGauge::new(synced).encode(synced_encoder)?;

        Ok(())
    }
}
