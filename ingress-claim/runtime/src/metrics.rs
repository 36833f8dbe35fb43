use crate::core::Verdict;
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug, Default)]
pub struct AdmissionMetrics {
    reviews: Family<ReviewLabels, Counter>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct ReviewLabels {
    verdict: String,
    reason: String,
}

impl AdmissionMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let reviews = Family::default();
        prom.register(
            "reviews",
            "Count of ingress admission reviews by verdict",
            reviews.clone(),
        );
        Self { reviews }
    }

    pub fn observe(&self, verdict: &Verdict) {
        let (verdict, reason) = match verdict {
            Verdict::Allow => ("allowed", "allowed"),
            Verdict::Deny(error) => ("denied", error.kind()),
        };
        self.reviews
            .get_or_create(&ReviewLabels {
                verdict: verdict.to_string(),
                reason: reason.to_string(),
            })
            .inc();
    }
}
