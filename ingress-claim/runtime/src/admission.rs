use crate::{
    core::{Engine, Verdict},
    index::Lookup,
    metrics::AdmissionMetrics,
};
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use kube::core::DynamicObject;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Serves ingress admission reviews.
#[derive(Clone, Debug)]
pub struct Admission {
    engine: Arc<Engine<Lookup>>,
    metrics: AdmissionMetrics,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[from] hyper::Error),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type AdmissionRequest = kube::core::admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = kube::core::admission::AdmissionResponse;
type AdmissionReview = kube::core::admission::AdmissionReview<DynamicObject>;

type Body = http_body_util::Full<bytes::Bytes>;

// === impl AdmissionService ===

impl tower::Service<Request<hyper::body::Incoming>> for Admission {
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<hyper::body::Incoming>) -> Self::Future {
        trace!(?req);
        if req.method() != http::Method::POST || req.uri().path() != "/" {
            return Box::pin(future::ok(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::default())
                    .expect("not found response must be valid"),
            ));
        }

        let admission = self.clone();
        Box::pin(async move {
            use bytes::Buf;
            let bytes = req.into_body().collect().await?.to_bytes();
            let review: AdmissionReview = match serde_json::from_reader(bytes.reader()) {
                Ok(review) => review,
                Err(error) => {
                    warn!(%error, "Failed to parse request body");
                    return json_response(AdmissionResponse::invalid(error).into_review());
                }
            };
            trace!(?review);

            let rsp = match review.try_into() {
                Ok(req) => {
                    debug!(?req);
                    admission.admit(&req)
                }
                Err(error) => {
                    warn!(%error, "Invalid admission request");
                    AdmissionResponse::invalid(error)
                }
            };
            debug!(?rsp);
            json_response(rsp.into_review())
        })
    }
}

impl Admission {
    pub fn new(engine: Engine<Lookup>, metrics: AdmissionMetrics) -> Self {
        Self {
            engine: Arc::new(engine),
            metrics,
        }
    }

    fn admit(&self, req: &AdmissionRequest) -> AdmissionResponse {
        let rsp = AdmissionResponse::from(req);
        let verdict = self.engine.review(req);
        self.metrics.observe(&verdict);

        let ns = req.namespace.as_deref().unwrap_or_default();
        let name = &req.name;
        let user = req.user_info.username.as_deref().unwrap_or_default();
        match verdict {
            Verdict::Allow => {
                info!(operation = ?req.operation, %ns, %name, %user, "Allowed");
                rsp
            }
            Verdict::Deny(error) => {
                warn!(%error, operation = ?req.operation, %ns, %name, %user, "Denied");
                rsp.deny(error)
            }
        }
    }
}

fn json_response(rsp: AdmissionReview) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}
