//! Prometheus metrics and the `/metrics` endpoint.

use std::{sync::LazyLock, time::Duration};

use prometheus::{
    Encoder as _, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use salvo::{
    http::{StatusCode, header::CONTENT_TYPE},
    prelude::*,
};
use tracing::error;

const DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Result of a Razorpay payment verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaymentOutcome {
    /// Signature checked and the order fulfilled.
    Verified,

    /// Bad signature, missing fields or an unknown order.
    Rejected,

    Failed,
}

impl PaymentOutcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    http_in_flight: IntGauge,
    payment_verifications: IntCounterVec,
}

impl Metrics {
    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("bookshelf_json".to_string()), None)?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method, route and status."),
            &["method", "route", "status"],
        )?;

        let http_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        let http_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served.")?;

        let payment_verifications = IntCounterVec::new(
            Opts::new(
                "payment_verifications_total",
                "Razorpay payment verifications by outcome.",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_duration.clone()))?;
        registry.register(Box::new(http_in_flight.clone()))?;
        registry.register(Box::new(payment_verifications.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_duration,
            http_in_flight,
            payment_verifications,
        })
    }
}

static METRICS: LazyLock<Option<Metrics>> = LazyLock::new(|| {
    Metrics::build()
        .inspect_err(|source| error!("failed to build metrics registry: {source}"))
        .ok()
});

fn metrics() -> Option<&'static Metrics> {
    METRICS.as_ref()
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlight(Option<&'static IntGauge>);

impl InFlight {
    pub(super) fn enter() -> Self {
        let gauge = metrics().map(|metrics| &metrics.http_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status: StatusCode, elapsed: Duration) {
    let Some(metrics) = metrics() else {
        return;
    };

    metrics
        .http_requests
        .with_label_values(&[method, route, status.as_str()])
        .inc();

    metrics
        .http_duration
        .with_label_values(&[method, route])
        .observe(elapsed.as_secs_f64());
}

pub(crate) fn record_payment_verification(outcome: PaymentOutcome) {
    if let Some(metrics) = metrics() {
        metrics
            .payment_verifications
            .with_label_values(&[outcome.label()])
            .inc();
    }
}

/// Prometheus text exposition of every registered metric.
#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);

        return;
    };

    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut body) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Err(source) = res.add_header(CONTENT_TYPE, encoder.format_type(), true) {
        error!("failed to set metrics content type: {source}");
    }

    res.render(String::from_utf8_lossy(&body).into_owned());
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn endpoint_exposes_http_and_payment_metrics() -> TestResult {
        observe_request("GET", "/books", StatusCode::OK, Duration::from_millis(42));
        record_payment_verification(PaymentOutcome::Rejected);

        let service = Service::new(Router::with_path("metrics").get(metrics_handler));

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        assert!(
            body.contains(
                r#"bookshelf_json_http_requests_total{method="GET",route="/books",status="200"}"#
            ),
            "request counter missing from:\n{body}"
        );
        assert!(
            body.contains("bookshelf_json_http_request_duration_seconds_bucket"),
            "latency histogram missing"
        );
        assert!(
            body.contains("bookshelf_json_http_requests_in_flight"),
            "in-flight gauge missing"
        );
        assert!(
            body.contains(r#"bookshelf_json_payment_verifications_total{outcome="rejected"}"#),
            "payment counter missing"
        );

        Ok(())
    }
}
