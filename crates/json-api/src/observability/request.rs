//! Per-request span, request id and HTTP metrics.

use std::time::{Duration, Instant};

use opentelemetry::{
    Context, global,
    propagation::Extractor,
    trace::TraceContextExt as _,
};
use salvo::{
    http::{HeaderMap, StatusCode, header::HeaderValue},
    prelude::*,
};
use tracing::{Instrument as _, error, field, info, info_span, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;
use uuid::Uuid;

use crate::{config::ServerConfig, extensions::*};

use super::metrics::{self, InFlight};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client-supplied ids longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Wraps every request in an `http.request` span, echoes or assigns an
/// `x-request-id`, and records request metrics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogging {
    slow_threshold: Duration,
    propagate_parent: bool,
}

impl RequestLogging {
    pub(crate) fn from_config(config: &ServerConfig) -> Self {
        Self {
            slow_threshold: config.logging.slow_request_threshold(),
            propagate_parent: config.telemetry.propagates_parent(),
        }
    }
}

#[handler]
impl RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.uri().path() == "/metrics" {
            ctrl.call_next(req, depot, res).await;

            return;
        }

        let started = Instant::now();
        let request_id = request_id(req.headers());

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let method = req.method().as_str().to_owned();
        let path = req.uri().path().to_owned();
        let route = route_label(&path);
        let span_name = format!("{method} {route}");
        let _in_flight = InFlight::enter();

        let span = info_span!(
            parent: None,
            "http.request",
            otel.name = %span_name,
            otel.kind = "server",
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = %req.remote_addr(),
            user_uuid = field::Empty,
            status = field::Empty,
            duration_ms = field::Empty,
        );

        if self.propagate_parent
            && let Some(parent) = parent_context(req.headers())
            && let Err(source) = span.set_parent(parent)
        {
            warn!("failed to attach parent trace context: {source}");
        }

        ctrl.call_next(req, depot, res).instrument(span.clone()).await;

        let elapsed = started.elapsed();
        let status = res.status_code.unwrap_or(StatusCode::OK);
        let duration_ms = elapsed.as_millis();

        metrics::observe_request(&method, &route, status, elapsed);

        if let Ok(user) = depot.user_or_401() {
            span.record("user_uuid", field::display(user.uuid));
        }

        span.record("status", status.as_u16());
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            if status.is_server_error() {
                error!(status = status.as_u16(), duration_ms, "request failed");
            } else if status.is_client_error() {
                warn!(status = status.as_u16(), duration_ms, "request rejected");
            } else {
                info!(status = status.as_u16(), duration_ms, "request completed");
            }

            if elapsed > self.slow_threshold {
                warn!(
                    duration_ms,
                    threshold_ms = self.slow_threshold.as_millis(),
                    "slow request"
                );
            }
        });
    }
}

/// Echo a usable client id, otherwise mint a v7 UUID.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::now_v7().to_string(), str::to_owned)
}

/// Path with UUID segments collapsed, so metrics labels stay bounded.
fn route_label(path: &str) -> String {
    if path == "/" || path.is_empty() {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| {
            if Uuid::try_parse(segment).is_ok() {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Remote W3C trace context, when the caller sent a valid one.
fn parent_context(headers: &HeaderMap) -> Option<Context> {
    let context = global::get_text_map_propagator(|propagator| {
        propagator.extract_with_context(&Context::new(), &HeaderExtractor(headers))
    });

    let valid = context.span().span_context().is_valid();

    valid.then_some(context)
}
