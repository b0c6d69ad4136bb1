//! Per-request tracing span and request/trace id headers.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use blog_shared::ADMIN_AUTH_HEADER;
use tracing::Instrument;

/// Request id header, echoed or generated.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Trace id header, echoed or generated.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Wraps each request in an `http_request` span and echoes (or assigns)
/// request and trace ids on the response.
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let request_id = read_or_generate_header_id(request.headers(), REQUEST_ID_HEADER, "req");
    let trace_id = read_or_generate_header_id(request.headers(), TRACE_ID_HEADER, "trace");

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let mutation = is_mutation(&method);
    let has_admin_header = request.headers().contains_key(ADMIN_AUTH_HEADER);
    let started_at = Instant::now();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        trace_id = %trace_id,
        method = %method,
        path = %path,
        mutation,
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    set_response_header(response.headers_mut(), REQUEST_ID_HEADER, request_id.as_str());
    set_response_header(response.headers_mut(), TRACE_ID_HEADER, trace_id.as_str());

    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        tracing::warn!(
            parent: &span,
            status = status.as_u16(),
            elapsed_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            parent: &span,
            status = status.as_u16(),
            elapsed_ms,
            has_admin_header,
            "request completed"
        );
    }

    response
}

fn is_mutation(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

fn read_or_generate_header_id(
    headers: &HeaderMap,
    header_name: &'static str,
    prefix: &str,
) -> String {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| generate_id(prefix))
}

fn generate_id(prefix: &str) -> String {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_nanos())
        .unwrap_or_default();
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{now_ns:032x}-{counter:016x}")
}

fn set_response_header(headers: &mut HeaderMap, header_name: &'static str, value: &str) {
    let Ok(header_value) = HeaderValue::from_str(value) else {
        return;
    };
    headers.insert(HeaderName::from_static(header_name), header_value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_request_id_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  req-from-proxy "));
        assert_eq!(read_or_generate_header_id(&headers, REQUEST_ID_HEADER, "req"), "req-from-proxy");
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let headers = HeaderMap::new();
        let first = read_or_generate_header_id(&headers, TRACE_ID_HEADER, "trace");
        let second = read_or_generate_header_id(&headers, TRACE_ID_HEADER, "trace");
        assert!(first.starts_with("trace-"));
        assert_ne!(first, second);
    }

    #[test]
    fn only_write_methods_are_mutations() {
        assert!(is_mutation(&Method::POST));
        assert!(is_mutation(&Method::DELETE));
        assert!(!is_mutation(&Method::GET));
        assert!(!is_mutation(&Method::OPTIONS));
    }
}
