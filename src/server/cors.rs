//! Cross-origin allow-list middleware

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::core::config::RelayConfig;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Exact-match origin allow-list
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: BTreeSet<String>,
}

impl CorsPolicy {
    /// Create a policy from a list of origins
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a policy from the relay configuration
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.allowed_origins.iter().cloned())
    }

    /// Byte-for-byte comparison against the allow-list
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// Write the CORS response headers for a request carrying `origin`
    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        if let Some(origin) = origin {
            let allowed = origin.to_str().map(|o| self.is_allowed(o)).unwrap_or(false);
            if allowed {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            } else {
                debug!("Origin {:?} not in allow-list", origin);
            }
        }

        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }
}

/// Middleware: answers every `OPTIONS` with 204 and decorates all other responses
pub async fn cors(State(policy): State<Arc<CorsPolicy>>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();

    let mut response = if request.method() == Method::OPTIONS {
        debug!("Preflight for {}", request.uri().path());
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(origin.as_ref(), response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn_with_state, routing::get, Router};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn app(hits: Arc<AtomicUsize>) -> Router {
        let policy = Arc::new(CorsPolicy::new([
            "https://olympusmultimedia.com",
            "http://olympusmultimedia.com",
        ]));
        Router::new()
            .route(
                "/ping",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "pong"
                    }
                }),
            )
            .layer(from_fn_with_state(policy, cors))
    }

    fn request(method: Method, origin: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method(method).uri("/ping");
        if let Some(origin) = origin {
            builder = builder.header(ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_exact_match_only() {
        let policy = CorsPolicy::new(["https://olympusmultimedia.com"]);
        assert!(policy.is_allowed("https://olympusmultimedia.com"));
        assert!(!policy.is_allowed("https://olympusmultimedia.com/"));
        assert!(!policy.is_allowed("https://OlympusMultimedia.com"));
        assert!(!policy.is_allowed("https://evil.olympusmultimedia.com"));
    }

    #[tokio::test]
    async fn test_allowed_origin_is_echoed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone())
            .oneshot(request(Method::GET, Some("http://olympusmultimedia.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://olympusmultimedia.com"
        );
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_origin() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits)
            .oneshot(request(Method::GET, Some("https://attacker.example")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
    }

    #[tokio::test]
    async fn test_missing_origin_gets_no_allow_origin() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits).oneshot(request(Method::GET, None)).await.unwrap();

        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone())
            .oneshot(request(Method::OPTIONS, Some("https://olympusmultimedia.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://olympusmultimedia.com"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
