use axum::{
    http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    http::{HeaderName, Method, Request, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::admin;
use crate::api::auth;
use crate::api::courses;
use crate::api::handlers;
use crate::api::quizzes;
use crate::api::student;
use crate::api::teacher;
use crate::core::{config::Settings, state::AppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub(crate) fn router(state: AppState) -> Router {
    let api_v1_prefix = state.settings().api().api_v1_str.clone();

    let base = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz).head(handlers::healthz))
        .nest(&api_v1_prefix, api_v1_router());

    let mut router = with_observability(base).layer(cors_layer(state.settings()));

    // Unwrapped on purpose: scrapes should not count toward request metrics.
    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/quizzes", quizzes::router())
        .nest("/admin", admin::router())
        .nest("/teacher", teacher::router())
        .nest("/student", student::router())
}

/// Trailing-slash normalization, request ids, and the traced request span
/// with per-status counters.
fn with_observability(router: Router<AppState>) -> Router<AppState> {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let span_header = request_id_header.clone();

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(&span_header)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status = response.status().as_u16().to_string();
            metrics::counter!("http_requests_total", "status" => status.clone()).increment(1);
            metrics::histogram!("http_request_duration_seconds", "status" => status)
                .record(latency.as_secs_f64());
        });

    router
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(trace_layer)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        // Wildcard origin cannot be combined with allow_credentials
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true).allow_origin(AllowOrigin::list(origins))
    }
}
