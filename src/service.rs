use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, Request, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Settings;
use crate::core::{content_type_for, PathRouter, RateLimiter, RouteTarget, NOT_FOUND_BODY};
use crate::diagnostics::{
    render_dashboard, render_report, render_runtime_info, run_access_checks, run_security_checks,
};
use crate::utils::{client_ip, create_request_span, FileLogger, LogLevel, ScaffoldError};

/// Window applied to the per-minute request limit, in seconds
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Shared state for the HTTP handlers
pub struct AppState {
    pub settings: Settings,
    pub rate_limiter: RateLimiter,
    pub path_router: PathRouter,
    pub file_logger: FileLogger,
    /// Root of the public content tree, also probed by the access test
    pub public_dir: PathBuf,
}

impl AppState {
    /// Build state with the default directory layout: `public/` for content,
    /// `tests/pages/` for static test pages
    pub fn new(settings: Settings) -> Self {
        Self::with_roots(settings, "public", "tests/pages")
    }

    /// Build state with explicit directory roots
    pub fn with_roots(
        settings: Settings,
        public_dir: impl Into<PathBuf>,
        tests_dir: impl Into<PathBuf>,
    ) -> Self {
        let public_dir = public_dir.into();
        let rate_limiter = RateLimiter::new(&settings.cache.path);
        let path_router = PathRouter::new(&public_dir, tests_dir);
        let file_logger = FileLogger::new(settings.logging.clone());

        Self {
            settings,
            rate_limiter,
            path_router,
            file_logger,
            public_dir,
        }
    }
}

/// Assemble the HTTP router: diagnostic routes, the path-to-file fallback,
/// request spans, tracing and (when enabled) the rate limit middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(dashboard))
        .route("/info", get(runtime_info))
        .route("/tests/access-test", get(access_test))
        .route("/tests/security-test", get(security_test))
        .fallback(serve_path);

    if state.settings.api.rate_limit.enabled {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));
    }

    router
        .layer(middleware::from_fn(request_span_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /` - environment dashboard
async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_dashboard(&state.settings))
}

/// `GET /info` - runtime information page
async fn runtime_info(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_runtime_info(&state.settings))
}

/// `GET /tests/access-test` - directory and permission checklist
async fn access_test(State(state): State<Arc<AppState>>) -> Html<String> {
    let report = run_access_checks(&state.settings, &state.public_dir);
    Html(render_report(&state.settings.app.name, "Access Test", &report))
}

/// `GET /tests/security-test` - security checklist
async fn security_test(State(state): State<Arc<AppState>>) -> Html<String> {
    let report = run_security_checks(&state.settings, &state.path_router);
    Html(render_report(
        &state.settings.app.name,
        "Security Test",
        &report,
    ))
}

/// Fallback handler: map the request path onto the content trees
async fn serve_path(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match state.path_router.resolve(uri.path()) {
        RouteTarget::File(path) => match tokio::fs::read(&path).await {
            Ok(bytes) => {
                ([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response()
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to read resolved file");
                not_found()
            }
        },
        RouteTarget::NotFound => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// Admission middleware backed by the file-based rate limiter
///
/// A rejected request gets 429 and the rejection is written through the
/// application file logger. A limiter failure fails open.
async fn rate_limit_middleware<B>(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let remote = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let ip = client_ip(request.headers(), remote);
    let limit = state.settings.api.rate_limit.requests_per_minute as usize;

    match state
        .rate_limiter
        .check(&ip, limit, RATE_LIMIT_WINDOW_SECS)
        .await
    {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            let rejection = ScaffoldError::RateLimitExceeded(ip.clone());
            if let Err(e) = state
                .file_logger
                .log(&rejection.to_string(), LogLevel::Warning, &ip)
            {
                tracing::warn!(error = %e, "Failed to write application log");
            }
            (StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Rate limit check failed");
            next.run(request).await
        }
    }
}

/// Wrap each request in a span carrying a fresh request id
async fn request_span_middleware<B>(request: Request<B>, next: Next<B>) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = create_request_span(&request_id);
    next.run(request).instrument(span).await
}
