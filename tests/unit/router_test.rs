use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use scaffold_service::config::Settings;
use scaffold_service::core::{PathRouter, RouteTarget, NOT_FOUND_BODY};
use scaffold_service::service::{build_router, AppState};
use tower::ServiceExt;

#[path = "../test_utils.rs"]
mod test_utils;

struct Roots {
    _dir: tempfile::TempDir,
    public: std::path::PathBuf,
    tests: std::path::PathBuf,
}

fn content_roots() -> Roots {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");
    let tests = dir.path().join("tests");
    fs::create_dir_all(&public).unwrap();
    fs::create_dir_all(&tests).unwrap();
    fs::write(public.join("index.html"), "<html>entry</html>").unwrap();
    fs::write(public.join("style.css"), "body {}").unwrap();
    fs::write(tests.join("debug.html"), "<html>debug</html>").unwrap();
    Roots {
        _dir: dir,
        public,
        tests,
    }
}

#[test]
fn root_path_resolves_to_the_entry_file() {
    let roots = content_roots();
    let router = PathRouter::new(&roots.public, &roots.tests);

    let target = router.resolve("/");
    assert_eq!(target, RouteTarget::File(roots.public.join("index.html")));
}

#[test]
fn test_prefix_is_checked_before_the_public_tree() {
    let roots = content_roots();
    let router = PathRouter::new(&roots.public, &roots.tests);

    let target = router.resolve("/tests/debug.html");
    assert_eq!(target, RouteTarget::File(roots.tests.join("debug.html")));
}

#[test]
fn unknown_paths_are_not_found() {
    let roots = content_roots();
    let router = PathRouter::new(&roots.public, &roots.tests);

    assert_eq!(router.resolve("/does/not/exist"), RouteTarget::NotFound);
    assert_eq!(router.resolve("/tests/missing.html"), RouteTarget::NotFound);
}

#[test]
fn traversal_components_never_escape_a_root() {
    let roots = content_roots();
    let router = PathRouter::new(&roots.public, &roots.tests);

    assert_eq!(router.resolve("/../index.html"), RouteTarget::NotFound);
    assert_eq!(router.resolve("/tests/../style.css"), RouteTarget::NotFound);
}

fn test_state(roots: &Roots, state_dir: &std::path::Path) -> Arc<AppState> {
    let mut settings = Settings::default();
    settings.api.rate_limit.enabled = false;
    settings.logging.enabled = false;
    settings.cache.path = state_dir.join("cache").display().to_string();
    Arc::new(AppState::with_roots(settings, &roots.public, &roots.tests))
}

#[tokio::test]
async fn http_fallback_serves_files_and_404s_with_the_literal_body() {
    test_utils::setup();
    let roots = content_roots();
    let state_dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&roots, state_dir.path()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/does/not/exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&body[..], NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn dashboard_and_self_tests_are_served() {
    test_utils::setup();
    let roots = content_roots();
    let state_dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&roots, state_dir.path()));

    for path in ["/", "/info", "/tests/security-test"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn static_test_pages_are_served_through_the_prefix_mapping() {
    test_utils::setup();
    let roots = content_roots();
    let state_dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&roots, state_dir.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tests/debug.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&body[..], b"<html>debug</html>");
}
