use scaffold_service::core::RateLimiter;

#[path = "../test_utils.rs"]
mod test_utils;

#[tokio::test]
async fn requests_over_the_limit_are_rejected_within_the_window() {
    test_utils::setup();
    let dir = tempfile::tempdir().unwrap();
    let limiter = RateLimiter::new(dir.path());

    let now = 1_000_000;
    for i in 0..3 {
        let allowed = limiter.check_at("client-a", 3, 60, now + i).await.unwrap();
        assert!(allowed, "request {i} should be allowed");
    }

    let allowed = limiter.check_at("client-a", 3, 60, now + 3).await.unwrap();
    assert!(!allowed, "fourth request inside the window should be rejected");
}

#[tokio::test]
async fn requests_are_admitted_again_after_the_window_passes() {
    test_utils::setup();
    let dir = tempfile::tempdir().unwrap();
    let limiter = RateLimiter::new(dir.path());

    let now = 2_000_000;
    for _ in 0..3 {
        assert!(limiter.check_at("client-b", 3, 60, now).await.unwrap());
    }
    assert!(!limiter.check_at("client-b", 3, 60, now + 30).await.unwrap());

    // All recorded timestamps have aged out of the 60 second window
    assert!(limiter.check_at("client-b", 3, 60, now + 61).await.unwrap());
}

#[tokio::test]
async fn identifiers_are_tracked_independently() {
    test_utils::setup();
    let dir = tempfile::tempdir().unwrap();
    let limiter = RateLimiter::new(dir.path());

    let now = 3_000_000;
    for _ in 0..2 {
        assert!(limiter.check_at("client-c", 2, 60, now).await.unwrap());
    }
    assert!(!limiter.check_at("client-c", 2, 60, now).await.unwrap());

    // A different identifier is unaffected
    assert!(limiter.check_at("client-d", 2, 60, now).await.unwrap());
}

#[tokio::test]
async fn reset_clears_the_recorded_requests() {
    test_utils::setup();
    let dir = tempfile::tempdir().unwrap();
    let limiter = RateLimiter::new(dir.path());

    let now = 4_000_000;
    for _ in 0..2 {
        assert!(limiter.check_at("client-e", 2, 60, now).await.unwrap());
    }
    assert!(!limiter.check_at("client-e", 2, 60, now).await.unwrap());

    limiter.reset("client-e").await.unwrap();
    assert!(limiter.check_at("client-e", 2, 60, now).await.unwrap());
}

#[tokio::test]
async fn status_reports_count_and_remaining() {
    test_utils::setup();
    let dir = tempfile::tempdir().unwrap();
    let limiter = RateLimiter::new(dir.path());

    limiter.check("client-f", 5, 60).await.unwrap();
    limiter.check("client-f", 5, 60).await.unwrap();

    let status = limiter.status("client-f", 5, 60).await.unwrap();
    assert_eq!(status.count, 2);
    assert_eq!(status.limit, 5);
    assert_eq!(status.remaining, 3);
}
