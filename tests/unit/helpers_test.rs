use axum::http::{header, HeaderMap, StatusCode};
use scaffold_service::utils::{
    client_ip, format_bytes, generate_token, is_ajax, redirect, redirect_with_status,
    sanitize_str, validate_email,
};

#[test]
fn tokens_are_lowercase_hex_of_even_length() {
    for requested in [0, 7, 8, 16, 32, 33] {
        let token = generate_token(requested);
        assert_eq!(token.len(), requested / 2 * 2, "requested {requested}");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}

#[test]
fn tokens_are_not_repeated() {
    assert_ne!(generate_token(32), generate_token(32));
}

#[test]
fn format_bytes_reports_expected_units() {
    assert_eq!(format_bytes(0, 2), "0 B");
    assert_eq!(format_bytes(1023, 2), "1023 B");
    assert_eq!(format_bytes(1024, 2), "1024 B");
    assert_eq!(format_bytes(1024 * 1024, 2), "1 MB");
    assert_eq!(format_bytes(1536, 2), "1.5 KB");
    assert_eq!(format_bytes(5 * 1024 * 1024 * 1024, 2), "5 GB");
}

#[test]
fn email_validation_delegates_to_the_parser() {
    assert!(validate_email("user@example.com"));
    assert!(validate_email("first.last+tag@sub.example.co"));
    assert!(!validate_email("not-an-email"));
    assert!(!validate_email("user@"));
    assert!(!validate_email(""));
}

#[test]
fn sanitize_trims_and_escapes() {
    assert_eq!(sanitize_str("  plain  "), "plain");
    assert_eq!(sanitize_str("<b>&\"'</b>"), "&lt;b&gt;&amp;&quot;&#039;&lt;/b&gt;");
}

#[test]
fn forwarding_header_with_public_address_wins_over_the_socket() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "10.0.0.1, 8.8.8.8".parse().unwrap());

    let ip = client_ip(&headers, Some("192.168.1.10".parse().unwrap()));
    assert_eq!(ip, "8.8.8.8");
}

#[test]
fn headers_are_scanned_in_priority_order() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "1.1.1.1".parse().unwrap());
    headers.insert("cf-connecting-ip", "9.9.9.9".parse().unwrap());

    let ip = client_ip(&headers, None);
    assert_eq!(ip, "9.9.9.9");
}

#[test]
fn private_only_candidates_fall_back_to_the_socket_address() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());

    let ip = client_ip(&headers, Some("172.16.0.4".parse().unwrap()));
    assert_eq!(ip, "172.16.0.4");
}

#[test]
fn unknown_when_no_address_fields_are_set() {
    let headers = HeaderMap::new();
    assert_eq!(client_ip(&headers, None), "unknown");
}

#[test]
fn redirect_defaults_to_302_with_the_location_set() {
    let response = redirect("/login");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
}

#[test]
fn redirect_with_status_honors_the_given_code() {
    let response = redirect_with_status("/moved", StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/moved"
    );
}

#[test]
fn ajax_detection_is_case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
    assert!(is_ajax(&headers));

    headers.insert("x-requested-with", "xmlhttprequest".parse().unwrap());
    assert!(is_ajax(&headers));
}

#[test]
fn requests_without_the_marker_header_are_not_ajax() {
    let headers = HeaderMap::new();
    assert!(!is_ajax(&headers));

    let mut headers = HeaderMap::new();
    headers.insert("x-requested-with", "fetch".parse().unwrap());
    assert!(!is_ajax(&headers));
}
