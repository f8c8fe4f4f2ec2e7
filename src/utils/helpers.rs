use std::net::IpAddr;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use email_address::EmailAddress;
use rand::Rng;
use serde_json::Value;

/// Forwarding headers consulted for the client address, in priority order
const FORWARD_HEADERS: [&str; 6] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-forwarded",
    "x-cluster-client-ip",
    "forwarded-for",
    "forwarded",
];

/// Sanitize input data
///
/// Recurses through arrays and objects; strings are trimmed and HTML-escaped,
/// non-string scalars pass through unchanged.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_str(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), sanitize(v)))
            .collect::<serde_json::Map<_, _>>()
            .into(),
        other => other.clone(),
    }
}

/// Trim and HTML-escape a single string, quoting both quote styles
pub fn sanitize_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Generate a secure random token
///
/// Returns a hex string of `length` characters rounded down to the nearest
/// even count, since each random byte encodes as two hex digits.
pub fn generate_token(length: usize) -> String {
    let mut bytes = vec![0u8; length / 2];
    rand::thread_rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}

/// Validate email address syntax
pub fn validate_email(email: &str) -> bool {
    email.parse::<EmailAddress>().is_ok()
}

/// Check whether the request was made via XMLHttpRequest
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
        .unwrap_or(false)
}

/// Determine the client IP address
///
/// Scans the forwarding headers in priority order, then the socket address,
/// returning the first publicly routable IP literal. Multi-value headers are
/// comma-split and each candidate trimmed. Falls back to the socket address
/// verbatim, or `"unknown"` when no address fields are set.
pub fn client_ip(headers: &HeaderMap, remote_addr: Option<IpAddr>) -> String {
    for name in FORWARD_HEADERS {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            for candidate in value.split(',') {
                if let Ok(ip) = candidate.trim().parse::<IpAddr>() {
                    if is_public_ip(ip) {
                        return ip.to_string();
                    }
                }
            }
        }
    }

    if let Some(addr) = remote_addr {
        if is_public_ip(addr) {
            return addr.to_string();
        }
    }

    remote_addr
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Check whether an address is publicly routable
///
/// Rejects private, loopback, link-local, unique-local, unspecified,
/// broadcast, documentation and shared (CGNAT) ranges.
fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_unspecified()
                // 100.64.0.0/10, shared address space
                || (octets[0] == 100 && (octets[1] & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_multicast()
                // fc00::/7 unique local
                || (segments[0] & 0xfe00) == 0xfc00
                // fe80::/10 link local
                || (segments[0] & 0xffc0) == 0xfe80)
        }
    }
}

/// Format a byte count to a human readable form
///
/// Values of at most 1024 stay in the base unit; larger values divide through
/// KB, MB, GB, TB, rounded to `precision` decimals with a trimmed fraction.
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes <= 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.precision$}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Build an HTTP redirect response with the default 302 status
pub fn redirect(url: &str) -> Response {
    redirect_with_status(url, StatusCode::FOUND)
}

/// Build an HTTP redirect response with an explicit status code
pub fn redirect_with_status(url: &str, status: StatusCode) -> Response {
    (status, [(header::LOCATION, url.to_string())]).into_response()
}
