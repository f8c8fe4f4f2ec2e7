//! Utility modules for the scaffold service.
//! This module contains common helpers used across the application.

mod error;
mod helpers;
mod logging;

pub use error::{ScaffoldError, ScaffoldResult};

pub use helpers::{
    client_ip, format_bytes, generate_token, is_ajax, redirect, redirect_with_status, sanitize,
    sanitize_str, validate_email,
};

pub use logging::{create_request_span, init_logging, FileLogger, LogLevel};
