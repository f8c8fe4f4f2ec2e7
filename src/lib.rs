//! A minimal web application scaffold: layered configuration, common
//! utilities (sanitization, tokens, CSRF, rate limiting, file logging),
//! a thin database accessor, a path-to-file router and diagnostic pages.

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod service;
pub mod utils;
