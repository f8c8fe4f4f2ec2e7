//! Core functionality for the scaffold service.
//! This module contains the rate limiter, session state, the database
//! accessor and the path router.

mod database;
mod rate_limiter;
mod router;
mod session;

pub use database::Database;
pub use rate_limiter::{RateLimiter, RateLimitStatus};
pub use router::{content_type_for, PathRouter, RouteTarget, NOT_FOUND_BODY};
pub use session::{FlashKind, FlashMessage, SessionContext};
