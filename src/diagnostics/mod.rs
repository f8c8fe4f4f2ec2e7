//! Diagnostic pages for the scaffold service.
//! Read-only HTML reports on the hosting environment plus the
//! access and security self-test checklists.

pub mod pages;

pub use pages::{render_dashboard, render_runtime_info};
pub use self_test::{run_access_checks, run_security_checks, render_report, CheckReport, CheckResult};
