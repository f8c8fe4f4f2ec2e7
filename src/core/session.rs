use crate::utils::generate_token;

/// Hex length of the per-session CSRF token
const CSRF_TOKEN_LENGTH: usize = 32;

/// Category of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Warning,
    Info,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
            FlashKind::Warning => "warning",
            FlashKind::Info => "info",
        }
    }
}

/// A one-time notification attached to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

/// Session state scoped to one request
///
/// Holds the CSRF token and pending flash messages. The context is built by
/// the handler that needs it and passed explicitly, never read from ambient
/// state.
#[derive(Debug, Default)]
pub struct SessionContext {
    csrf_token: Option<String>,
    flash_messages: Vec<FlashMessage>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session's CSRF token, generating it on first use
    ///
    /// The token is stable for the lifetime of the context and never rotated.
    pub fn csrf_token(&mut self) -> &str {
        self.csrf_token
            .get_or_insert_with(|| generate_token(CSRF_TOKEN_LENGTH))
            .as_str()
    }

    /// Verify a submitted token against the session's CSRF token
    ///
    /// Constant-time comparison; false when no token has been generated yet.
    pub fn verify_csrf_token(&self, token: &str) -> bool {
        match &self.csrf_token {
            Some(expected) => constant_time_eq(expected.as_bytes(), token.as_bytes()),
            None => false,
        }
    }

    /// Queue a flash message
    pub fn add_flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash_messages.push(FlashMessage {
            kind,
            message: message.into(),
        });
    }

    /// Drain pending flash messages; each message is delivered at most once
    pub fn take_flash(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.flash_messages)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
