use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::utils::ScaffoldResult;

/// Per-identifier request log persisted as JSON
#[derive(Debug, Default, Serialize, Deserialize)]
struct RateLimitRecord {
    /// Ordered Unix timestamps of accepted requests
    requests: Vec<u64>,
}

/// File-backed rate limiter using a sliding log of request timestamps
///
/// One record file per identifier, named by a hash of the identifier.
/// No lock is held across the read-prune-write sequence, so concurrent
/// callers for the same identifier can transiently exceed the limit;
/// admission is best-effort.
pub struct RateLimiter {
    /// Directory holding the per-identifier record files
    dir: PathBuf,
}

impl RateLimiter {
    /// Create a new rate limiter storing records under `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check whether a request from `identifier` is within the limit
    ///
    /// Timestamps older than `window` seconds are discarded first. When the
    /// surviving count has reached `limit` the request is rejected and
    /// nothing is persisted; otherwise the current timestamp is appended
    /// and the record written back.
    pub async fn check(&self, identifier: &str, limit: usize, window: u64) -> ScaffoldResult<bool> {
        self.check_at(identifier, limit, window, unix_now()).await
    }

    /// Same as [`check`](Self::check) with an injected clock, for tests
    pub async fn check_at(
        &self,
        identifier: &str,
        limit: usize,
        window: u64,
        now: u64,
    ) -> ScaffoldResult<bool> {
        let path = self.record_path(identifier);
        let mut record = load_record(&path).await;

        // Drop entries that have aged out of the window
        record.requests.retain(|&ts| now.saturating_sub(ts) < window);

        if record.requests.len() >= limit {
            // The pruning work is discarded on rejection and redone next call
            return Ok(false);
        }

        record.requests.push(now);

        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, serde_json::to_vec(&record)?).await?;

        Ok(true)
    }

    /// Remove the record for an identifier (manual intervention or tests)
    pub async fn reset(&self, identifier: &str) -> ScaffoldResult<()> {
        match fs::remove_file(self.record_path(identifier)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get current rate limit status for an identifier
    pub async fn status(
        &self,
        identifier: &str,
        limit: usize,
        window: u64,
    ) -> ScaffoldResult<RateLimitStatus> {
        let now = unix_now();
        let mut record = load_record(&self.record_path(identifier)).await;
        record.requests.retain(|&ts| now.saturating_sub(ts) < window);

        let count = record.requests.len();
        Ok(RateLimitStatus {
            identifier: identifier.to_string(),
            count,
            limit,
            remaining: limit.saturating_sub(count),
        })
    }

    fn record_path(&self, identifier: &str) -> PathBuf {
        let digest = Sha256::digest(identifier.as_bytes());
        self.dir.join(format!("rate_limit_{}", hex::encode(digest)))
    }
}

/// Status information for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Identifier the status refers to
    pub identifier: String,
    /// Request count within the current window
    pub count: usize,
    /// Maximum allowed requests
    pub limit: usize,
    /// Remaining requests
    pub remaining: usize,
}

/// Read a record file; a missing or corrupt file yields an empty record
async fn load_record(path: &Path) -> RateLimitRecord {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
        Err(_) => RateLimitRecord::default(),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
