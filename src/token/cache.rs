//! Token cache implementation

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::error::RedeemError;
use crate::core::utils::is_regular_file;
use crate::media::Category;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// A minted token. Never modified after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token: String,
    pub path: PathBuf,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Age strictly greater than `ttl` means expired
    ///
    /// A clock that moved backwards yields a negative age, which never
    /// expires.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at)
            .to_std()
            .map(|age| age > ttl)
            .unwrap_or(false)
    }
}

/// Result of a successful redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub path: PathBuf,
    pub category: Category,
}

/// Concurrent token -> file map with lazy TTL expiry
///
/// Built once at startup and shared through `Arc`.
pub struct TokenCache {
    records: DashMap<String, TokenRecord>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    /// Create a cache on the wall clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache on a custom time source
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new token for an already resolved file
    ///
    /// A v4 UUID collision would overwrite the older record.
    pub fn mint(&self, path: PathBuf, category: Category) -> String {
        let token = Uuid::new_v4().to_string();
        let record = TokenRecord {
            token: token.clone(),
            path,
            category,
            created_at: self.clock.now(),
        };

        tracing::debug!(category = %category, path = ?record.path, "Minted media token");
        self.records.insert(token.clone(), record);
        token
    }

    /// Remove every record older than the TTL; returns how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut removed = 0usize;

        self.records.retain(|_, record| {
            if record.is_expired(now, ttl) {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            tracing::debug!(removed, remaining = self.records.len(), "Swept expired media tokens");
        }
        removed
    }

    /// Look up a token and verify its file is still servable
    ///
    /// Expired records and records whose file has vanished are removed.
    /// A valid token stays in the cache and can be redeemed again.
    pub fn redeem(&self, token: &str) -> Result<Redemption, RedeemError> {
        if token.is_empty() {
            return Err(RedeemError::Missing);
        }

        // Clone out so no shard lock is held across filesystem checks
        let record = self
            .records
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(RedeemError::Unknown)?;

        if record.is_expired(self.clock.now(), self.ttl) {
            self.remove_exact(&record);
            return Err(RedeemError::Expired);
        }

        if !is_regular_file(&record.path) {
            tracing::info!(path = ?record.path, "Media file vanished, dropping token");
            self.remove_exact(&record);
            return Err(RedeemError::FileVanished {
                path: record.path.display().to_string(),
            });
        }

        Ok(Redemption {
            path: record.path,
            category: record.category,
        })
    }

    /// Snapshot of a record without validation
    pub fn get(&self, token: &str) -> Option<TokenRecord> {
        self.records.get(token).map(|entry| entry.value().clone())
    }

    /// Number of records currently held, expired or not
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove `record` only if the map still holds that exact record, so a
    /// concurrent sweep or re-mint under the same key is never clobbered.
    fn remove_exact(&self, record: &TokenRecord) -> bool {
        self.records
            .remove_if(&record.token, |_, current| current == record)
            .is_some()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TOKEN_TTL_SECS))
    }
}
