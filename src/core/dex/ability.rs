//! Cached ability descriptions fetched from the upstream API.
//!
//! # Locking
//!
//! The map is behind a single async mutex that is held only for the get or
//! the insert, never across the HTTP request. Two concurrent misses for the
//! same locator may therefore both fetch; the later insert wins. Both fetches
//! produce the same description, so the race only costs an extra request.
//!
//! # Growth
//!
//! Entries are never evicted. The key space is the set of ability locators
//! referenced by the dataset, which is finite.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::instrument;

use super::error::AbilityError;
use super::types::AbilityDescription;

/// Per-request upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Language code of the effect entry that is served.
pub const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// Upstream body
// ============================================================================

#[derive(Debug, Deserialize)]
struct AbilityDetail {
    name: String,
    #[serde(default)]
    effect_entries: Vec<EffectEntry>,
}

#[derive(Debug, Deserialize)]
struct EffectEntry {
    effect: String,
    #[serde(default)]
    short_effect: Option<String>,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

impl AbilityDetail {
    fn into_description(self, language: &str) -> Result<AbilityDescription, AbilityError> {
        let entry = self
            .effect_entries
            .into_iter()
            .find(|e| e.language.name.eq_ignore_ascii_case(language));

        match entry {
            Some(entry) => {
                let effect = if entry.effect.trim().is_empty() {
                    entry.short_effect.unwrap_or_default()
                } else {
                    entry.effect
                };
                Ok(AbilityDescription {
                    name: self.name,
                    effect,
                })
            }
            None => Err(AbilityError::MissingLanguage {
                ability: self.name,
                language: language.to_string(),
            }),
        }
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Upstream requests issued, successful or not.
    pub fetches: u64,
    pub entries: usize,
}

/// Locator -> English description, filled on first successful lookup.
pub struct AbilityCache {
    client: Client,
    timeout: Duration,
    language: String,
    entries: Mutex<HashMap<String, AbilityDescription>>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl AbilityCache {
    pub fn new(timeout: Duration, language: impl Into<String>) -> Self {
        Self::with_client(Client::new(), timeout, language)
    }

    pub fn with_client(client: Client, timeout: Duration, language: impl Into<String>) -> Self {
        Self {
            client,
            timeout,
            language: language.into(),
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    /// Resolve the description for `locator`.
    ///
    /// Every failure (blank locator, timeout, bad status, unparsable body,
    /// no entry in the configured language) yields `None` and leaves the
    /// cache untouched. The cause is logged.
    pub async fn describe(&self, locator: &str) -> Option<AbilityDescription> {
        let key = locator.trim();
        if key.is_empty() {
            return None;
        }

        let cached = self.entries.lock().await.get(key).cloned();
        if let Some(description) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Ability cache hit: {}", key);
            return Some(description);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.fetch(key).await {
            Ok(description) => {
                self.entries
                    .lock()
                    .await
                    .insert(key.to_string(), description.clone());
                Some(description)
            }
            Err(e @ AbilityError::Parse(_)) => {
                log::error!("Ability lookup for {} failed: {}", key, e);
                None
            }
            Err(e) => {
                log::warn!("Ability lookup for {} failed: {}", key, e);
                None
            }
        }
    }

    /// Whether `locator` currently has a cached description.
    pub async fn contains(&self, locator: &str) -> bool {
        self.entries.lock().await.contains_key(locator.trim())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            entries: self.len().await,
        }
    }

    #[instrument(skip(self))]
    async fn fetch(&self, locator: &str) -> Result<AbilityDescription, AbilityError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let resp = self
            .client
            .get(locator)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AbilityError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let detail: AbilityDetail = serde_json::from_str(&body)?;
        detail.into_description(&self.language)
    }
}

impl Default for AbilityCache {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_LANGUAGE)
    }
}
