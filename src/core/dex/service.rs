//! Caller-facing operations over the dataset and the ability cache.
//!
//! Input validation lives here so the query and generation helpers stay
//! infallible: blank search terms and blank ability locators are rejected
//! before any lookup work.

use std::time::Duration;

use super::ability::AbilityCache;
use super::error::{DexError, Result};
use super::generation;
use super::query;
use super::store::{Dataset, DatasetStore};
use super::types::{AbilityDescription, Pokemon};
use crate::config::AppConfig;

pub struct DexService {
    store: DatasetStore,
    abilities: AbilityCache,
}

impl DexService {
    pub fn new(store: DatasetStore, abilities: AbilityCache) -> Self {
        Self { store, abilities }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let store = DatasetStore::from_path(config.dataset_path());
        let abilities = AbilityCache::new(
            Duration::from_secs(config.upstream.timeout_secs),
            config.upstream.language.clone(),
        );
        Self::new(store, abilities)
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn abilities(&self) -> &AbilityCache {
        &self.abilities
    }

    /// Trigger the one-time load without serving anything.
    pub async fn warm_up(&self) -> Result<usize> {
        Ok(self.dataset().await?.len())
    }

    /// All records, ascending by id.
    pub async fn list_all(&self) -> Result<&[Pokemon]> {
        Ok(self.dataset().await?.all_sorted_by_id())
    }

    pub async fn get_by_id(&self, id: u32) -> Result<Option<&Pokemon>> {
        Ok(self.dataset().await?.by_id(id))
    }

    /// Records in generation `number`; empty for unknown generations.
    pub async fn list_by_generation(&self, number: u8) -> Result<Vec<&Pokemon>> {
        let dataset = self.dataset().await?;
        Ok(generation::members_of(number, dataset.all_sorted_by_id()))
    }

    /// Name and/or type substring search. At least one term must be
    /// non-blank; with both, results must match both.
    pub async fn search(
        &self,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<&Pokemon>> {
        let name = non_blank(name);
        let category = non_blank(category);
        if name.is_none() && category.is_none() {
            return Err(DexError::InvalidInput(
                "at least one of 'name' or 'type' is required".to_string(),
            ));
        }

        let dataset = self.dataset().await?;
        Ok(query::search(name, category, dataset.all_sorted_by_id()))
    }

    /// English description for the ability at `locator`, or `None` when it
    /// cannot be resolved for any reason.
    pub async fn describe_ability(&self, locator: &str) -> Result<Option<AbilityDescription>> {
        if locator.trim().is_empty() {
            return Err(DexError::InvalidInput("ability url is required".to_string()));
        }
        Ok(self.abilities.describe(locator).await)
    }

    async fn dataset(&self) -> Result<&Dataset> {
        Ok(self.store.load().await?)
    }
}

/// Drops blank terms. Non-blank terms pass through untrimmed, so surrounding
/// spaces take part in the substring match.
fn non_blank(term: Option<&str>) -> Option<&str> {
    term.filter(|t| !t.trim().is_empty())
}
