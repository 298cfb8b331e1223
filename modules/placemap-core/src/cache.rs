//! Local copy of the category forest.
//!
//! The hierarchy is stored under one fixed key with no expiry: read once at
//! startup if present, written after a successful fetch. A cache that cannot
//! be read is logged and treated as empty.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};

use placemap_common::{Category, PlaceMapError, Result};

use crate::category_tree::CategoryTree;
use crate::provider::VenueProvider;

pub const CACHE_KEY: &str = "categories";

#[async_trait]
pub trait CategoryCache: Send + Sync {
    async fn load(&self) -> Result<Option<Vec<Category>>>;
    async fn store(&self, categories: &[Category]) -> Result<()>;
}

/// JSON file at `<dir>/categories.json`.
pub struct FileCategoryCache {
    dir: PathBuf,
}

impl FileCategoryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{CACHE_KEY}.json"))
    }
}

#[async_trait]
impl CategoryCache for FileCategoryCache {
    async fn load(&self) -> Result<Option<Vec<Category>>> {
        let path = self.path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PlaceMapError::Cache(format!("{}: {e}", path.display()))),
        };
        let categories = serde_json::from_slice(&bytes)
            .map_err(|e| PlaceMapError::Cache(format!("{}: {e}", path.display())))?;
        Ok(Some(categories))
    }

    async fn store(&self, categories: &[Category]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create cache dir: {}", self.dir.display()))?;
        let json = serde_json::to_vec(categories)
            .map_err(|e| PlaceMapError::Cache(e.to_string()))?;
        let path = self.path();
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCategoryCache {
    slot: Mutex<Option<Vec<Category>>>,
}

impl MemoryCategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(categories: Vec<Category>) -> Self {
        Self {
            slot: Mutex::new(Some(categories)),
        }
    }
}

#[async_trait]
impl CategoryCache for MemoryCategoryCache {
    async fn load(&self) -> Result<Option<Vec<Category>>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| PlaceMapError::Cache("cache lock poisoned".into()))?;
        Ok(slot.clone())
    }

    async fn store(&self, categories: &[Category]) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| PlaceMapError::Cache("cache lock poisoned".into()))?;
        *slot = Some(categories.to_vec());
        Ok(())
    }
}

/// Load the category tree, from the cache when it has a copy, else from the
/// provider (then populating the cache). A provider failure is fatal.
pub async fn load_categories<P>(provider: &P, cache: Option<&dyn CategoryCache>) -> Result<CategoryTree>
where
    P: VenueProvider + ?Sized,
{
    if let Some(cache) = cache {
        match cache.load().await {
            Ok(Some(categories)) => {
                info!(count = categories.len(), "Loaded categories from cache");
                return Ok(CategoryTree::new(categories));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Category cache unreadable, fetching from provider"),
        }
    }

    let categories = provider.fetch_categories().await?;
    info!(count = categories.len(), "Fetched categories from provider");

    if let Some(cache) = cache {
        if let Err(e) = cache.store(&categories).await {
            warn!(error = %e, "Failed to cache categories");
        }
    }

    Ok(CategoryTree::new(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    fn forest() -> Vec<Category> {
        vec![Category::new("food", "Food", "Food")
            .with_children(vec![Category::new("asian", "Asian", "Asians")])]
    }

    #[tokio::test]
    async fn file_cache_round_trips_nested_forest() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCategoryCache::new(dir.path());
        assert!(cache.load().await.unwrap().is_none());

        cache.store(&forest()).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(forest()));
        assert!(cache.path().ends_with("categories.json"));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCategoryCache::new(dir.path());
        std::fs::write(cache.path(), b"{not json").unwrap();
        assert!(matches!(cache.load().await, Err(PlaceMapError::Cache(_))));
    }

    #[tokio::test]
    async fn cached_copy_skips_provider() {
        let provider = MockProvider::new().fail_categories();
        let cache = MemoryCategoryCache::with(forest());
        let tree = load_categories(&provider, Some(&cache)).await.unwrap();
        assert!(tree.find("asian").is_some());
        assert_eq!(provider.category_fetches(), 0);
    }

    #[tokio::test]
    async fn fetch_populates_empty_cache() {
        let provider = MockProvider::new().with_categories(forest());
        let cache = MemoryCategoryCache::new();
        load_categories(&provider, Some(&cache)).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(forest()));

        load_categories(&provider, Some(&cache)).await.unwrap();
        assert_eq!(provider.category_fetches(), 1);
    }

    #[tokio::test]
    async fn corrupt_cache_falls_back_to_provider() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCategoryCache::new(dir.path());
        std::fs::write(cache.path(), b"[[[").unwrap();
        let provider = MockProvider::new().with_categories(forest());

        let tree = load_categories(&provider, Some(&cache)).await.unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(cache.load().await.unwrap(), Some(forest()));
    }

    #[tokio::test]
    async fn provider_failure_is_fatal_without_cache() {
        let provider = MockProvider::new().fail_categories();
        let err = load_categories(&provider, None).await.err().unwrap();
        assert!(matches!(err, PlaceMapError::ProviderUnavailable(_)));
    }
}
