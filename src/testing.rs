//! In-memory `Catalog` used by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::Catalog;
use crate::error::{DexError, Result};
use crate::types::{CatalogEntry, Category, Imagery, PageRef};

pub fn entry(id: u64, name: &str, categories: &[&str]) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        categories: categories.iter().map(|c| Category::from_name(c)).collect(),
        imagery: Imagery::from_sprites(&serde_json::json!({
            "front_default": format!("https://img.test/{}.png", id),
        })),
    }
}

/// Generates `count` entries named `mon-1`, `mon-2`, ...
pub fn numbered(count: u64) -> Vec<CatalogEntry> {
    (1..=count)
        .map(|id| entry(id, &format!("mon-{}", id), &["normal"]))
        .collect()
}

/// Wraps a mock so tests can keep its counters while the code under test
/// holds it as a `dyn Catalog`.
pub fn shared(mock: MockCatalog) -> (Arc<MockCatalog>, Arc<dyn Catalog>) {
    let mock = Arc::new(mock);
    let catalog: Arc<dyn Catalog> = mock.clone();
    (mock, catalog)
}

#[derive(Debug, Default)]
pub struct MockCatalog {
    entries: Vec<CatalogEntry>,
    failing_details: HashSet<u64>,
    fail_list: AtomicBool,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing_detail(mut self, id: u64) -> Self {
        self.failing_details.insert(id);
        self
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<PageRef>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(DexError::Api("PokeAPI 503 Service Unavailable: down".into()));
        }

        Ok(self
            .entries
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|e| PageRef {
                name: e.name.clone(),
                url: format!("mock://pokemon/{}/", e.id),
            })
            .collect())
    }

    async fn detail(&self, url: &str) -> Result<CatalogEntry> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let id: u64 = url
            .trim_start_matches("mock://pokemon/")
            .trim_end_matches('/')
            .parse()
            .map_err(|_| DexError::Decode(format!("bad url {}", url)))?;

        if self.failing_details.contains(&id) {
            return Err(DexError::Api(format!("PokeAPI 500 Internal Server Error: {}", id)));
        }

        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| DexError::Api(format!("PokeAPI 404 Not Found: {}", url)))
    }
}
