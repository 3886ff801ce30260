// Test doubles for the network seams. Compiled only with `test-support`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use portfolio_archive::{ArchiveError, LinkProbe, PageFetcher, Result};
use portfolio_common::{CandidateRecord, SearchHit};

pub use crate::search::FixtureSource;

/// Serves canned page text by URL. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn page_text(&self, url: &str) -> Result<String> {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(url.to_string());
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ArchiveError::Network(format!("no mock page for {url}")))
    }
}

/// Canned statuses for HEAD and GET probes. Unregistered URLs answer 200;
/// URLs marked unreachable fail with a network error.
#[derive(Default)]
pub struct MockProbe {
    head: HashMap<String, u16>,
    get: HashMap<String, u16>,
    unreachable: HashSet<String>,
    probed: Mutex<Vec<String>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_head(mut self, url: &str, status: u16) -> Self {
        self.head.insert(url.to_string(), status);
        self
    }

    pub fn on_get(mut self, url: &str, status: u16) -> Self {
        self.get.insert(url.to_string(), status);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    /// Every probed URL, HEAD and GET alike, in order.
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn answer(&self, url: &str, table: &HashMap<String, u16>) -> Result<u16> {
        if let Ok(mut probed) = self.probed.lock() {
            probed.push(url.to_string());
        }
        if self.unreachable.contains(url) {
            return Err(ArchiveError::Network(format!("connection refused: {url}")));
        }
        Ok(table.get(url).copied().unwrap_or(200))
    }
}

#[async_trait]
impl LinkProbe for MockProbe {
    async fn head(&self, url: &str) -> Result<u16> {
        self.answer(url, &self.head)
    }

    async fn get(&self, url: &str) -> Result<u16> {
        self.answer(url, &self.get)
    }
}

pub fn hit(title: &str, url: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: String::new(),
        source: "fixture".to_string(),
    }
}

pub fn candidate(title: &str, url: &str) -> CandidateRecord {
    CandidateRecord::from_hit(hit(title, url), "fixture query", Utc::now())
}
