// Record sources: where candidate search hits come from.
//
// Real search-engine integrations plug in behind `RecordSource`. This crate
// ships the no-op source, a fixture source (query map or JSON file) and a
// composite that fans a query out to several sources.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use portfolio_common::SearchHit;
use serde::Deserialize;
use tracing::{info, warn};

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn query(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Label used in logs.
    fn name(&self) -> &str;
}

/// Source used when no provider is configured: every query finds nothing.
pub struct NoopSource;

#[async_trait]
impl RecordSource for NoopSource {
    async fn query(&self, _query: &str) -> Result<Vec<SearchHit>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Canned hits, keyed by exact query. `fallback` answers every query that has
/// no entry of its own.
#[derive(Debug, Default)]
pub struct FixtureSource {
    by_query: HashMap<String, Vec<SearchHit>>,
    fallback: Vec<SearchHit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    ByQuery(HashMap<String, Vec<SearchHit>>),
    Flat(Vec<SearchHit>),
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.by_query.insert(query.to_string(), hits);
        self
    }

    pub fn with_fallback(mut self, hits: Vec<SearchHit>) -> Self {
        self.fallback = hits;
        self
    }

    /// Load hits from JSON: either a list (served for every query) or an
    /// object mapping query strings to lists.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file: {}", path.display()))?;
        let parsed: FixtureFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records file: {}", path.display()))?;

        let source = match parsed {
            FixtureFile::ByQuery(by_query) => Self {
                by_query,
                fallback: Vec::new(),
            },
            FixtureFile::Flat(fallback) => Self {
                by_query: HashMap::new(),
                fallback,
            },
        };
        info!(
            path = %path.display(),
            queries = source.by_query.len(),
            fallback_hits = source.fallback.len(),
            "Loaded fixture records"
        );
        Ok(source)
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn query(&self, query: &str) -> Result<Vec<SearchHit>> {
        Ok(self
            .by_query
            .get(query)
            .unwrap_or(&self.fallback)
            .clone())
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Concatenates results from several sources. A failing member is logged and
/// contributes nothing.
pub struct CompositeSource {
    sources: Vec<Box<dyn RecordSource>>,
}

impl CompositeSource {
    pub fn new(sources: Vec<Box<dyn RecordSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl RecordSource for CompositeSource {
    async fn query(&self, query: &str) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();
        for source in &self.sources {
            match source.query(query).await {
                Ok(mut found) => hits.append(&mut found),
                Err(e) => warn!(query, source = source.name(), error = %e, "Record source failed"),
            }
        }
        Ok(hits)
    }

    fn name(&self) -> &str {
        "composite"
    }
}
