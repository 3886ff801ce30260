use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use portfolio_common::{host_of, is_absolute_url, CandidateRecord, DiscoveryStrategy, FileConfig, SearchHit};
use tracing::{debug, info, warn};

use crate::dedup::dedupe;
use crate::search::RecordSource;

const AGENCY_QUERY_LIMIT: usize = 3;
const BRAND_NAME_LIMIT: usize = 3;
const PUBLICATION_NAME_LIMIT: usize = 2;
const DEEP_PUBLICATION_NAME_LIMIT: usize = 3;

const NAME_QUERY_SUFFIXES: &[&str] = &[
    "advertising campaign",
    "strategy",
    "portfolio",
    "credits",
    "creative strategist",
];

// --- Query planning ---

/// One family of search queries derived from the configuration.
pub trait QueryStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn queries(&self, config: &FileConfig) -> Vec<String>;
}

pub struct NameQueries;

impl QueryStep for NameQueries {
    fn name(&self) -> &'static str {
        "names"
    }

    fn queries(&self, config: &FileConfig) -> Vec<String> {
        let mut queries = Vec::new();
        for name in &config.target.names {
            for suffix in NAME_QUERY_SUFFIXES {
                queries.push(format!("\"{name}\" {suffix}"));
            }
            for agency in config.associations.agencies.iter().take(AGENCY_QUERY_LIMIT) {
                queries.push(format!("\"{name}\" {agency}"));
            }
        }
        queries
    }
}

pub struct BrandQueries;

impl QueryStep for BrandQueries {
    fn name(&self) -> &'static str {
        "brands"
    }

    fn queries(&self, config: &FileConfig) -> Vec<String> {
        let names = config.target.names.iter().take(BRAND_NAME_LIMIT);
        names
            .flat_map(|name| {
                config
                    .associations
                    .brands
                    .iter()
                    .map(move |brand| format!("\"{name}\" {brand}"))
            })
            .collect()
    }
}

/// `site:` sweeps over the configured publications.
pub struct PublicationQueries {
    names_per_source: usize,
}

impl PublicationQueries {
    pub fn standard() -> Self {
        Self {
            names_per_source: PUBLICATION_NAME_LIMIT,
        }
    }

    pub fn deep() -> Self {
        Self {
            names_per_source: DEEP_PUBLICATION_NAME_LIMIT,
        }
    }
}

impl QueryStep for PublicationQueries {
    fn name(&self) -> &'static str {
        if self.names_per_source > PUBLICATION_NAME_LIMIT {
            "publications_deep"
        } else {
            "publications"
        }
    }

    fn queries(&self, config: &FileConfig) -> Vec<String> {
        let mut queries = Vec::new();
        for source in &config.discovery.search_sources {
            for name in config.target.names.iter().take(self.names_per_source) {
                queries.push(format!("site:{source} \"{name}\""));
            }
        }
        queries
    }
}

pub struct ProfileQueries;

impl QueryStep for ProfileQueries {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn queries(&self, config: &FileConfig) -> Vec<String> {
        let Some(profile_url) = config.target.profile_url.as_deref() else {
            return Vec::new();
        };
        let Some(host) = host_of(profile_url) else {
            return Vec::new();
        };

        let mut queries = vec![format!(
            "site:{host} \"{}\"",
            config.target.canonical_name()
        )];
        let trimmed = profile_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let without_scheme = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
        let handle = without_scheme
            .split_once('/')
            .and_then(|(_, path)| path.rsplit('/').next())
            .unwrap_or_default();
        if !handle.is_empty() {
            queries.push(format!("site:{host}/in/{handle}"));
        }
        queries
    }
}

pub struct WritingQueries;

impl QueryStep for WritingQueries {
    fn name(&self) -> &'static str {
        "writing"
    }

    fn queries(&self, config: &FileConfig) -> Vec<String> {
        config.discovery.writing_queries.clone()
    }
}

pub fn steps_for(strategy: DiscoveryStrategy) -> Vec<Box<dyn QueryStep>> {
    let mut steps: Vec<Box<dyn QueryStep>> = vec![
        Box::new(NameQueries),
        Box::new(BrandQueries),
        Box::new(PublicationQueries::standard()),
        Box::new(ProfileQueries),
        Box::new(WritingQueries),
    ];
    if strategy == DiscoveryStrategy::Enhanced {
        steps.push(Box::new(PublicationQueries::deep()));
    }
    steps
}

/// Run every step in order, keeping the first occurrence of each query.
pub fn plan_queries(steps: &[Box<dyn QueryStep>], config: &FileConfig) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut planned = Vec::new();
    for step in steps {
        let queries = step.queries(config);
        debug!(step = step.name(), count = queries.len(), "Planned queries");
        for query in queries {
            if seen.insert(query.clone()) {
                planned.push(query);
            }
        }
    }
    planned
}

// --- Hit extraction ---

/// Lift raw hits into candidate records. Hits whose URL has no scheme or
/// host are dropped.
pub fn extract_records(hits: Vec<SearchHit>, query: &str, now: DateTime<Utc>) -> Vec<CandidateRecord> {
    hits.into_iter()
        .filter(|hit| {
            let keep = is_absolute_url(&hit.url);
            if !keep {
                debug!(url = hit.url.as_str(), query, "Dropping hit without absolute URL");
            }
            keep
        })
        .map(|hit| CandidateRecord::from_hit(hit, query, now))
        .collect()
}

// --- Discovery run ---

pub struct DiscoveryEngine<'a> {
    source: &'a dyn RecordSource,
    steps: Vec<Box<dyn QueryStep>>,
    query_delay: Duration,
}

impl<'a> DiscoveryEngine<'a> {
    pub fn new(source: &'a dyn RecordSource, steps: Vec<Box<dyn QueryStep>>, query_delay: Duration) -> Self {
        Self {
            source,
            steps,
            query_delay,
        }
    }

    pub fn from_config(source: &'a dyn RecordSource, config: &FileConfig) -> Self {
        Self::new(
            source,
            steps_for(config.discovery.strategy),
            Duration::from_millis(config.discovery.query_delay_ms),
        )
    }

    /// Execute every planned query and return the deduplicated candidates.
    /// Source failures are logged and skipped.
    pub async fn discover(&self, config: &FileConfig) -> Vec<CandidateRecord> {
        let queries = plan_queries(&self.steps, config);
        info!(
            queries = queries.len(),
            source = self.source.name(),
            "Starting discovery"
        );

        let mut records = Vec::new();
        for (idx, query) in queries.iter().enumerate() {
            if idx > 0 && !self.query_delay.is_zero() {
                tokio::time::sleep(self.query_delay).await;
            }
            match self.source.query(query).await {
                Ok(hits) => {
                    let found = extract_records(hits, query, Utc::now());
                    debug!(query = query.as_str(), found = found.len(), "Query complete");
                    records.extend(found);
                }
                Err(e) => warn!(query = query.as_str(), error = %e, "Search query failed"),
            }
        }

        let raw = records.len();
        let unique = dedupe(records);
        info!(raw, unique = unique.len(), "Discovery complete");
        unique
    }
}
