// Attribution scoring: does a discovered record refer to the tracked person?
//
// Every signal adds a non-negative amount. Content signals only fire when the
// page text could be fetched; URL signals always run.

use anyhow::Result;
use portfolio_archive::PageFetcher;
use portfolio_common::{
    host_matches, host_of, AttributedRecord, CandidateRecord, FileConfig, VerificationResult,
};
use regex::Regex;
use tracing::{debug, info};

/// Most points the name-mention signal can contribute.
const NAME_MENTION_CAP: usize = 3;
const PROFILE_POINTS: u32 = 2;

struct Agency {
    display: String,
    needle: String,
}

struct Brand {
    display: String,
    compact: String,
    lower: String,
}

pub struct AttributionVerifier {
    name_patterns: Vec<Regex>,
    agencies: Vec<Agency>,
    brands: Vec<Brand>,
    portfolio_domains: Vec<String>,
    profile_url: Option<String>,
    profile_host: Option<String>,
    threshold: u32,
}

impl AttributionVerifier {
    pub fn new(config: &FileConfig) -> Result<Self> {
        let name_patterns = config
            .target
            .names
            .iter()
            .map(|name| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name))))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut agencies: Vec<Agency> = Vec::new();
        for name in &config.associations.agencies {
            let needle = strip_separators(&name.to_lowercase());
            if needle.trim().is_empty() || agencies.iter().any(|a| a.needle == needle) {
                continue;
            }
            agencies.push(Agency {
                display: name.clone(),
                needle,
            });
        }

        let brands = config
            .associations
            .brands
            .iter()
            .filter(|b| !b.trim().is_empty())
            .map(|b| Brand {
                display: b.clone(),
                compact: compact_brand(b),
                lower: b.to_lowercase(),
            })
            .collect();

        let profile_url = config.target.profile_url.clone().filter(|u| !u.is_empty());
        let profile_host = profile_url.as_deref().and_then(host_of);

        Ok(Self {
            name_patterns,
            agencies,
            brands,
            portfolio_domains: config.target.portfolio_domains.clone(),
            profile_url,
            profile_host,
            threshold: config.verification.threshold,
        })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Score a record against optional page text. Pure; never fails.
    pub fn verify(&self, record: &CandidateRecord, content: Option<&str>) -> VerificationResult {
        let mut score = 0u32;
        let mut evidence = Vec::new();
        let host = host_of(&record.url);

        if let Some(text) = content {
            let lower = text.to_lowercase();

            // Name mentions, capped.
            let mentions: usize = self
                .name_patterns
                .iter()
                .map(|re| re.find_iter(text).count())
                .sum();
            if mentions > 0 {
                score += mentions.min(NAME_MENTION_CAP) as u32;
                evidence.push(format!("Name mentioned {mentions} time(s) on page"));
            }

            let stripped = strip_separators(&lower);
            let found: Vec<&str> = self
                .agencies
                .iter()
                .filter(|a| lower.contains(&a.needle) || stripped.contains(&a.needle))
                .map(|a| a.display.as_str())
                .collect();
            if !found.is_empty() {
                score += found.len() as u32;
                evidence.push(format!("Associated with agencies: {}", found.join(", ")));
            }

            if let Some(brand) = self
                .brands
                .iter()
                .find(|b| lower.contains(&b.compact) || lower.contains(&b.lower))
            {
                score += 1;
                evidence.push(format!("Associated with known brand: {}", brand.display));
            }
        }

        if let Some(host) = host.as_deref() {
            if let Some(domain) = self
                .portfolio_domains
                .iter()
                .find(|d| host_matches(host, d))
            {
                score += 1;
                evidence.push(format!("Mentioned on portfolio site: {domain}"));
            }
        }

        let on_network = match (&self.profile_host, host.as_deref()) {
            (Some(network), Some(host)) => host_matches(host, network),
            _ => false,
        };
        let profile_in_content = match (&self.profile_url, content) {
            (Some(profile), Some(text)) => text.contains(profile.as_str()),
            _ => false,
        };
        if on_network || profile_in_content {
            score += PROFILE_POINTS;
            evidence.push("Mentioned on professional profile".to_string());
        }

        VerificationResult {
            is_verified: score >= self.threshold,
            score,
            evidence,
        }
    }

    /// Fetch the record's page and score it. A failed fetch scores on URL
    /// signals alone.
    pub async fn verify_fetched(
        &self,
        record: &CandidateRecord,
        fetcher: &dyn PageFetcher,
    ) -> VerificationResult {
        let content = if record.url.trim().is_empty() {
            None
        } else {
            match fetcher.page_text(&record.url).await {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(url = record.url.as_str(), error = %e, "Page fetch failed, scoring without content");
                    None
                }
            }
        };
        self.verify(record, content.as_deref())
    }

    /// Annotate every record, in order. Unverified records are kept so the
    /// caller can decide what to drop.
    pub async fn verify_all(
        &self,
        records: Vec<CandidateRecord>,
        fetcher: &dyn PageFetcher,
    ) -> Vec<AttributedRecord> {
        let mut attributed = Vec::with_capacity(records.len());
        for record in records {
            let result = self.verify_fetched(&record, fetcher).await;
            if result.is_verified {
                info!(
                    title = record.title.as_str(),
                    url = record.url.as_str(),
                    score = result.score,
                    "Verified record"
                );
            } else {
                debug!(url = record.url.as_str(), score = result.score, "Record not verified");
            }
            attributed.push(AttributedRecord::new(record, result));
        }
        attributed
    }
}

/// Records that met the threshold.
pub fn verified_only(records: Vec<AttributedRecord>) -> Vec<AttributedRecord> {
    records.into_iter().filter(|r| r.verified).collect()
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '/' | '\\')).collect()
}

fn compact_brand(brand: &str) -> String {
    brand
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | ' '))
        .collect()
}
