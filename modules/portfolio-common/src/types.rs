use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Discovery ---

/// One raw result from a record source (search provider, fixture file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    /// Label of the engine that produced the hit.
    #[serde(default = "unknown_source")]
    pub source: String,
}

fn unknown_source() -> String {
    "unknown".to_string()
}

/// A web-discovered reference that may name the tracked individual.
/// Immutable once created; verification output travels alongside it in
/// [`AttributedRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source_query: String,
    pub source_engine: String,
    pub discovered_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn from_hit(hit: SearchHit, query: &str, discovered_at: DateTime<Utc>) -> Self {
        Self {
            title: hit.title,
            url: hit.url,
            snippet: hit.snippet,
            source_query: query.to_string(),
            source_engine: hit.source,
            discovered_at,
        }
    }
}

/// Outcome of attribution scoring for a single record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_verified: bool,
    pub score: u32,
    /// Human-readable signals that fired, in check order.
    pub evidence: Vec<String>,
}

/// A candidate with its verification annotations. Serializes flat, so the
/// report shows `verification_score`, `verification_evidence` and `verified`
/// next to the discovery fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedRecord {
    #[serde(flatten)]
    pub record: CandidateRecord,
    pub verification_score: u32,
    pub verification_evidence: Vec<String>,
    pub verified: bool,
}

impl AttributedRecord {
    pub fn new(record: CandidateRecord, result: VerificationResult) -> Self {
        Self {
            record,
            verification_score: result.score,
            verification_evidence: result.evidence,
            verified: result.is_verified,
        }
    }
}

// --- Link health ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Link,
    Image,
    Video,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Link => write!(f, "link"),
            LinkKind::Image => write!(f, "image"),
            LinkKind::Video => write!(f, "video"),
        }
    }
}

/// Video hosts with dedicated validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoPlatform {
    Youtube,
    Vimeo,
    Unknown,
}

impl std::fmt::Display for VideoPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoPlatform::Youtube => write!(f, "youtube"),
            VideoPlatform::Vimeo => write!(f, "vimeo"),
            VideoPlatform::Unknown => write!(f, "unknown"),
        }
    }
}

/// A URL pulled out of portfolio markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub kind: LinkKind,
    /// Anchor text, image alt text, or the element tag for frames.
    pub context: String,
    /// Leading slice of the element's markup.
    pub element: String,
}

/// A link that failed its health check. Reachable links are never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub kind: LinkKind,
    pub context: String,
    pub element: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<VideoPlatform>,
}

impl BrokenLink {
    pub fn from_record(link: &LinkRecord, reason: impl Into<String>) -> Self {
        Self {
            url: link.url.clone(),
            kind: link.kind,
            context: link.context.clone(),
            element: link.element.clone(),
            reason: reason.into(),
            platform: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResults {
    pub broken_links: Vec<BrokenLink>,
    pub broken_images: Vec<BrokenLink>,
    pub broken_videos: Vec<BrokenLink>,
}

impl HealthResults {
    pub fn push(&mut self, broken: BrokenLink) {
        match broken.kind {
            LinkKind::Link => self.broken_links.push(broken),
            LinkKind::Image => self.broken_images.push(broken),
            LinkKind::Video => self.broken_videos.push(broken),
        }
    }

    pub fn total_issues(&self) -> usize {
        self.broken_links.len() + self.broken_images.len() + self.broken_videos.len()
    }

    pub fn is_healthy(&self) -> bool {
        self.total_issues() == 0
    }
}

// --- Portfolio structure ---

/// A case-study section already present in the portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<String>,
    /// Meta values keyed by their lower-cased label ("client", "role", ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStructure {
    pub sections: Vec<SectionInfo>,
    pub total_links: usize,
    pub total_projects: usize,
    pub brands: Vec<String>,
}

/// Portfolio area a newly discovered project best fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortfolioSection {
    Campaigns,
    Podcast,
    Writing,
    AiProjects,
}

impl std::fmt::Display for PortfolioSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioSection::Campaigns => write!(f, "campaigns"),
            PortfolioSection::Podcast => write!(f, "podcast"),
            PortfolioSection::Writing => write!(f, "writing"),
            PortfolioSection::AiProjects => write!(f, "ai-projects"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSuggestion {
    pub project: AttributedRecord,
    pub action: String,
    pub reason: String,
    pub suggested_section: PortfolioSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken(kind: LinkKind) -> BrokenLink {
        BrokenLink {
            url: "https://dead.example.com".into(),
            kind,
            context: String::new(),
            element: String::new(),
            reason: "status 404".into(),
            platform: None,
        }
    }

    #[test]
    fn health_results_route_by_kind() {
        let mut health = HealthResults::default();
        assert!(health.is_healthy());

        health.push(broken(LinkKind::Link));
        health.push(broken(LinkKind::Video));
        health.push(broken(LinkKind::Video));

        assert_eq!(health.broken_links.len(), 1);
        assert!(health.broken_images.is_empty());
        assert_eq!(health.broken_videos.len(), 2);
        assert_eq!(health.total_issues(), 3);
    }

    #[test]
    fn attributed_record_serializes_flat() {
        let record = CandidateRecord {
            title: "Spring Campaign".into(),
            url: "https://adweek.com/spring".into(),
            snippet: String::new(),
            source_query: "\"Jane Doe\" credits".into(),
            source_engine: "fixture".into(),
            discovered_at: Utc::now(),
        };
        let attributed = AttributedRecord::new(
            record,
            VerificationResult {
                is_verified: true,
                score: 4,
                evidence: vec!["Name mentioned 3 time(s) on page".into()],
            },
        );

        let json = serde_json::to_value(&attributed).unwrap();
        assert_eq!(json["title"], "Spring Campaign");
        assert_eq!(json["verification_score"], 4);
        assert_eq!(json["verified"], true);
        assert_eq!(json["verification_evidence"][0], "Name mentioned 3 time(s) on page");
    }

    #[test]
    fn search_hit_defaults_missing_fields() {
        let hit: SearchHit = serde_json::from_str(r#"{"url": "https://a.com"}"#).unwrap();
        assert_eq!(hit.title, "");
        assert_eq!(hit.source, "unknown");
    }

    #[test]
    fn section_names_are_kebab_case() {
        let json = serde_json::to_string(&PortfolioSection::AiProjects).unwrap();
        assert_eq!(json, "\"ai-projects\"");
        assert_eq!(PortfolioSection::AiProjects.to_string(), "ai-projects");
    }
}
