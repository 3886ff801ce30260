use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use portfolio_common::{
    AttributedRecord, CandidateRecord, HealthResults, PortfolioSection, PortfolioStructure, Result,
    SourcerError, UpdateSuggestion,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Named call-outs listed under the new-projects recommendation.
const NEW_PROJECT_CALLOUTS: usize = 5;

const HEALTHY: &str = "All links, images, and videos are valid. Portfolio is healthy!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_verified_projects: usize,
    pub new_projects_found: usize,
    pub broken_links_count: usize,
    pub broken_images_count: usize,
    pub broken_videos_count: usize,
    pub total_issues: usize,
}

/// One scan run's results. Built once by [`assemble`] and written as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub summary: ReportSummary,
    pub verified_projects: Vec<AttributedRecord>,
    pub validation_results: HealthResults,
    pub new_projects: Vec<AttributedRecord>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_structure: Option<PortfolioStructure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_suggestions: Vec<UpdateSuggestion>,
}

pub fn assemble(
    verified: Vec<AttributedRecord>,
    health: HealthResults,
    structure: Option<PortfolioStructure>,
    new_candidates: Option<Vec<AttributedRecord>>,
) -> Report {
    let new_projects = new_candidates.unwrap_or_default();
    let summary = ReportSummary {
        total_verified_projects: verified.len(),
        new_projects_found: new_projects.len(),
        broken_links_count: health.broken_links.len(),
        broken_images_count: health.broken_images.len(),
        broken_videos_count: health.broken_videos.len(),
        total_issues: health.total_issues(),
    };
    let recommendations = recommendations(&health, &new_projects);

    Report {
        timestamp: Utc::now(),
        summary,
        verified_projects: verified,
        validation_results: health,
        new_projects,
        recommendations,
        portfolio_structure: structure,
        update_suggestions: Vec::new(),
    }
}

pub fn recommendations(health: &HealthResults, new_projects: &[AttributedRecord]) -> Vec<String> {
    let mut recs = Vec::new();

    if !health.broken_links.is_empty() {
        recs.push(format!(
            "Fix {} broken link(s). Check URLs for updates or replacements.",
            health.broken_links.len()
        ));
    }
    if !health.broken_images.is_empty() {
        recs.push(format!(
            "Replace {} broken image(s). Verify image URLs or upload new images.",
            health.broken_images.len()
        ));
    }
    if !health.broken_videos.is_empty() {
        recs.push(format!(
            "Fix {} broken video embed(s). Verify YouTube/Vimeo URLs.",
            health.broken_videos.len()
        ));
    }

    if !new_projects.is_empty() {
        recs.push(format!(
            "Consider adding {} newly discovered verified project(s) to portfolio.",
            new_projects.len()
        ));
        for project in new_projects.iter().take(NEW_PROJECT_CALLOUTS) {
            recs.push(format!(
                "  - '{}' (verification score: {})",
                project.record.title, project.verification_score
            ));
        }
    }

    if health.is_healthy() {
        recs.push(HEALTHY.to_string());
    }
    recs
}

impl Report {
    pub fn with_suggestions(mut self, suggestions: Vec<UpdateSuggestion>) -> Self {
        self.update_suggestions = suggestions;
        self
    }

    pub fn total_issues(&self) -> usize {
        self.summary.total_issues
    }

    /// Human-readable block printed after a run.
    pub fn summary_text(&self, saved_to: &Path) -> String {
        let rule = "=".repeat(60);
        format!("{self}\n{rule}\nFull report saved to: {}\n{rule}\n", saved_to.display())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let s = &self.summary;
        writeln!(f, "{rule}")?;
        writeln!(f, "PORTFOLIO SCOUT REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "Verified Projects Found: {}", s.total_verified_projects)?;
        writeln!(f, "New Projects Discovered: {}", s.new_projects_found)?;
        writeln!(f, "Broken Links:            {}", s.broken_links_count)?;
        writeln!(f, "Broken Images:           {}", s.broken_images_count)?;
        writeln!(f, "Broken Videos:           {}", s.broken_videos_count)?;
        writeln!(f, "Total Issues:            {}", s.total_issues)?;
        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for rec in &self.recommendations {
                writeln!(f, "  - {rec}")?;
            }
        }
        Ok(())
    }
}

// --- Writer ---

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Creates the output directory if it doesn't exist yet.
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).map_err(|e| SourcerError::io(output_dir, e))?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write `update_report_{YYYYmmdd_HHMMSS}.json`. A second report in the
    /// same second gets a numeric suffix instead of overwriting the first.
    pub fn save(&self, report: &Report) -> Result<PathBuf> {
        let stamp = report.timestamp.format("%Y%m%d_%H%M%S").to_string();
        let mut path = self.output_dir.join(format!("update_report_{stamp}.json"));
        let mut n = 1;
        while path.exists() {
            path = self.output_dir.join(format!("update_report_{stamp}_{n}.json"));
            n += 1;
        }

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json).map_err(|e| SourcerError::io(&path, e))?;
        info!(path = %path.display(), issues = report.total_issues(), "Report saved");
        Ok(path)
    }
}

// --- Update suggestions ---

const CAMPAIGN_WORDS: &[&str] = &[
    "campaign",
    "campaigns",
    "advertising",
    "brand",
    "brands",
    "commercial",
    "commercials",
    "spot",
    "spots",
    "ad",
    "ads",
];
const WRITING_WORDS: &[&str] = &["article", "articles", "writing", "essay", "essays", "blog"];
const AI_WORDS: &[&str] = &["ai", "tool", "tools", "github", "prototype"];

/// Portfolio area a discovered project fits, by keywords in its title,
/// snippet and URL. Campaign work wins ties.
pub fn suggest_section(record: &CandidateRecord) -> PortfolioSection {
    let combined = format!("{} {} {}", record.title, record.snippet, record.url).to_lowercase();
    let words: HashSet<&str> = combined
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let any = |list: &[&str]| list.iter().any(|w| words.contains(w));

    if any(CAMPAIGN_WORDS) {
        PortfolioSection::Campaigns
    } else if combined.contains("podcast") {
        PortfolioSection::Podcast
    } else if any(WRITING_WORDS) {
        PortfolioSection::Writing
    } else if any(AI_WORDS) {
        PortfolioSection::AiProjects
    } else {
        PortfolioSection::Campaigns
    }
}

/// One "add" suggestion per new project that isn't already a known project.
pub fn update_suggestions(new_projects: &[AttributedRecord], known_projects: &[String]) -> Vec<UpdateSuggestion> {
    let known: Vec<String> = known_projects
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    new_projects
        .iter()
        .filter(|p| {
            let title = p.record.title.trim().to_lowercase();
            title.is_empty() || !known.iter().any(|k| title.contains(k.as_str()) || k.contains(title.as_str()))
        })
        .map(|p| UpdateSuggestion {
            project: p.clone(),
            action: "add".to_string(),
            reason: format!("New verified project with score {}", p.verification_score),
            suggested_section: suggest_section(&p.record),
        })
        .collect()
}
