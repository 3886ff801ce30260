// Structure of the existing portfolio page: case studies, brands, sections.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use portfolio_archive::external_links;
use portfolio_common::{jaccard, AttributedRecord, ExistingProject, PortfolioStructure, SectionInfo};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Discovered titles at least this similar to an existing title are already
/// in the portfolio.
pub const EXISTING_TITLE_THRESHOLD: f64 = 0.7;

static SECTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section").expect("valid selector"));
static SECTION_ID_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section[id]").expect("valid selector"));
static SUBHEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3").expect("valid selector"));
static HEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3").expect("valid selector"));
static CLASSED_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class]").expect("valid selector"));
static BUTTON_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button[class]").expect("valid selector"));
static FRAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe[src]").expect("valid selector"));

/// Parsed view of the portfolio markup.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSnapshot {
    pub projects: Vec<ExistingProject>,
    pub structure: PortfolioStructure,
}

pub fn parse_portfolio(markup: &str) -> PortfolioSnapshot {
    let doc = Html::parse_document(markup);
    let projects = extract_projects(&doc);

    let structure = PortfolioStructure {
        sections: extract_sections(&doc),
        total_links: external_links(markup).len(),
        total_projects: projects.len(),
        brands: extract_brands(&doc),
    };
    debug!(
        projects = structure.total_projects,
        sections = structure.sections.len(),
        brands = structure.brands.len(),
        "Parsed portfolio"
    );

    PortfolioSnapshot { projects, structure }
}

impl PortfolioSnapshot {
    /// Verified records that don't match an existing project, either by a
    /// similar title or by the project id appearing in the record's URL.
    pub fn new_candidates(&self, verified: &[AttributedRecord]) -> Vec<AttributedRecord> {
        let titles: Vec<String> = self
            .projects
            .iter()
            .filter_map(|p| p.title.as_deref())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let ids: Vec<String> = self
            .projects
            .iter()
            .filter_map(|p| p.id.as_deref())
            .map(str::to_lowercase)
            .filter(|id| !id.is_empty())
            .collect();

        verified
            .iter()
            .filter(|candidate| {
                let title = candidate.record.title.trim().to_lowercase();
                let similar = !title.is_empty()
                    && titles.iter().any(|t| jaccard(&title, t) >= EXISTING_TITLE_THRESHOLD);
                let url = candidate.record.url.to_lowercase();
                let linked = !url.is_empty() && ids.iter().any(|id| url.contains(id.as_str()));
                !similar && !linked
            })
            .cloned()
            .collect()
    }
}

// --- Extraction ---

fn extract_projects(doc: &Html) -> Vec<ExistingProject> {
    doc.select(&SECTION_SEL)
        .filter(|s| class_contains(*s, "case-study"))
        .map(project_from_section)
        .filter(|p| *p != ExistingProject::default())
        .collect()
}

fn project_from_section(section: ElementRef<'_>) -> ExistingProject {
    let title = section
        .select(&SUBHEADING_SEL)
        .find(|h| class_contains(*h, "title"))
        .map(text_of)
        .filter(|t| !t.is_empty());

    let id = section
        .value()
        .attr("id")
        .map(str::to_string)
        .filter(|id| !id.is_empty());

    let mut breadcrumb = None;
    let mut meta = BTreeMap::new();
    let mut label: Option<String> = None;
    for el in section.select(&CLASSED_SEL) {
        if breadcrumb.is_none() && class_contains(el, "breadcrumb") {
            breadcrumb = Some(text_of(el)).filter(|t| !t.is_empty());
        }
        if class_contains(el, "meta-label") {
            label = Some(text_of(el).to_lowercase()).filter(|l| !l.is_empty());
            continue;
        }
        let is_value = class_contains(el, "meta-value")
            || (class_contains(el, "meta-item") && !has_class_descendant(el, "meta-label"));
        if is_value {
            if let Some(key) = &label {
                meta.insert(key.clone(), text_of(el));
            }
        }
    }

    let videos = section
        .select(&FRAME_SEL)
        .filter_map(|f| f.value().attr("src"))
        .filter(|src| {
            let lower = src.to_lowercase();
            lower.contains("youtube") || lower.contains("vimeo")
        })
        .map(str::to_string)
        .collect();

    ExistingProject {
        title,
        id,
        breadcrumb,
        meta,
        videos,
    }
}

fn extract_brands(doc: &Html) -> Vec<String> {
    let mut brands = BTreeSet::new();
    for button in doc.select(&BUTTON_SEL) {
        if class_contains(button, "filter-btn") {
            let text = text_of(button);
            if !text.is_empty() && !text.eq_ignore_ascii_case("all") {
                brands.insert(text);
            }
        }
    }
    for el in doc.select(&CLASSED_SEL) {
        if class_contains(el, "brand-card") || class_contains(el, "brand-title") {
            let text = text_of(el);
            if !text.is_empty() {
                brands.insert(text);
            }
        }
    }
    brands.into_iter().collect()
}

fn extract_sections(doc: &Html) -> Vec<SectionInfo> {
    doc.select(&SECTION_ID_SEL)
        .filter_map(|section| {
            let id = section.value().attr("id")?.to_string();
            let title = section.select(&HEADING_SEL).next().map(text_of).unwrap_or_default();
            Some(SectionInfo { id, title })
        })
        .collect()
}

// --- Helpers ---

fn class_contains(el: ElementRef<'_>, needle: &str) -> bool {
    el.value().classes().any(|c| c.contains(needle))
}

fn has_class_descendant(el: ElementRef<'_>, needle: &str) -> bool {
    el.select(&CLASSED_SEL)
        .any(|child| child.id() != el.id() && class_contains(child, needle))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portfolio_common::CandidateRecord;

    const PORTFOLIO: &str = r#"
        <html><body>
          <section id="campaigns"><h2>Campaigns</h2>
            <button class="filter-btn active">All</button>
            <button class="filter-btn">Nike</button>
            <button class="filter-btn">Levi's</button>
          </section>
          <section id="levis-spring" class="case-study">
            <div class="breadcrumb">Campaigns / Levi's</div>
            <h2 class="case-title">Levi's Spring Denim Launch</h2>
            <div class="meta-item"><span class="meta-label">Client</span><span class="meta-value">Levi's</span></div>
            <div class="meta-item"><span class="meta-label">Role</span><span class="meta-value">Strategist</span></div>
            <iframe src="https://www.youtube.com/embed/abc"></iframe>
            <iframe src="https://maps.example.com/embed"></iframe>
          </section>
          <section class="case-study"><p>No details</p></section>
          <section id="brands"><h3>Brands</h3><div class="brand-card">Droga5</div></section>
          <a href="https://adweek.com/story">Press</a>
          <a href="/about">About</a>
        </body></html>"#;

    fn attributed(title: &str, url: &str) -> AttributedRecord {
        AttributedRecord {
            record: CandidateRecord {
                title: title.into(),
                url: url.into(),
                snippet: String::new(),
                source_query: "q".into(),
                source_engine: "fixture".into(),
                discovered_at: Utc::now(),
            },
            verification_score: 3,
            verification_evidence: Vec::new(),
            verified: true,
        }
    }

    #[test]
    fn parses_case_studies() {
        let snapshot = parse_portfolio(PORTFOLIO);
        assert_eq!(snapshot.projects.len(), 1);

        let project = &snapshot.projects[0];
        assert_eq!(project.title.as_deref(), Some("Levi's Spring Denim Launch"));
        assert_eq!(project.id.as_deref(), Some("levis-spring"));
        assert_eq!(project.breadcrumb.as_deref(), Some("Campaigns / Levi's"));
        assert_eq!(project.meta.get("client").map(String::as_str), Some("Levi's"));
        assert_eq!(project.meta.get("role").map(String::as_str), Some("Strategist"));
        assert_eq!(project.videos, vec!["https://www.youtube.com/embed/abc".to_string()]);
    }

    #[test]
    fn summarizes_structure() {
        let structure = parse_portfolio(PORTFOLIO).structure;
        assert_eq!(structure.brands, vec!["Droga5", "Levi's", "Nike"]);
        let ids: Vec<&str> = structure.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["campaigns", "levis-spring", "brands"]);
        assert_eq!(structure.sections[0].title, "Campaigns");
        assert_eq!(structure.total_projects, 1);
        // Adweek anchor and the two external frames.
        assert_eq!(structure.total_links, 3);
    }

    #[test]
    fn new_candidates_exclude_existing_projects() {
        let snapshot = parse_portfolio(PORTFOLIO);
        let new = snapshot.new_candidates(&[
            attributed("Levi's Spring Denim Launch Video", "https://adweek.com/a"),
            attributed("Coverage", "https://press.com/levis-spring-recap"),
            attributed("Nike Run Club Podcast", "https://podcasts.com/nike"),
        ]);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].record.title, "Nike Run Club Podcast");
    }

    #[test]
    fn empty_markup_has_empty_structure() {
        let snapshot = parse_portfolio("");
        assert!(snapshot.projects.is_empty());
        assert_eq!(snapshot.structure, PortfolioStructure::default());
    }
}
