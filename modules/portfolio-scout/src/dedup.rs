use std::collections::HashSet;

use portfolio_common::{max_similarity, normalize_url, CandidateRecord};
use tracing::{debug, warn};

/// Titles more similar than this to an already accepted title are dropped.
pub const NEAR_DUPLICATE_THRESHOLD: f64 = 0.8;

/// Collapse duplicate discoveries. The first record wins; later ones are
/// dropped when their normalized URL was already seen or their title is a
/// near-duplicate of an accepted title. Records with neither title nor URL
/// are malformed and skipped.
pub fn dedupe(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: Vec<String> = Vec::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let title = record.title.trim().to_lowercase();
        let url = normalize_url(record.url.trim());

        if title.is_empty() && url.is_empty() {
            warn!(source_query = record.source_query.as_str(), "Skipping record with no title or URL");
            continue;
        }

        if !url.is_empty() && seen_urls.contains(&url) {
            debug!(url = url.as_str(), "Duplicate URL");
            continue;
        }

        if !title.is_empty() {
            let similarity = max_similarity(&title, seen_titles.iter().map(String::as_str));
            if similarity > NEAR_DUPLICATE_THRESHOLD {
                debug!(title = record.title.as_str(), similarity, "Near-duplicate title");
                continue;
            }
        }

        if !url.is_empty() {
            seen_urls.insert(url);
        }
        if !title.is_empty() {
            seen_titles.push(title);
        }
        unique.push(record);
    }

    unique
}
