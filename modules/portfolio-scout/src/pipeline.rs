use anyhow::Result;
use portfolio_archive::{LinkProbe, PageFetcher};
use portfolio_common::{DiscoveryStrategy, FileConfig};
use tracing::{error, info};

use crate::discovery::DiscoveryEngine;
use crate::health::HealthChecker;
use crate::portfolio::parse_portfolio;
use crate::report::{assemble, update_suggestions, Report};
use crate::search::RecordSource;
use crate::verification::{verified_only, AttributionVerifier};

/// Collaborators a scan talks to. Production wires HTTP implementations;
/// tests wire mocks.
pub struct ScanDeps<'a> {
    pub source: &'a dyn RecordSource,
    pub fetcher: &'a dyn PageFetcher,
    pub probe: &'a dyn LinkProbe,
}

pub struct Scanner<'a> {
    config: &'a FileConfig,
    deps: ScanDeps<'a>,
    verifier: AttributionVerifier,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a FileConfig, deps: ScanDeps<'a>) -> Result<Self> {
        Ok(Self {
            config,
            verifier: AttributionVerifier::new(config)?,
            deps,
        })
    }

    /// Discover, verify, health-check and assemble. Network failures only
    /// lower scores or mark links broken; the run always yields a report.
    pub async fn run_full_scan(&self) -> Report {
        info!(
            target_name = self.config.target.canonical_name(),
            strategy = ?self.config.discovery.strategy,
            "Starting full scan"
        );

        let discovered = DiscoveryEngine::from_config(self.deps.source, self.config)
            .discover(self.config)
            .await;
        let attributed = self.verifier.verify_all(discovered, self.deps.fetcher).await;
        let verified = verified_only(attributed);
        info!(verified = verified.len(), threshold = self.verifier.threshold(), "Verification complete");

        let markup = self.portfolio_markup();
        let health = HealthChecker::new(self.deps.probe).check_all(&markup).await;
        let snapshot = parse_portfolio(&markup);
        let new_projects = snapshot.new_candidates(&verified);

        let report = assemble(verified, health, Some(snapshot.structure), Some(new_projects));
        if self.config.discovery.strategy == DiscoveryStrategy::Enhanced {
            let suggestions = update_suggestions(&report.new_projects, &self.config.portfolio.known_projects);
            info!(suggestions = suggestions.len(), "Generated update suggestions");
            return report.with_suggestions(suggestions);
        }
        report
    }

    /// Health check of the portfolio alone.
    pub async fn check_links_only(&self) -> Report {
        info!(file = %self.config.portfolio.file.display(), "Checking portfolio links");
        let markup = self.portfolio_markup();
        let health = HealthChecker::new(self.deps.probe).check_all(&markup).await;
        assemble(Vec::new(), health, None, None)
    }

    /// An unreadable portfolio file is logged and treated as empty.
    fn portfolio_markup(&self) -> String {
        let path = &self.config.portfolio.file;
        match std::fs::read_to_string(path) {
            Ok(markup) => markup,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read portfolio file");
                String::new()
            }
        }
    }
}
