use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, SourcerError};

/// TOML-backed scanner configuration. A missing or malformed document is a
/// hard error; only individual tuning knobs carry defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target: TargetConfig,
    #[serde(default)]
    pub associations: AssociationsConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Name variants, canonical first.
    pub names: Vec<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub portfolio_domains: Vec<String>,
}

impl TargetConfig {
    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationsConfig {
    #[serde(default)]
    pub agencies: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStrategy {
    #[default]
    Standard,
    /// Standard queries plus deeper publication sweeps, followed by
    /// portfolio update suggestions.
    Enhanced,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub search_sources: Vec<String>,
    #[serde(default)]
    pub writing_queries: Vec<String>,
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
    #[serde(default)]
    pub strategy: DiscoveryStrategy,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_sources: Vec::new(),
            writing_queries: Vec::new(),
            query_delay_ms: default_query_delay_ms(),
            strategy: DiscoveryStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    #[serde(default = "default_portfolio_file")]
    pub file: PathBuf,
    /// Project names already featured; used for update suggestions.
    #[serde(default)]
    pub known_projects: Vec<String>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            file: default_portfolio_file(),
            known_projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_query_delay_ms() -> u64 {
    1000
}

fn default_threshold() -> u32 {
    3
}

fn default_portfolio_file() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("portfolio_updates")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; portfolio-scout/0.1)".to_string()
}

/// Load, validate and path-resolve a TOML config file. Relative portfolio and
/// output paths are resolved against the directory holding the config.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SourcerError::io(path, e))?;
    let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let config = parse_config(&content, base_dir)?;
    info!(
        path = %path.display(),
        names = config.target.names.len(),
        agencies = config.associations.agencies.len(),
        brands = config.associations.brands.len(),
        threshold = config.verification.threshold,
        "Config loaded"
    );
    Ok(config)
}

/// Parse and validate config text. `base_dir`, when given, anchors relative paths.
pub fn parse_config(content: &str, base_dir: Option<&Path>) -> Result<FileConfig> {
    let mut config: FileConfig =
        toml::from_str(content).map_err(|e| SourcerError::Config(e.to_string()))?;
    config.validate()?;

    if let Some(base) = base_dir {
        config.portfolio.file = resolve(base, &config.portfolio.file);
        config.report.output_dir = resolve(base, &config.report.output_dir);
    }

    Ok(config)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl FileConfig {
    fn validate(&mut self) -> Result<()> {
        self.target.names.retain(|n| !n.trim().is_empty());
        if self.target.names.is_empty() {
            return Err(SourcerError::Config(
                "target.names must list at least one name variant".into(),
            ));
        }
        if self.verification.threshold == 0 {
            return Err(SourcerError::Config(
                "verification.threshold must be at least 1".into(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(SourcerError::Config("http.timeout_secs must be at least 1".into()));
        }
        if let Some(profile) = &self.target.profile_url {
            if !crate::urls::is_absolute_url(profile) {
                return Err(SourcerError::Config(format!(
                    "target.profile_url is not an absolute URL: {profile}"
                )));
            }
        }
        Ok(())
    }
}
