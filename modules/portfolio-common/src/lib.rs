pub mod config;
pub mod error;
pub mod similarity;
pub mod types;
pub mod urls;

pub use config::{load_config, parse_config, DiscoveryStrategy, FileConfig};
pub use error::{Result, SourcerError};
pub use similarity::{jaccard, max_similarity};
pub use types::*;
pub use urls::{host_of, host_matches, is_absolute_url, is_external, normalize_url};
