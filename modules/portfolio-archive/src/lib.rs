pub mod error;
pub mod fetcher;
pub mod links;
pub mod probe;
pub mod router;
pub mod text_extract;

pub use error::{ArchiveError, Result};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use links::{external_links, extract_links};
pub use probe::{HttpProbe, LinkProbe};
pub use router::{detect_platform, is_vimeo_shape, youtube_oembed_url, youtube_video_id};
pub use text_extract::visible_text;
