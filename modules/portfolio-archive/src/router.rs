// Video platform detection and URL-shape matching. No HTTP.

use std::sync::LazyLock;

use portfolio_common::VideoPlatform;
use regex::Regex;

/// Embed, short-link and watch-query shapes, each capturing the video id.
static YOUTUBE_SHAPES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i:youtube\.com/embed/)([A-Za-z0-9_-]+)").expect("valid regex"),
        Regex::new(r"(?i:youtu\.be/)([A-Za-z0-9_-]+)").expect("valid regex"),
        Regex::new(r"(?i:youtube\.com/watch\?v=)([A-Za-z0-9_-]+)").expect("valid regex"),
    ]
});

/// Numeric-id page and player shapes.
static VIMEO_SHAPES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)vimeo\.com/\d+").expect("valid regex"),
        Regex::new(r"(?i)player\.vimeo\.com/video/\d+").expect("valid regex"),
    ]
});

/// Which video host serves this URL, judged by host substring.
pub fn detect_platform(url: &str) -> VideoPlatform {
    let lower = url.to_lowercase();
    if lower.contains("youtube.com") || lower.contains("youtu.be") {
        VideoPlatform::Youtube
    } else if lower.contains("vimeo.com") {
        VideoPlatform::Vimeo
    } else {
        VideoPlatform::Unknown
    }
}

/// Video id from any recognized YouTube shape.
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_SHAPES
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

/// True when the URL matches a recognized Vimeo shape.
pub fn is_vimeo_shape(url: &str) -> bool {
    VIMEO_SHAPES.iter().any(|re| re.is_match(url))
}

/// Public existence-check endpoint for a YouTube video.
pub fn youtube_oembed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v={video_id}&format=json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_platforms() {
        assert_eq!(detect_platform("https://www.YouTube.com/embed/x"), VideoPlatform::Youtube);
        assert_eq!(detect_platform("https://youtu.be/x"), VideoPlatform::Youtube);
        assert_eq!(detect_platform("https://player.vimeo.com/video/1"), VideoPlatform::Vimeo);
        assert_eq!(detect_platform("https://example.com/video.mp4"), VideoPlatform::Unknown);
    }

    #[test]
    fn extracts_youtube_ids_from_each_shape() {
        assert_eq!(youtube_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(youtube_video_id("https://youtu.be/Ab_C-12").as_deref(), Some("Ab_C-12"));
        assert_eq!(youtube_video_id("https://youtube.com/watch?v=XyZ&t=30").as_deref(), Some("XyZ"));
    }

    #[test]
    fn unrecognized_youtube_shapes_have_no_id() {
        assert_eq!(youtube_video_id("https://www.youtube.com/channel/UC123"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/watch?feature=share"), None);
    }

    #[test]
    fn vimeo_shapes_require_numeric_ids() {
        assert!(is_vimeo_shape("https://vimeo.com/123456"));
        assert!(is_vimeo_shape("https://player.vimeo.com/video/987?h=abc"));
        assert!(!is_vimeo_shape("https://vimeo.com/channels/staffpicks"));
    }

    #[test]
    fn oembed_url_targets_watch_page() {
        assert_eq!(
            youtube_oembed_url("abc"),
            "https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v=abc&format=json"
        );
    }
}
