use std::collections::HashMap;

use portfolio_archive::{
    detect_platform, extract_links, is_vimeo_shape, youtube_oembed_url, youtube_video_id, LinkProbe,
};
use portfolio_common::{is_external, BrokenLink, HealthResults, LinkKind, LinkRecord, VideoPlatform};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Liveness {
    Reachable,
    Broken(String),
}

/// Checks every link, image and embedded frame in portfolio markup.
/// Reachable targets leave no trace; broken ones are reported with a reason.
pub struct HealthChecker<'a> {
    probe: &'a dyn LinkProbe,
}

impl<'a> HealthChecker<'a> {
    pub fn new(probe: &'a dyn LinkProbe) -> Self {
        Self { probe }
    }

    pub async fn check_all(&self, markup: &str) -> HealthResults {
        let candidates: Vec<LinkRecord> = extract_links(markup)
            .into_iter()
            .filter(should_check)
            .collect();
        self.check_links(&candidates).await
    }

    /// Probe each link once per kind and URL; repeats reuse the first verdict.
    pub async fn check_links(&self, links: &[LinkRecord]) -> HealthResults {
        let mut results = HealthResults::default();
        let mut verdicts: HashMap<(LinkKind, &str), Liveness> = HashMap::new();

        for link in links {
            let key = (link.kind, link.url.as_str());
            let verdict = match verdicts.get(&key) {
                Some(v) => v.clone(),
                None => {
                    let v = self.liveness(link).await;
                    verdicts.insert(key, v.clone());
                    v
                }
            };

            if let Liveness::Broken(reason) = verdict {
                debug!(url = link.url.as_str(), kind = %link.kind, reason = reason.as_str(), "Broken target");
                let mut broken = BrokenLink::from_record(link, reason);
                if link.kind == LinkKind::Video {
                    broken.platform = Some(detect_platform(&link.url));
                }
                results.push(broken);
            }
        }

        info!(
            checked = links.len(),
            broken_links = results.broken_links.len(),
            broken_images = results.broken_images.len(),
            broken_videos = results.broken_videos.len(),
            "Health check complete"
        );
        results
    }

    async fn liveness(&self, link: &LinkRecord) -> Liveness {
        let is_video = link.kind == LinkKind::Video;
        match detect_platform(&link.url) {
            VideoPlatform::Youtube => match youtube_video_id(&link.url) {
                Some(id) => self.youtube_exists(&id).await,
                None if is_video => Liveness::Broken("Unrecognized YouTube URL format".to_string()),
                None => self.http_probe(&link.url).await,
            },
            VideoPlatform::Vimeo => {
                if is_vimeo_shape(&link.url) {
                    Liveness::Reachable
                } else if is_video {
                    Liveness::Broken("Unrecognized Vimeo URL format".to_string())
                } else {
                    self.http_probe(&link.url).await
                }
            }
            VideoPlatform::Unknown => self.http_probe(&link.url).await,
        }
    }

    /// A well-formed YouTube URL stays accepted when the oEmbed endpoint
    /// itself can't be reached.
    async fn youtube_exists(&self, video_id: &str) -> Liveness {
        match self.probe.get(&youtube_oembed_url(video_id)).await {
            Ok(200) => Liveness::Reachable,
            Ok(status) => Liveness::Broken(format!("Video unavailable (oEmbed status {status})")),
            Err(e) => {
                debug!(video_id, error = %e, "oEmbed check failed, accepting well-formed URL");
                Liveness::Reachable
            }
        }
    }

    async fn http_probe(&self, url: &str) -> Liveness {
        match self.probe.head(url).await {
            Ok(status) if status < 400 => Liveness::Reachable,
            Ok(status) => Liveness::Broken(format!("HTTP {status}")),
            Err(e) => Liveness::Broken(e.to_string()),
        }
    }
}

/// Frames are always checked; links and images only when external.
fn should_check(link: &LinkRecord) -> bool {
    link.kind == LinkKind::Video || is_external(&link.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_archive::{ArchiveError, Result};

    /// 200 for everything except URLs containing "dead" (404) or "down"
    /// (connection error).
    struct StubProbe;

    #[async_trait]
    impl LinkProbe for StubProbe {
        async fn head(&self, url: &str) -> Result<u16> {
            if url.contains("down") {
                Err(ArchiveError::Network("connection refused".into()))
            } else if url.contains("dead") {
                Ok(404)
            } else {
                Ok(200)
            }
        }

        async fn get(&self, url: &str) -> Result<u16> {
            self.head(url).await
        }
    }

    #[test]
    fn frames_are_always_candidates() {
        let local_frame = LinkRecord {
            url: "/embed/local".into(),
            kind: LinkKind::Video,
            context: "iframe".into(),
            element: String::new(),
        };
        let local_link = LinkRecord {
            kind: LinkKind::Link,
            ..local_frame.clone()
        };
        assert!(should_check(&local_frame));
        assert!(!should_check(&local_link));
    }

    #[tokio::test]
    async fn reports_broken_targets_by_kind() {
        let markup = r##"
            <a href="#top">Top</a>
            <a href="https://example.com/page">Fine</a>
            <a href="https://example.com/dead">Gone</a>
            <img src="https://cdn.example.com/dead.jpg" alt="Hero">
            <img src="local.png">
            <iframe src="https://down.example.com/player"></iframe>
        "##;
        let probe = StubProbe;
        let results = HealthChecker::new(&probe).check_all(markup).await;

        assert_eq!(results.broken_links.len(), 1);
        assert_eq!(results.broken_links[0].reason, "HTTP 404");
        assert_eq!(results.broken_images.len(), 1);
        assert_eq!(results.broken_images[0].context, "Hero");
        assert_eq!(results.broken_videos.len(), 1);
        assert_eq!(results.broken_videos[0].platform, Some(VideoPlatform::Unknown));
    }

    #[tokio::test]
    async fn vimeo_shapes_pass_without_probing() {
        let markup = r#"<iframe src="https://player.vimeo.com/video/123"></iframe>
                        <iframe src="https://vimeo.com/channels/dead"></iframe>"#;
        let probe = StubProbe;
        let results = HealthChecker::new(&probe).check_all(markup).await;
        assert_eq!(results.broken_videos.len(), 1);
        assert_eq!(results.broken_videos[0].url, "https://vimeo.com/channels/dead");
        assert_eq!(results.broken_videos[0].platform, Some(VideoPlatform::Vimeo));
    }

    #[tokio::test]
    async fn check_is_repeatable() {
        let markup = r#"<a href="https://example.com/dead">Gone</a><a href="https://example.com/dead">Again</a>"#;
        let probe = StubProbe;
        let checker = HealthChecker::new(&probe);
        let first = checker.check_all(markup).await;
        let second = checker.check_all(markup).await;
        assert_eq!(first, second);
        assert_eq!(first.broken_links.len(), 2);
    }
}
