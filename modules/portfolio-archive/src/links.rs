use std::sync::LazyLock;

use portfolio_common::{is_external, LinkKind, LinkRecord};
use scraper::{ElementRef, Html, Selector};

const CONTEXT_MAX_CHARS: usize = 100;
const ELEMENT_MAX_CHARS: usize = 200;

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("valid selector"));
static FRAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe[src]").expect("valid selector"));

/// Every anchor href, image src and iframe src in the markup, in that order.
/// No filtering; callers decide which targets to check.
pub fn extract_links(html: &str) -> Vec<LinkRecord> {
    let doc = Html::parse_document(html);
    let mut links = Vec::new();

    for el in doc.select(&ANCHOR_SEL) {
        if let Some(href) = el.value().attr("href") {
            links.push(LinkRecord {
                url: href.trim().to_string(),
                kind: LinkKind::Link,
                context: truncate_chars(&inner_text(el), CONTEXT_MAX_CHARS),
                element: truncate_chars(&el.html(), ELEMENT_MAX_CHARS),
            });
        }
    }

    for el in doc.select(&IMAGE_SEL) {
        if let Some(src) = el.value().attr("src") {
            links.push(LinkRecord {
                url: src.trim().to_string(),
                kind: LinkKind::Image,
                context: el.value().attr("alt").unwrap_or_default().to_string(),
                element: truncate_chars(&el.html(), ELEMENT_MAX_CHARS),
            });
        }
    }

    for el in doc.select(&FRAME_SEL) {
        if let Some(src) = el.value().attr("src") {
            links.push(LinkRecord {
                url: src.trim().to_string(),
                kind: LinkKind::Video,
                context: "iframe".to_string(),
                element: truncate_chars(&el.html(), ELEMENT_MAX_CHARS),
            });
        }
    }

    links
}

/// Links, images and frames whose target is on another host.
pub fn external_links(html: &str) -> Vec<LinkRecord> {
    extract_links(html)
        .into_iter()
        .filter(|l| is_external(&l.url))
        .collect()
}

fn inner_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <a href="#work">Work</a>
          <a href="https://adweek.com/story"> Adweek   <span>story</span></a>
          <a href="mailto:jane@example.com">Email</a>
          <img src="https://cdn.example.com/hero.jpg" alt="Hero shot">
          <img src="images/local.png">
          <iframe src="https://www.youtube.com/embed/abc123"></iframe>
          <iframe src="/embeds/local.html"></iframe>
        </body></html>"##;

    #[test]
    fn extracts_all_elements_in_kind_order() {
        let links = extract_links(PAGE);
        let kinds: Vec<LinkKind> = links.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LinkKind::Link,
                LinkKind::Link,
                LinkKind::Link,
                LinkKind::Image,
                LinkKind::Image,
                LinkKind::Video,
                LinkKind::Video,
            ]
        );
    }

    #[test]
    fn context_carries_anchor_text_and_alt() {
        let links = extract_links(PAGE);
        assert_eq!(links[1].context, "Adweek story");
        assert_eq!(links[3].context, "Hero shot");
        assert_eq!(links[4].context, "");
        assert_eq!(links[5].context, "iframe");
        assert!(links[1].element.starts_with("<a href=\"https://adweek.com/story\""));
    }

    #[test]
    fn external_filter_drops_local_targets() {
        let urls: Vec<String> = external_links(PAGE).into_iter().map(|l| l.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://adweek.com/story",
                "https://cdn.example.com/hero.jpg",
                "https://www.youtube.com/embed/abc123",
            ]
        );
    }

    #[test]
    fn element_markup_is_truncated() {
        let long_text = "x".repeat(500);
        let html = format!(r#"<a href="https://a.com">{long_text}</a>"#);
        let links = extract_links(&html);
        assert_eq!(links[0].element.chars().count(), ELEMENT_MAX_CHARS);
        assert_eq!(links[0].context.chars().count(), CONTEXT_MAX_CHARS);
    }
}
