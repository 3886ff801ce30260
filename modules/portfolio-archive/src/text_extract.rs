use scraper::{ElementRef, Html};

/// Elements whose text is page chrome rather than content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript", "template"];

/// Phrasing elements that flow inside a line of text.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "em", "i", "mark", "small", "span", "strong", "sub", "sup",
    "u",
];

/// Visible text of an HTML document with script, style and navigation chrome
/// removed. Whitespace runs collapse to a single space.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(doc.root_element(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        if let Some(child_el) = ElementRef::wrap(child) {
            if SKIPPED_TAGS.contains(&child_el.value().name()) {
                continue;
            }
            collect_text(child_el, out);
            // Block boundaries shouldn't glue words together.
            if !INLINE_TAGS.contains(&child_el.value().name()) {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_chrome() {
        let html = r#"
            <html><head><style>.x { color: red }</style><script>var name = "Jane Doe";</script></head>
            <body>
              <header>Site Header</header>
              <nav><a href="/">Home</a></nav>
              <main><p>Creative strategy by <b>Jane Doe</b>.</p></main>
              <footer>Copyright Jane Doe</footer>
            </body></html>"#;
        let text = visible_text(html);
        assert_eq!(text, "Creative strategy by Jane Doe.");
    }

    #[test]
    fn adjacent_blocks_stay_separated() {
        let text = visible_text("<div>Jane</div><div>Doe</div>");
        assert_eq!(text, "Jane Doe");
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(visible_text(""), "");
    }
}
