// URL canonicalization for dedup and external-link classification.

/// Schemes that never point at a fetchable resource.
const NON_NAVIGABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Canonical form used for dedup comparison: `scheme://host[:port]/path`,
/// query and fragment dropped, trailing slashes removed, lower-cased.
/// Input that doesn't parse to a URL with a host comes back lower-cased.
pub fn normalize_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return url.to_lowercase();
    };

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {
            let mut out = format!("{}://{}", parsed.scheme(), host);
            if let Some(port) = parsed.port() {
                out.push(':');
                out.push_str(&port.to_string());
            }
            out.push_str(parsed.path());
            out.trim_end_matches('/').to_lowercase()
        }
        _ => url.to_lowercase(),
    }
}

/// True when `url` targets another host. Anchors, `javascript:`, `mailto:`,
/// `tel:` and relative paths are local.
pub fn is_external(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return false;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || NON_NAVIGABLE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return false;
    }

    // Protocol-relative: "//cdn.example.com/img.png"
    let candidate = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else {
        trimmed.to_string()
    };

    url::Url::parse(&candidate)
        .ok()
        .and_then(|u| u.host_str().map(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// True when `url` has both a scheme and a host.
pub fn is_absolute_url(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| !u.scheme().is_empty() && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// Lower-cased host of `url` without a leading `www.`.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(strip_www(&host).to_string())
}

/// True when `host` is `domain` or one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim().to_lowercase();
    let domain = domain.trim().trim_end_matches('/').to_lowercase();
    let (host, domain) = (strip_www(&host), strip_www(&domain));
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
