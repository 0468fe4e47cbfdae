//! URL canonicalization.
//!
//! [`normalize`] reduces a URL string to a comparable domain form and is
//! applied to every whitelist entry on load. [`ensure_scheme`] is the
//! opposite direction: it coerces raw input into something the structural
//! parser accepts.

/// Strip an ASCII prefix without case sensitivity, never slicing across a
/// UTF-8 boundary.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&s[prefix.len()..]),
        _ => None,
    }
}

/// Canonicalize a URL string for domain comparison.
///
/// Removes a leading `http://` or `https://`, then a leading `www.`, then
/// trailing slashes, then lowercases. Normalizing an already-normalized
/// value is a no-op.
pub fn normalize(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let mut rest = url;
    for scheme in ["http://", "https://"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }

    rest.trim_end_matches('/').to_lowercase()
}

/// Prepend `http://` when the URL carries no explicit scheme.
///
/// Several feature rules and the whitelist matcher depend on structural
/// parsing of scheme/host/path, which needs a scheme present.
pub fn ensure_scheme(url: &str) -> String {
    if strip_prefix_ignore_case(url, "http://").is_some()
        || strip_prefix_ignore_case(url, "https://").is_some()
    {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}
