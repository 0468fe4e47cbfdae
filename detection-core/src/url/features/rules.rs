//! Lexical/structural feature rules.
//!
//! Each rule is pure and total over any string input, including malformed
//! URLs: host/path parse failures produce the rule's no-match code instead
//! of propagating. Codes are small integers rather than booleans because
//! the trained model consumes multi-level signals.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::constants::SHORTENING_SERVICES;
use super::vector::UrlFeatureVector;

static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}\.){3}\d{1,3}").expect("static pattern"));

/// Derive the full fixed-order vector.
///
/// The URL must already carry an explicit scheme (see `ensure_scheme`);
/// several rules depend on structural parsing of scheme/host/path.
pub fn extract(url: &str) -> UrlFeatureVector {
    UrlFeatureVector::from_values([
        having_ip(url),
        url_length(url),
        shortening_service(url),
        at_symbol(url),
        double_slash_in_path(url),
        hyphen_in_host(url),
        subdomain_depth(url),
        https_token(url),
    ])
}

/// Dotted-quad pattern anywhere in the URL.
fn having_ip(url: &str) -> i32 {
    if IPV4_PATTERN.is_match(url) {
        1
    } else {
        -1
    }
}

/// Length buckets: short URLs score 0, 54-75 scores 1, longer scores 2.
fn url_length(url: &str) -> i32 {
    match url.len() {
        0..=53 => 0,
        54..=75 => 1,
        _ => 2,
    }
}

fn shortening_service(url: &str) -> i32 {
    let lower = url.to_lowercase();
    if SHORTENING_SERVICES.iter().any(|s| lower.contains(s)) {
        1
    } else {
        -1
    }
}

fn at_symbol(url: &str) -> i32 {
    if url.contains('@') {
        1
    } else {
        -1
    }
}

/// `//` inside the path component, excluding the scheme separator.
fn double_slash_in_path(url: &str) -> i32 {
    let in_path = Url::parse(url)
        .map(|u| u.path().contains("//"))
        .unwrap_or(false);
    if in_path {
        1
    } else {
        -1
    }
}

fn hyphen_in_host(url: &str) -> i32 {
    let hyphen = host_of(url).map(|host| host.contains('-')).unwrap_or(false);
    if hyphen {
        1
    } else {
        -1
    }
}

/// Dot-count bucket of the host: one dot is an apex domain, two is a single
/// subdomain level, anything else counts as deep nesting.
fn subdomain_depth(url: &str) -> i32 {
    let host = host_of(url).unwrap_or_default();
    match host.matches('.').count() {
        1 => -1,
        2 => 0,
        _ => 1,
    }
}

fn https_token(url: &str) -> i32 {
    if url.to_lowercase().starts_with("https://") {
        1
    } else {
        -1
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|host| host.to_lowercase()))
}
