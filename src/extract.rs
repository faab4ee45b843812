//! Image URL extraction from page HTML
//!
//! Three patterns are tried in order and the first hit wins: an Open Graph
//! `og:image` meta tag, a Twitter card `twitter:image` meta tag, and finally
//! a raw URL on a known image-hosting domain. Matched values are returned
//! verbatim, without entity decoding or validation.

use crate::error::{AssetError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("Failed to compile META_TAG"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Failed to compile ATTRIBUTE")
});

/// Which pattern produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    OpenGraph,
    TwitterCard,
    HostFallback,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenGraph => write!(f, "og:image"),
            Self::TwitterCard => write!(f, "twitter:image"),
            Self::HostFallback => write!(f, "host fallback"),
        }
    }
}

/// Extracts the representative image URL from a document
#[derive(Debug, Clone)]
pub struct ImageUrlExtractor {
    fallback: Option<Regex>,
}

impl ImageUrlExtractor {
    /// Create an extractor; `fallback_host` enables the substring fallback
    pub fn new(fallback_host: Option<&str>) -> Result<Self> {
        let fallback = fallback_host
            .map(|host| {
                let pattern = format!(
                    r#"(?i)https?://[^"'\s<>]*{}[^"'\s<>]*\.(?:png|jpe?g)"#,
                    regex::escape(host)
                );
                Regex::new(&pattern).map_err(|e| {
                    AssetError::invalid_config(format!("Invalid fallback host '{}': {}", host, e))
                })
            })
            .transpose()?;

        Ok(Self { fallback })
    }

    /// First image URL found in `html`
    #[must_use]
    pub fn extract(&self, html: &str) -> Option<String> {
        self.extract_with_kind(html).map(|(url, _)| url)
    }

    /// First image URL found in `html`, along with the pattern that matched
    #[must_use]
    pub fn extract_with_kind(&self, html: &str) -> Option<(String, MatchKind)> {
        if let Some(url) = find_meta_content(html, "property", "og:image") {
            return Some((url, MatchKind::OpenGraph));
        }
        if let Some(url) = find_meta_content(html, "name", "twitter:image") {
            return Some((url, MatchKind::TwitterCard));
        }
        self.fallback
            .as_ref()
            .and_then(|re| re.find(html))
            .map(|m| (m.as_str().to_string(), MatchKind::HostFallback))
    }
}

/// `content` of the first meta tag whose `key_attr` equals `key_value`
///
/// Attribute names and the key value compare case-insensitively; attribute
/// order and quote style do not matter. Tags with an empty `content` are
/// skipped.
#[must_use]
pub fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG.find_iter(html).find_map(|tag| {
        let mut key_matches = false;
        let mut content = None;

        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            let Some(name) = caps.get(1) else { continue };
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());

            if name.as_str().eq_ignore_ascii_case(key_attr) && value.eq_ignore_ascii_case(key_value)
            {
                key_matches = true;
            } else if name.as_str().eq_ignore_ascii_case("content") && content.is_none() {
                content = Some(value);
            }
        }

        if key_matches {
            content.filter(|v| !v.is_empty()).map(str::to_string)
        } else {
            None
        }
    })
}
