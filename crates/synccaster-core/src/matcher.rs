//! URL glob patterns identifying pages an adapter can automate.
//!
//! `*` matches any run of characters, `/` included. Everything else is
//! literal, and a pattern must match the whole URL.

use regex_lite::Regex;
use serde::{Serialize, Serializer};

use crate::error::AdapterError;

#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: &'static str,
    regex: Regex,
}

impl UrlMatcher {
    pub fn new(pattern: &'static str) -> Result<Self, AdapterError> {
        let body = pattern
            .split('*')
            .map(regex_lite::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{body}$")).map_err(|source| AdapterError::Matcher {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern, regex })
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

impl Serialize for UrlMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.pattern)
    }
}

/// An ordered list of matchers; the first hit wins.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct UrlMatchers(Vec<UrlMatcher>);

impl UrlMatchers {
    pub fn new(patterns: &[&'static str]) -> Result<Self, AdapterError> {
        patterns
            .iter()
            .map(|p| UrlMatcher::new(p))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Index of the first pattern accepting `url`.
    pub fn position(&self, url: &str) -> Option<usize> {
        self.0.iter().position(|m| m.matches(url))
    }

    pub fn matches(&self, url: &str) -> bool {
        self.position(url).is_some()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(UrlMatcher::pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_spans_path_segments() {
        let m = UrlMatcher::new("https://juejin.cn/editor/*").unwrap();
        assert!(m.matches("https://juejin.cn/editor/drafts/new"));
        assert!(m.matches("https://juejin.cn/editor/"));
        assert!(!m.matches("https://juejin.cn/post/123"));
    }

    #[test]
    fn literal_characters_are_escaped() {
        let m = UrlMatcher::new("https://i.cnblogs.com/posts/edit?*").unwrap();
        assert!(m.matches("https://i.cnblogs.com/posts/edit?postId=1"));
        assert!(!m.matches("https://iXcnblogs.com/posts/edit?postId=1"));
        assert!(!m.matches("https://i.cnblogs.com/posts/editX"));
    }

    #[test]
    fn match_is_anchored() {
        let m = UrlMatcher::new("https://example.com/write").unwrap();
        assert!(!m.matches("https://example.com/write/extra"));
        assert!(!m.matches("http://evil.test/?https://example.com/write"));
    }

    #[test]
    fn first_matching_pattern_reported() {
        let ms = UrlMatchers::new(&["https://a.test/x/*", "https://a.test/*"]).unwrap();
        assert_eq!(ms.position("https://a.test/x/1"), Some(0));
        assert_eq!(ms.position("https://a.test/y"), Some(1));
        assert_eq!(ms.position("https://b.test/"), None);
    }
}
