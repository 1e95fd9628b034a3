//! Asset URL resolution.

use serde::{Deserialize, Serialize};

/// Public root under which image assets are served.
///
/// Plays the role of a `PUBLIC_URL` prefix: an empty root yields
/// site-absolute paths such as `/images/me.jpeg`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRoot {
    base: String,
}

impl AssetRoot {
    /// Create an asset root from a URL prefix.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        Self { base }
    }

    /// The normalized prefix, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve an asset path relative to the root.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Resolve a URL unless it is already absolute (has a scheme or is a data URL).
    pub fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") || url.starts_with("data:") || url.starts_with("//") {
            url.to_string()
        } else {
            self.resolve(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_root() {
        let root = AssetRoot::default();
        assert_eq!(root.resolve("images/me.jpeg"), "/images/me.jpeg");
        assert_eq!(root.resolve("/images/me.jpeg"), "/images/me.jpeg");
    }

    #[test]
    fn test_resolve_url_keeps_absolute() {
        let root = AssetRoot::new("/morph");
        assert_eq!(root.resolve_url("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert_eq!(root.resolve_url("images/a.png"), "/morph/images/a.png");
    }

    #[test]
    fn test_resolve_with_prefix() {
        let root = AssetRoot::new("https://example.github.io/morph/");
        assert_eq!(root.base(), "https://example.github.io/morph");
        assert_eq!(
            root.resolve("images/midway.jpg"),
            "https://example.github.io/morph/images/midway.jpg"
        );
    }
}
