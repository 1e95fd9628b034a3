//! Rendering options and configuration.

/// Default KaTeX distribution root.
pub const DEFAULT_KATEX_CDN: &str = "https://cdn.jsdelivr.net/npm/katex";

/// Default KaTeX release.
pub const DEFAULT_KATEX_VERSION: &str = "0.16.11";

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page title overriding the document title
    pub page_title: Option<String>,

    /// Language of the page (`<html lang>`)
    pub lang: String,

    /// External stylesheet linked from the page head
    pub stylesheet: Option<String>,

    /// Embed the default stylesheet in the page head
    pub inline_style: bool,

    /// Formula typesetting configuration
    pub math: MathOptions,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Include a table of contents (Markdown and text)
    pub include_toc: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Character to use for unordered list markers
    pub list_marker: char,

    /// Parent sections to render
    pub parents: ParentSelection,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.page_title = Some(title.into());
        self
    }

    /// Set the page language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Link an external stylesheet.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet = Some(href.into());
        self
    }

    /// Enable or disable the embedded default stylesheet.
    pub fn with_inline_style(mut self, inline: bool) -> Self {
        self.inline_style = inline;
        self
    }

    /// Set formula typesetting options.
    pub fn with_math(mut self, math: MathOptions) -> Self {
        self.math = math;
        self
    }

    /// Disable the formula typesetter; markup is emitted verbatim.
    pub fn without_math(mut self) -> Self {
        self.math.enabled = false;
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Set parent selection.
    pub fn with_parents(mut self, selection: ParentSelection) -> Self {
        self.parents = selection;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_title: None,
            lang: "en".to_string(),
            stylesheet: None,
            inline_style: true,
            math: MathOptions::default(),
            include_frontmatter: false,
            include_toc: false,
            escape_special_chars: true,
            list_marker: '-',
            parents: ParentSelection::All,
            collect_stats: false,
        }
    }
}

/// Configuration of the external formula typesetter (KaTeX).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathOptions {
    /// Load the typesetter in the page head
    pub enabled: bool,

    /// Distribution root, without version
    pub cdn_base: String,

    /// Release to load
    pub katex_version: String,
}

impl MathOptions {
    /// URL of a file in the configured distribution.
    pub fn asset_url(&self, file: &str) -> String {
        format!(
            "{}@{}/dist/{}",
            self.cdn_base.trim_end_matches('/'),
            self.katex_version,
            file
        )
    }
}

impl Default for MathOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            cdn_base: DEFAULT_KATEX_CDN.to_string(),
            katex_version: DEFAULT_KATEX_VERSION.to_string(),
        }
    }
}

/// Parent section selection for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentSelection {
    /// Render every parent section
    #[default]
    All,
    /// Render the listed parent sections, in document order
    Ids(Vec<String>),
}

impl ParentSelection {
    /// Check if a parent section should be included.
    pub fn includes(&self, id: &str) -> bool {
        match self {
            ParentSelection::All => true,
            ParentSelection::Ids(ids) => ids.iter().any(|i| i == id),
        }
    }

    /// Parse a selection string (e.g., "all", "face-morphing,pca").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(ParentSelection::All);
        }

        let mut ids: Vec<String> = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(format!("Empty parent id in '{}'", s));
            }
            if !ids.iter().any(|i| i == part) {
                ids.push(part.to_string());
            }
        }

        Ok(ParentSelection::Ids(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_title("Morphing")
            .with_frontmatter(true)
            .with_list_marker('*')
            .without_math();

        assert_eq!(options.page_title.as_deref(), Some("Morphing"));
        assert!(options.include_frontmatter);
        assert_eq!(options.list_marker, '*');
        assert!(!options.math.enabled);
        assert_eq!(options.lang, "en");
    }

    #[test]
    fn test_math_asset_url() {
        let math = MathOptions::default();
        assert_eq!(
            math.asset_url("katex.min.css"),
            "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css"
        );
    }

    #[test]
    fn test_parent_selection_includes() {
        assert!(ParentSelection::All.includes("anything"));

        let ids = ParentSelection::Ids(vec!["pca".to_string()]);
        assert!(ids.includes("pca"));
        assert!(!ids.includes("extra"));
    }

    #[test]
    fn test_parent_selection_parse() {
        assert_eq!(ParentSelection::parse("all").unwrap(), ParentSelection::All);
        assert_eq!(ParentSelection::parse("  ").unwrap(), ParentSelection::All);

        let ids = ParentSelection::parse("face-morphing, pca,pca").unwrap();
        assert_eq!(
            ids,
            ParentSelection::Ids(vec!["face-morphing".to_string(), "pca".to_string()])
        );

        assert!(ParentSelection::parse("pca,,extra").is_err());
    }
}
