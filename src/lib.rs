//! # morphpage
//!
//! Static single-page report rendering for Rust.
//!
//! A report is a tree of parent sections, sections and typed content blocks
//! (paragraphs, math, nested lists, image grids). The same tree drives the
//! rendered content stream and the navigation sidebar, so every jump link
//! has a target.
//!
//! ## Quick Start
//!
//! ```no_run
//! use morphpage::{load_file, render};
//!
//! fn main() -> morphpage::Result<()> {
//!     // Load and validate a JSON document
//!     let doc = load_file("report.json")?;
//!
//!     // Render the full page
//!     let options = render::RenderOptions::default();
//!     let html = render::to_html(&doc, &options)?;
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Closed content model**: four block variants, matched exhaustively
//! - **Recursive lists**: sublists mix plain entries and nested blocks to any depth
//! - **Derived navigation**: table of contents projected from the section tree
//! - **Multiple output formats**: HTML (with KaTeX), Markdown, plain text, JSON
//! - **Integrity checks**: duplicate ids and malformed blocks fail fast, or are
//!   repaired in lenient mode

pub mod error;
pub mod loader;
pub mod model;
pub mod nav;
pub mod render;
pub mod report;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use loader::{DocumentLoader, LoadOptions, ValidationMode};
pub use model::{
    AssetRoot, ContentNode, Document, ImageRef, ListItem, Metadata, ParentSection, Section,
    SublistEntry,
};
pub use nav::{derive_nav, NavEntry, NavGroup, NavTree};
pub use render::{Element, JsonFormat, MathOptions, ParentSelection, RenderOptions, Tag};
pub use validate::{Diagnostic, DiagnosticKind, Severity, Validator};

use std::path::Path;

/// Load and validate a JSON document file.
///
/// # Example
///
/// ```no_run
/// use morphpage::load_file;
///
/// let doc = load_file("report.json").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocumentLoader::open(path)?.load()
}

/// Load a JSON document file with custom options.
///
/// # Example
///
/// ```no_run
/// use morphpage::{load_file_with_options, LoadOptions};
///
/// let doc = load_file_with_options("report.json", LoadOptions::new().lenient()).unwrap();
/// ```
pub fn load_file_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Document> {
    DocumentLoader::open_with_options(path, options)?.load()
}

/// Load and validate a document from a JSON string.
pub fn load_json(json: &str) -> Result<Document> {
    DocumentLoader::from_json(json)?.load()
}

/// The built-in face-morphing report with site-absolute asset paths.
pub fn builtin_report() -> Document {
    report::face_morphing(&AssetRoot::default())
}

/// Render a document to a complete HTML page with default options.
///
/// # Example
///
/// ```
/// let html = morphpage::to_html(&morphpage::builtin_report()).unwrap();
/// assert!(html.contains("id=\"midway-face\""));
/// ```
pub fn to_html(doc: &Document) -> Result<String> {
    render::to_html(doc, &RenderOptions::default())
}

/// Render a document to Markdown with default options.
pub fn to_markdown(doc: &Document) -> Result<String> {
    render::to_markdown(doc, &RenderOptions::default())
}

/// Builder for loading and publishing report documents.
///
/// # Example
///
/// ```no_run
/// use morphpage::Publisher;
///
/// let html = Publisher::new()
///     .with_public_url("https://example.github.io/morph")
///     .with_toc()
///     .lenient()
///     .load("report.json")?
///     .to_html()?;
/// # Ok::<(), morphpage::Error>(())
/// ```
pub struct Publisher {
    load_options: LoadOptions,
    render_options: RenderOptions,
    asset_root: AssetRoot,
}

impl Publisher {
    /// Create a new publisher.
    pub fn new() -> Self {
        Self {
            load_options: LoadOptions::default(),
            render_options: RenderOptions::default(),
            asset_root: AssetRoot::default(),
        }
    }

    /// Serve assets under a public URL prefix.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.asset_root = AssetRoot::new(url);
        self
    }

    /// Enable lenient loading mode.
    pub fn lenient(mut self) -> Self {
        self.load_options = self.load_options.lenient();
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Restrict output to some parent sections.
    pub fn with_parents(mut self, selection: ParentSelection) -> Self {
        self.render_options = self.render_options.with_parents(selection);
        self
    }

    /// Override the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Enable a table of contents in Markdown and text output.
    pub fn with_toc(mut self) -> Self {
        self.render_options = self.render_options.with_toc(true);
        self
    }

    /// Disable the formula typesetter in HTML output.
    pub fn without_math(mut self) -> Self {
        self.render_options = self.render_options.without_math();
        self
    }

    /// Publish the built-in report.
    pub fn builtin(self) -> Result<Publication> {
        let document = report::face_morphing(&self.asset_root);
        self.publish(document)
    }

    /// Load and publish a JSON document file.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<Publication> {
        let mut document =
            DocumentLoader::open_with_options(path, self.load_options.clone())?.load()?;
        document.resolve_assets(&self.asset_root);
        self.publish(document)
    }

    /// Load and publish a document from a JSON string.
    pub fn load_json(self, json: &str) -> Result<Publication> {
        let mut document =
            DocumentLoader::from_json_with_options(json, self.load_options.clone())?.load()?;
        document.resolve_assets(&self.asset_root);
        self.publish(document)
    }

    /// Publish an already constructed document.
    pub fn publish(self, document: Document) -> Result<Publication> {
        document.validate()?;
        document.select(&self.render_options.parents)?;
        Ok(Publication {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated document ready to render.
pub struct Publication {
    /// The published document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl Publication {
    /// Convert to a complete HTML page.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to HTML with statistics.
    pub fn to_html_with_stats(&self) -> Result<render::RenderResult> {
        render::to_html_with_stats(&self.document, &self.render_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Navigation tree of the selected parent sections.
    pub fn nav(&self) -> Result<NavTree> {
        let selected = self.document.select(&self.render_options.parents)?;
        Ok(derive_nav(&selected))
    }

    /// Assembled page tree.
    pub fn page(&self) -> Result<Element> {
        render::page::assemble(&self.document, &self.render_options)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_builder() {
        let publisher = Publisher::new().lenient().with_frontmatter().with_toc();
        assert!(publisher.load_options.is_lenient());
        assert!(publisher.render_options.include_frontmatter);
        assert!(publisher.render_options.include_toc);
    }

    #[test]
    fn test_publisher_default() {
        let publisher = Publisher::default();
        assert!(!publisher.load_options.is_lenient());
        assert_eq!(publisher.asset_root, AssetRoot::default());
    }

    #[test]
    fn test_builtin_publication() {
        let publication = Publisher::new()
            .with_public_url("/morph/")
            .builtin()
            .unwrap();
        let html = publication.to_html().unwrap();
        assert!(html.contains("src=\"/morph/images/me.jpeg\""));
        assert_eq!(publication.nav().unwrap().entry_count(), 8);
    }

    #[test]
    fn test_publisher_unknown_parent() {
        let result = Publisher::new()
            .with_parents(ParentSelection::Ids(vec!["missing".to_string()]))
            .builtin();
        assert!(matches!(result, Err(Error::UnknownParent(_))));
    }

    #[test]
    fn test_publisher_selection_limits_nav() {
        let publication = Publisher::new()
            .with_parents(ParentSelection::parse("pca,extra").unwrap())
            .builtin()
            .unwrap();
        let nav = publication.nav().unwrap();
        let ids: Vec<_> = nav.groups.iter().map(|g| g.parent_id.as_str()).collect();
        assert_eq!(ids, ["pca", "extra"]);
    }

    #[test]
    fn test_load_json_resolves_relative_assets() {
        let json = r#"[{"id": "p", "title": "P", "sections": [{"id": "s", "title": "S", "content": [
            {"type": "image-grid", "columns": 1, "images": [{"title": "A", "imageUrl": "images/a.jpg"}]}
        ]}]}]"#;
        let publication = Publisher::new()
            .with_public_url("https://cdn.example.com")
            .load_json(json)
            .unwrap();
        let html = publication.to_html().unwrap();
        assert!(html.contains("src=\"https://cdn.example.com/images/a.jpg\""));
    }

    #[test]
    fn test_load_json_invalid() {
        assert!(load_json("not json").is_err());
        assert!(matches!(load_json("[1, 2]"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_convenience_renderers() {
        let doc = builtin_report();
        assert!(to_html(&doc).unwrap().contains("<h1>Face Morphing</h1>"));
        assert!(to_markdown(&doc).unwrap().starts_with("# Face Morphing"));
    }
}
