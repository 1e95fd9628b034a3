//! Rendering result with metadata and statistics.

use crate::model::{ContentNode, Document, Metadata, SublistEntry};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (HTML, Markdown, text)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: RenderStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            metadata: Metadata::default(),
            stats: RenderStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts of the rendered structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of parent sections
    pub parent_count: u32,

    /// Number of sections
    pub section_count: u32,

    /// Number of paragraph blocks, nested ones included
    pub paragraph_count: u32,

    /// Number of math blocks, nested ones included
    pub math_count: u32,

    /// Number of list blocks, nested ones included
    pub list_count: u32,

    /// Number of list items and sublist entries
    pub list_item_count: u32,

    /// Number of image grids
    pub image_grid_count: u32,

    /// Number of images
    pub image_count: u32,

    /// Deepest list container nesting
    pub max_list_depth: u32,

    /// Approximate word count of the output
    pub word_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a document and count its structure.
    pub fn collect(document: &Document) -> Self {
        let mut stats = Self::new();
        for parent in &document.parents {
            stats.parent_count += 1;
            for section in &parent.sections {
                stats.section_count += 1;
                for node in &section.content {
                    stats.add_node(node);
                }
            }
        }
        stats
    }

    /// Count a content block and everything nested in it.
    pub fn add_node(&mut self, node: &ContentNode) {
        match node {
            ContentNode::Paragraph { .. } => self.paragraph_count += 1,
            ContentNode::Math { .. } => self.math_count += 1,
            ContentNode::List { items } => {
                self.list_count += 1;
                self.max_list_depth = self.max_list_depth.max(node.list_depth() as u32);
                for item in items {
                    self.list_item_count += 1;
                    for entry in item.entries() {
                        match entry {
                            SublistEntry::Text(_) => self.list_item_count += 1,
                            SublistEntry::Node(nested) => {
                                self.list_item_count += 1;
                                self.add_node(nested);
                            }
                        }
                    }
                }
            }
            ContentNode::ImageGrid { images, .. } => {
                self.image_grid_count += 1;
                self.image_count += images.len() as u32;
            }
        }
    }

    /// Add the word count of rendered text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Total number of content blocks, nested ones included.
    pub fn block_count(&self) -> u32 {
        self.paragraph_count + self.math_count + self.list_count + self.image_grid_count
    }
}
