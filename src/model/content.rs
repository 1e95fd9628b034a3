//! Content blocks: the typed units a section is made of.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// One typed unit of section content.
///
/// The set of variants is closed. Every consumer matches it exhaustively, so
/// adding a variant breaks each renderer and exporter until it is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentNode {
    /// Plain prose, rendered verbatim.
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// Formula markup, opaque to the renderer and forwarded to the typesetter.
    Math {
        /// Raw markup including its delimiters, e.g. `\( X = U \Sigma V^T \)`
        text: String,
    },

    /// An ordered list whose items may carry nested sublists.
    List {
        /// List items in display order
        items: Vec<ListItem>,
    },

    /// A captioned image gallery laid out on a fixed number of columns.
    ImageGrid {
        /// Number of columns; cells wrap onto further rows
        columns: NonZeroU32,
        /// Images in display order
        images: Vec<ImageRef>,
    },
}

impl ContentNode {
    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentNode::Paragraph { text: text.into() }
    }

    /// Create a math block from raw formula markup.
    pub fn math(text: impl Into<String>) -> Self {
        ContentNode::Math { text: text.into() }
    }

    /// Create an ordered list block.
    pub fn list(items: Vec<ListItem>) -> Self {
        ContentNode::List { items }
    }

    /// Create an image grid.
    ///
    /// Returns `None` when `columns` is zero.
    pub fn image_grid(columns: u32, images: Vec<ImageRef>) -> Option<Self> {
        NonZeroU32::new(columns).map(|columns| ContentNode::ImageGrid { columns, images })
    }

    /// Variant tag as it appears in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentNode::Paragraph { .. } => "paragraph",
            ContentNode::Math { .. } => "math",
            ContentNode::List { .. } => "list",
            ContentNode::ImageGrid { .. } => "image-grid",
        }
    }

    /// Deepest list nesting below this node (0 for non-list blocks).
    pub fn list_depth(&self) -> usize {
        match self {
            ContentNode::Paragraph { .. } | ContentNode::Math { .. } => 0,
            ContentNode::ImageGrid { .. } => 0,
            ContentNode::List { items } => {
                1 + items
                    .iter()
                    .map(ListItem::nested_depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl ContentNode {
    /// Apply `f` to every image reference in this block, including nested sublists.
    pub fn for_each_image_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut ImageRef),
    {
        match self {
            ContentNode::Paragraph { .. } | ContentNode::Math { .. } => {}
            ContentNode::ImageGrid { images, .. } => images.iter_mut().for_each(|image| f(image)),
            ContentNode::List { items } => {
                for entry in items.iter_mut().filter_map(|i| i.sublist.as_mut()).flatten() {
                    if let SublistEntry::Node(node) = entry {
                        node.for_each_image_mut(f);
                    }
                }
            }
        }
    }
}

/// A single entry of an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListItem {
    /// Primary label of the item
    pub text: String,

    /// Nested entries shown as bullets below the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublist: Option<Vec<SublistEntry>>,
}

impl ListItem {
    /// Create an item without a sublist.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sublist: None,
        }
    }

    /// Create an item with a sublist.
    pub fn with_sublist(text: impl Into<String>, sublist: Vec<SublistEntry>) -> Self {
        Self {
            text: text.into(),
            sublist: Some(sublist),
        }
    }

    /// Append an entry, creating the sublist if needed.
    pub fn push(&mut self, entry: impl Into<SublistEntry>) {
        self.sublist.get_or_insert_with(Vec::new).push(entry.into());
    }

    /// Sublist entries, empty when the item has none.
    pub fn entries(&self) -> &[SublistEntry] {
        self.sublist.as_deref().unwrap_or(&[])
    }

    fn nested_depth(&self) -> usize {
        if self.sublist.is_none() {
            return 0;
        }
        1 + self
            .entries()
            .iter()
            .map(|entry| match entry {
                SublistEntry::Text(_) => 0,
                SublistEntry::Node(node) => node.list_depth(),
            })
            .max()
            .unwrap_or(0)
    }
}

/// An entry of a list item's sublist: plain text or a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SublistEntry {
    /// Rendered as a simple nested bullet
    Text(String),
    /// Rendered through the block renderer inside a nested bullet
    Node(ContentNode),
}

impl From<&str> for SublistEntry {
    fn from(text: &str) -> Self {
        SublistEntry::Text(text.to_string())
    }
}

impl From<String> for SublistEntry {
    fn from(text: String) -> Self {
        SublistEntry::Text(text)
    }
}

impl From<ContentNode> for SublistEntry {
    fn from(node: ContentNode) -> Self {
        SublistEntry::Node(node)
    }
}

/// A captioned reference to an image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageRef {
    /// Caption shown under the image
    pub title: String,

    /// Resolved asset URL
    pub image_url: String,
}

impl ImageRef {
    /// Create an image reference.
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_grid_rejects_zero_columns() {
        assert!(ContentNode::image_grid(0, vec![]).is_none());
        let grid = ContentNode::image_grid(4, vec![]).unwrap();
        assert_eq!(grid.kind(), "image-grid");
    }

    #[test]
    fn test_list_depth() {
        assert_eq!(ContentNode::paragraph("p").list_depth(), 0);

        let flat = ContentNode::list(vec![ListItem::new("a"), ListItem::new("b")]);
        assert_eq!(flat.list_depth(), 1);

        let nested = ContentNode::list(vec![ListItem::with_sublist(
            "a",
            vec!["plain".into(), ContentNode::math("\\( x \\)").into()],
        )]);
        assert_eq!(nested.list_depth(), 2);

        let deep = ContentNode::list(vec![ListItem::with_sublist(
            "outer",
            vec![SublistEntry::Node(nested)],
        )]);
        assert_eq!(deep.list_depth(), 4);
    }

    #[test]
    fn test_serde_tag_names() {
        let node = ContentNode::image_grid(2, vec![ImageRef::new("Me", "/images/me.jpeg")]).unwrap();
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"image-grid\""));
        assert!(json.contains("\"imageUrl\":\"/images/me.jpeg\""));
    }

    #[test]
    fn test_sublist_mixes_strings_and_nodes() {
        let json = r#"{
            "text": "Warp each image",
            "sublist": ["plain entry", {"type": "math", "text": "\\( A \\)"}]
        }"#;
        let item: ListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.entries().len(), 2);
        assert!(matches!(item.entries()[0], SublistEntry::Text(_)));
        assert!(matches!(
            item.entries()[1],
            SublistEntry::Node(ContentNode::Math { .. })
        ));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let result = serde_json::from_str::<ContentNode>(r#"{"type": "video", "src": "a.mp4"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_columns_is_rejected() {
        let result =
            serde_json::from_str::<ContentNode>(r#"{"type": "image-grid", "columns": 0, "images": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_for_each_image_mut_reaches_sublists() {
        let grid = ContentNode::image_grid(1, vec![ImageRef::new("A", "a.jpg")]).unwrap();
        let mut node = ContentNode::list(vec![ListItem::with_sublist("outer", vec![grid.into()])]);
        let mut seen = 0;
        node.for_each_image_mut(&mut |image| {
            image.image_url = format!("/{}", image.image_url);
            seen += 1;
        });
        assert_eq!(seen, 1);
        assert!(serde_json::to_string(&node).unwrap().contains("/a.jpg"));
    }

    #[test]
    fn test_list_item_push() {
        let mut item = ListItem::new("Compute the average");
        assert!(item.entries().is_empty());
        item.push("pairwise");
        item.push(ContentNode::math("\\( C \\)"));
        assert_eq!(item.entries().len(), 2);
    }
}
