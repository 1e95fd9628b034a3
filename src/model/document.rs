//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{AssetRoot, ContentNode};
use crate::error::{Error, Result};
use crate::render::ParentSelection;
use crate::validate::Validator;

/// A complete report: metadata plus an ordered list of parent sections.
///
/// Built once (from code or by the loader), validated, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Report metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Top-level navigation categories in display order
    pub parents: Vec<ParentSection>,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(metadata: Metadata, parents: Vec<ParentSection>) -> Self {
        Self { metadata, parents }
    }

    /// Number of parent sections.
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Total number of sections across all parents.
    pub fn section_count(&self) -> usize {
        self.parents.iter().map(|p| p.sections.len()).sum()
    }

    /// Check if the document has no parent sections.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Iterate over every section in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.parents.iter().flat_map(|p| p.sections.iter())
    }

    /// Find a parent section by id.
    pub fn parent(&self, id: &str) -> Option<&ParentSection> {
        self.parents.iter().find(|p| p.id == id)
    }

    /// Find a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections().find(|s| s.id == id)
    }

    /// Check the model invariants.
    ///
    /// Fails with every error-severity finding. Warnings are logged and do not fail.
    pub fn validate(&self) -> Result<()> {
        let report = Validator::new().validate(self);
        for warning in &report.warnings {
            log::warn!("{}", warning);
        }
        if report.is_valid() {
            Ok(())
        } else {
            Err(Error::Integrity(report.errors))
        }
    }

    /// Resolve every relative image URL against an asset root.
    pub fn resolve_assets(&mut self, root: &AssetRoot) {
        for section in self.parents.iter_mut().flat_map(|p| p.sections.iter_mut()) {
            for node in &mut section.content {
                node.for_each_image_mut(&mut |image| {
                    image.image_url = root.resolve_url(&image.image_url);
                });
            }
        }
    }

    /// Copy of this document restricted to the selected parent sections.
    ///
    /// Every requested id must exist.
    pub fn select(&self, selection: &ParentSelection) -> Result<Document> {
        if let ParentSelection::Ids(ids) = selection {
            if let Some(missing) = ids.iter().find(|id| self.parent(id).is_none()) {
                return Err(Error::UnknownParent(missing.clone()));
            }
        }

        Ok(Document {
            metadata: self.metadata.clone(),
            parents: self
                .parents
                .iter()
                .filter(|p| selection.includes(&p.id))
                .cloned()
                .collect(),
        })
    }
}

/// Report metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Report title, shown as the page heading
    pub title: String,

    /// Optional subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Report author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Short summary used for the HTML description meta tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("title: \"{}\"", escape_yaml(&self.title)));
        if let Some(ref subtitle) = self.subtitle {
            lines.push(format!("subtitle: \"{}\"", escape_yaml(subtitle)));
        }
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref description) = self.description {
            lines.push(format!("description: \"{}\"", escape_yaml(description)));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// A titled group of sections; one navigation category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSection {
    /// Anchor id, unique across the document
    pub id: String,

    /// Category title
    pub title: String,

    /// Sections in display order
    pub sections: Vec<Section>,
}

impl ParentSection {
    /// Create a parent section.
    pub fn new(id: impl Into<String>, title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sections,
        }
    }
}

/// A titled, anchorable group of content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Anchor id, unique across the document
    pub id: String,

    /// Section title
    pub title: String,

    /// Content blocks in display order
    pub content: Vec<ContentNode>,
}

impl Section {
    /// Create a section.
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: Vec<ContentNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
        }
    }

    /// Append a content block.
    pub fn push(&mut self, node: ContentNode) {
        self.content.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            Metadata::with_title("Face Morphing"),
            vec![
                ParentSection::new(
                    "face-morphing",
                    "Face Morphing",
                    vec![
                        Section::new("midway-face", "Midway Face", vec![]),
                        Section::new("morph-sequence", "Morph Sequence", vec![]),
                    ],
                ),
                ParentSection::new(
                    "extra",
                    "Extra",
                    vec![Section::new("modify-a-face", "Modify a Face", vec![])],
                ),
            ],
        )
    }

    #[test]
    fn test_counts_and_lookup() {
        let doc = sample();
        assert_eq!(doc.parent_count(), 2);
        assert_eq!(doc.section_count(), 3);
        assert!(doc.section("morph-sequence").is_some());
        assert!(doc.parent("extra").is_some());
        assert!(doc.section("extra").is_none());

        let ids: Vec<_> = doc.sections().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["midway-face", "morph-sequence", "modify-a-face"]);
    }

    #[test]
    fn test_validate_duplicate_id() {
        let mut doc = sample();
        doc.parents[1].sections[0].id = "midway-face".to_string();
        let err = doc.validate().unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_select_parents() {
        let doc = sample();
        let selected = doc
            .select(&ParentSelection::Ids(vec!["extra".to_string()]))
            .unwrap();
        assert_eq!(selected.parent_count(), 1);
        assert_eq!(selected.parents[0].id, "extra");

        let all = doc.select(&ParentSelection::All).unwrap();
        assert_eq!(all, doc);

        let err = doc
            .select(&ParentSelection::Ids(vec!["missing".to_string()]))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownParent(id) if id == "missing"));
    }

    #[test]
    fn test_metadata_frontmatter() {
        let mut metadata = Metadata::with_title("Face \"Morphing\"");
        metadata.author = Some("Jane Doe".to_string());

        let yaml = metadata.to_yaml_frontmatter();
        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("title: \"Face \\\"Morphing\\\"\""));
        assert!(yaml.contains("author: \"Jane Doe\""));
        assert!(!yaml.contains("subtitle"));
    }
}
