//! JSON rendering for documents and navigation trees.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Document;
use crate::nav::NavTree;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
///
/// The output is accepted back by the document loader.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Convert a navigation tree to JSON.
pub fn nav_to_json(nav: &NavTree, format: JsonFormat) -> Result<String> {
    serialize(nav, format)
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentNode, Metadata, ParentSection, Section};
    use crate::nav::derive_nav;

    fn sample() -> Document {
        Document::new(
            Metadata::with_title("Test"),
            vec![ParentSection::new(
                "pca",
                "PCA",
                vec![Section::new(
                    "pca-rationale",
                    "Rationale",
                    vec![ContentNode::paragraph("Hello")],
                )],
            )],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_nav_to_json() {
        let json = nav_to_json(&derive_nav(&sample()), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"groups":[{"parent_id":"pca","parent_title":"PCA","children":[{"section_id":"pca-rationale","section_title":"Rationale"}]}]}"#
        );
    }
}
