//! JSON document loader.
//!
//! Accepts either a full document object (`{"metadata": ..., "parents": [...]}`)
//! or a bare array of parent sections. Content blocks are decoded one by one
//! so a malformed block is reported with its exact location.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{ContentNode, Document, Metadata, ParentSection, Section};
use crate::validate::{self, Diagnostic, DiagnosticKind, Validator};

use super::options::LoadOptions;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    metadata: Metadata,
    parents: Vec<RawParent>,
}

#[derive(Debug, Deserialize)]
struct RawParent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: Vec<Value>,
}

/// Document loader for JSON sources.
pub struct DocumentLoader {
    raw: RawDocument,
    options: LoadOptions,
}

impl DocumentLoader {
    /// Open a JSON document file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    /// Open a JSON document file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading document from {}", path.display());
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_options(json, LoadOptions::default())
    }

    /// Load from a JSON string with custom options.
    pub fn from_json_with_options(json: &str, options: LoadOptions) -> Result<Self> {
        Self::from_bytes_with_options(json.as_bytes(), options)
    }

    /// Load from JSON bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, LoadOptions::default())
    }

    /// Load from JSON bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: LoadOptions) -> Result<Self> {
        let value: Value = serde_json::from_slice(data)?;
        let raw = match value {
            Value::Array(_) => RawDocument {
                metadata: Metadata::default(),
                parents: serde_json::from_value(value)?,
            },
            Value::Object(_) => serde_json::from_value(value)?,
            _ => {
                return Err(Error::Parse(
                    "expected a document object or an array of parent sections".to_string(),
                ))
            }
        };
        Ok(Self { raw, options })
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, LoadOptions::default())
    }

    /// Load from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode and validate the document.
    pub fn load(self) -> Result<Document> {
        self.load_with_diagnostics().map(|(document, _)| document)
    }

    /// Decode and validate the document, returning every reported finding.
    ///
    /// In lenient mode the findings include each skipped block and each
    /// repair; in both modes they include validation warnings.
    pub fn load_with_diagnostics(self) -> Result<(Document, Vec<Diagnostic>)> {
        let lenient = self.options.is_lenient();
        let mut diagnostics = Vec::new();
        let mut malformed = Vec::new();

        let parents = self
            .raw
            .parents
            .into_iter()
            .enumerate()
            .map(|(p, parent)| ParentSection {
                id: parent.id,
                title: parent.title,
                sections: parent
                    .sections
                    .into_iter()
                    .enumerate()
                    .map(|(s, section)| Section {
                        id: section.id,
                        title: section.title,
                        content: decode_blocks(
                            &format!("parents[{}].sections[{}]", p, s),
                            section.content,
                            &mut malformed,
                        ),
                    })
                    .collect(),
            })
            .collect();

        if !malformed.is_empty() {
            if !lenient {
                return Err(Error::Integrity(malformed));
            }
            for diagnostic in &malformed {
                log::warn!("Skipping block at {}", diagnostic);
            }
            diagnostics.append(&mut malformed);
        }

        let mut document = Document::new(self.raw.metadata, parents);

        if lenient {
            for diagnostic in validate::repair(&mut document) {
                log::warn!("Repaired {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }

        let report = Validator::new().validate(&document);
        if report.has_errors() {
            return Err(Error::Integrity(report.errors));
        }
        for warning in report.warnings {
            log::warn!("{}", warning);
            diagnostics.push(warning);
        }

        log::debug!(
            "Loaded document '{}': {} parents, {} sections",
            document.metadata.title,
            document.parent_count(),
            document.section_count()
        );

        Ok((document, diagnostics))
    }
}

fn decode_blocks(location: &str, values: Vec<Value>, malformed: &mut Vec<Diagnostic>) -> Vec<ContentNode> {
    let mut blocks = Vec::with_capacity(values.len());
    for (b, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<ContentNode>(value) {
            Ok(node) => {
                log::trace!("Decoded {} block at {}.content[{}]", node.kind(), location, b);
                blocks.push(node);
            }
            Err(e) => malformed.push(Diagnostic::new(
                format!("{}.content[{}]", location, b),
                DiagnosticKind::MalformedBlock {
                    reason: e.to_string(),
                },
            )),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "metadata": {"title": "Sample"},
        "parents": [{
            "id": "face-morphing",
            "title": "Face Morphing",
            "sections": [{
                "id": "midway-face",
                "title": "Midway Face",
                "content": [
                    {"type": "paragraph", "text": "Average of two faces."},
                    {"type": "image-grid", "columns": 2, "images": [
                        {"title": "Me", "imageUrl": "/images/me.jpeg"}
                    ]}
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_load_document_object() {
        let doc = DocumentLoader::from_json(SAMPLE).unwrap().load().unwrap();
        assert_eq!(doc.metadata.title, "Sample");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.sections().next().unwrap().content.len(), 2);
    }

    #[test]
    fn test_load_bare_parent_array() {
        let json = r#"[{"id": "extra", "title": "Extra", "sections": []}]"#;
        let doc = DocumentLoader::from_json(json).unwrap().load().unwrap();
        assert_eq!(doc.parent_count(), 1);
        assert_eq!(doc.metadata, Metadata::default());
    }

    #[test]
    fn test_reject_scalar_source() {
        let result = DocumentLoader::from_json("42");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_strict_mode_reports_every_malformed_block() {
        let json = r#"[{"id": "p", "title": "P", "sections": [{"id": "s", "title": "S", "content": [
            {"type": "video", "src": "a.mp4"},
            {"type": "paragraph", "text": "ok"},
            {"type": "image-grid", "columns": 0, "images": []}
        ]}]}]"#;
        let err = DocumentLoader::from_json(json).unwrap().load().unwrap_err();
        let locations: Vec<_> = err.diagnostics().iter().map(|d| d.location.as_str()).collect();
        assert_eq!(
            locations,
            ["parents[0].sections[0].content[0]", "parents[0].sections[0].content[2]"]
        );
    }

    #[test]
    fn test_lenient_mode_skips_malformed_block() {
        let json = r#"[{"id": "p", "title": "P", "sections": [{"id": "s", "title": "S", "content": [
            {"type": "video", "src": "a.mp4"},
            {"type": "paragraph", "text": "kept"}
        ]}]}]"#;
        let options = LoadOptions::new().lenient();
        let (doc, diagnostics) = DocumentLoader::from_json_with_options(json, options)
            .unwrap()
            .load_with_diagnostics()
            .unwrap();

        let content = &doc.section("s").unwrap().content;
        assert_eq!(content, &vec![ContentNode::paragraph("kept")]);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::MalformedBlock { .. }
        ));
    }

    #[test]
    fn test_duplicate_ids_strict_and_lenient() {
        let json = r#"[{"id": "pca", "title": "PCA", "sections": [
            {"id": "pca", "title": "Rationale", "content": []}
        ]}]"#;

        let err = DocumentLoader::from_json(json).unwrap().load().unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));

        let doc = DocumentLoader::from_json_with_options(json, LoadOptions::new().lenient())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(doc.parents[0].sections[0].id, "pca-2");
    }

    #[test]
    fn test_from_reader() {
        let doc = DocumentLoader::from_reader(SAMPLE.as_bytes())
            .unwrap()
            .load()
            .unwrap();
        assert!(doc.section("midway-face").is_some());
    }
}
