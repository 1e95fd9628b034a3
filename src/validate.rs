//! Document integrity checks.
//!
//! The [`Validator`] walks a whole document and collects every finding rather
//! than stopping at the first one. [`repair`] is the lenient counterpart: it
//! fixes what can be fixed mechanically and reports each fix.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::{ContentNode, Document, SublistEntry};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Breaks an invariant; rendering must not proceed in strict mode
    Error,
    /// Worth reporting, but the page still renders correctly
    Warning,
}

/// What is wrong at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The id is already used by another parent or section.
    DuplicateId {
        /// The colliding id
        id: String,
    },
    /// The id is blank.
    EmptyId,
    /// The id is not a portable anchor (`[A-Za-z][A-Za-z0-9_-]*`).
    InvalidId {
        /// The offending id
        id: String,
    },
    /// The title is blank.
    EmptyTitle,
    /// An image reference has no URL.
    EmptyImageUrl,
    /// A content block could not be decoded.
    MalformedBlock {
        /// Decoder message
        reason: String,
    },
}

impl DiagnosticKind {
    /// Severity of this kind of finding.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::DuplicateId { .. }
            | DiagnosticKind::EmptyId
            | DiagnosticKind::EmptyImageUrl
            | DiagnosticKind::MalformedBlock { .. } => Severity::Error,
            DiagnosticKind::InvalidId { .. } | DiagnosticKind::EmptyTitle => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DuplicateId { id } => write!(f, "duplicate id '{}'", id),
            DiagnosticKind::EmptyId => write!(f, "empty id"),
            DiagnosticKind::InvalidId { id } => write!(f, "id '{}' is not a portable anchor", id),
            DiagnosticKind::EmptyTitle => write!(f, "empty title"),
            DiagnosticKind::EmptyImageUrl => write!(f, "image has an empty URL"),
            DiagnosticKind::MalformedBlock { reason } => write!(f, "malformed block: {}", reason),
        }
    }
}

/// A single finding, located by a path such as `parents[0].sections[1].content[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Path to the offending element
    pub location: String,

    /// What is wrong there
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(location: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            location: location.into(),
            kind,
        }
    }

    /// Severity of the finding.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// Findings of a validation pass, split by severity.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Invariant violations
    pub errors: Vec<Diagnostic>,

    /// Informational findings
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Returns `true` if validation found no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Document validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    seen: HashSet<String>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a document and return every finding.
    pub fn validate(&mut self, document: &Document) -> ValidationReport {
        self.errors.clear();
        self.warnings.clear();
        self.seen.clear();

        for (p, parent) in document.parents.iter().enumerate() {
            let location = format!("parents[{}]", p);
            self.check_anchor(&location, &parent.id, &parent.title);

            for (s, section) in parent.sections.iter().enumerate() {
                let location = format!("{}.sections[{}]", location, s);
                self.check_anchor(&location, &section.id, &section.title);

                for (b, node) in section.content.iter().enumerate() {
                    self.check_node(&format!("{}.content[{}]", location, b), node);
                }
            }
        }

        log::debug!(
            "Validated document: {} errors, {} warnings",
            self.errors.len(),
            self.warnings.len()
        );

        ValidationReport {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn check_anchor(&mut self, location: &str, id: &str, title: &str) {
        if id.trim().is_empty() {
            self.add(location, DiagnosticKind::EmptyId);
        } else {
            if !self.seen.insert(id.to_string()) {
                self.add(location, DiagnosticKind::DuplicateId { id: id.to_string() });
            }
            if !is_portable_anchor(id) {
                self.add(location, DiagnosticKind::InvalidId { id: id.to_string() });
            }
        }

        if title.trim().is_empty() {
            self.add(location, DiagnosticKind::EmptyTitle);
        }
    }

    fn check_node(&mut self, location: &str, node: &ContentNode) {
        match node {
            ContentNode::Paragraph { .. } | ContentNode::Math { .. } => {}
            ContentNode::List { items } => {
                for (i, item) in items.iter().enumerate() {
                    for (e, entry) in item.entries().iter().enumerate() {
                        if let SublistEntry::Node(nested) = entry {
                            let location = format!("{}.items[{}].sublist[{}]", location, i, e);
                            self.check_node(&location, nested);
                        }
                    }
                }
            }
            ContentNode::ImageGrid { images, .. } => {
                for (i, image) in images.iter().enumerate() {
                    if image.image_url.trim().is_empty() {
                        self.add(&format!("{}.images[{}]", location, i), DiagnosticKind::EmptyImageUrl);
                    }
                }
            }
        }
    }

    fn add(&mut self, location: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(location, kind);
        match diagnostic.severity() {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }
}

/// Check whether an id is safe to use unescaped as a URL fragment.
pub fn is_portable_anchor(id: &str) -> bool {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    ANCHOR
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid anchor pattern"))
        .is_match(id)
}

/// Fix every error-severity finding that has a mechanical repair.
///
/// Blank ids are derived from the title, duplicate ids get a numeric suffix,
/// and images without a URL are removed from their grid. Returns one
/// diagnostic per repair, in document order.
pub fn repair(document: &mut Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let taken: HashSet<String> = document
        .parents
        .iter()
        .map(|p| p.id.clone())
        .chain(document.sections().map(|s| s.id.clone()))
        .collect();
    let mut seen = HashSet::new();

    for (p, parent) in document.parents.iter_mut().enumerate() {
        let location = format!("parents[{}]", p);
        repair_anchor(&location, &mut parent.id, &parent.title, &taken, &mut seen, &mut diagnostics);

        for (s, section) in parent.sections.iter_mut().enumerate() {
            let location = format!("{}.sections[{}]", location, s);
            repair_anchor(
                &location,
                &mut section.id,
                &section.title,
                &taken,
                &mut seen,
                &mut diagnostics,
            );

            for (b, node) in section.content.iter_mut().enumerate() {
                drop_empty_images(&format!("{}.content[{}]", location, b), node, &mut diagnostics);
            }
        }
    }

    diagnostics
}

fn repair_anchor(
    location: &str,
    id: &mut String,
    title: &str,
    taken: &HashSet<String>,
    seen: &mut HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if id.trim().is_empty() {
        diagnostics.push(Diagnostic::new(location, DiagnosticKind::EmptyId));
        let slug = slugify(title);
        let base = if slug.is_empty() { "section" } else { slug.as_str() };
        *id = free_id(base, taken, seen);
    } else if seen.contains(id.as_str()) {
        diagnostics.push(Diagnostic::new(
            location,
            DiagnosticKind::DuplicateId { id: id.clone() },
        ));
        let base = id.clone();
        *id = free_id(&base, taken, seen);
    }

    seen.insert(id.clone());
}

/// `base` itself, or `base-N` for the smallest N >= 2, that is neither
/// assigned yet nor an id written anywhere in the document.
fn free_id(base: &str, taken: &HashSet<String>, seen: &HashSet<String>) -> String {
    let is_free = |candidate: &str| !seen.contains(candidate) && !taken.contains(candidate);
    if is_free(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| is_free(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

fn drop_empty_images(location: &str, node: &mut ContentNode, diagnostics: &mut Vec<Diagnostic>) {
    match node {
        ContentNode::Paragraph { .. } | ContentNode::Math { .. } => {}
        ContentNode::List { items } => {
            for (i, item) in items.iter_mut().enumerate() {
                let Some(sublist) = item.sublist.as_mut() else {
                    continue;
                };
                for (e, entry) in sublist.iter_mut().enumerate() {
                    if let SublistEntry::Node(nested) = entry {
                        let location = format!("{}.items[{}].sublist[{}]", location, i, e);
                        drop_empty_images(&location, nested, diagnostics);
                    }
                }
            }
        }
        ContentNode::ImageGrid { images, .. } => {
            let mut index = 0;
            images.retain(|image| {
                let keep = !image.image_url.trim().is_empty();
                if !keep {
                    diagnostics.push(Diagnostic::new(
                        format!("{}.images[{}]", location, index),
                        DiagnosticKind::EmptyImageUrl,
                    ));
                }
                index += 1;
                keep
            });
        }
    }
}

/// Generate an anchor slug from a title.
///
/// Lowercases ASCII alphanumerics, turns whitespace, `-` and `_` into single
/// hyphens, and drops everything else.
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
