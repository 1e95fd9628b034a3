//! Error types for morphpage library.

use std::io;
use thiserror::Error;

use crate::validate::Diagnostic;

/// Result type alias for morphpage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, validating, or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document source could not be decoded.
    #[error("Document parse error: {0}")]
    Parse(String),

    /// The document violates a model invariant (duplicate id, malformed block, ...).
    #[error("{}", describe_integrity(.0))]
    Integrity(Vec<Diagnostic>),

    /// A parent section id was requested that the document does not contain.
    #[error("Unknown parent section: {0}")]
    UnknownParent(String),

    /// Error during rendering (HTML, Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Diagnostics carried by an integrity error, empty for every other kind.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Integrity(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Error::Io(err.into());
        }
        Error::Parse(err.to_string())
    }
}

fn describe_integrity(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "Document integrity violation".to_string(),
        [only] => format!("Document integrity violation: {}", only),
        [first, rest @ ..] => format!(
            "Document integrity violation: {} (and {} more)",
            first,
            rest.len()
        ),
    }
}
