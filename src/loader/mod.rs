//! Document loading module.

mod json_loader;
mod options;

pub use json_loader::DocumentLoader;
pub use options::{LoadOptions, ValidationMode};
