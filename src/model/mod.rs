//! Document model types for the report content tree.
//!
//! A [`Document`] is an ordered list of [`ParentSection`]s, each holding
//! [`Section`]s made of [`ContentNode`] blocks. The model is plain data: it
//! carries no rendering behavior and is read-only once validated.

mod asset;
mod content;
mod document;

pub use asset::AssetRoot;
pub use content::{ContentNode, ImageRef, ListItem, SublistEntry};
pub use document::{Document, Metadata, ParentSection, Section};
