//! Rendering module: visual tree, page assembly and output formats.

pub mod block;
mod element;
mod html;
mod json;
mod markdown;
mod options;
pub mod page;
mod result;
pub mod section;
mod text;

pub use element::{Element, Node, Tag};
pub use html::{element_to_html, escape_attr, escape_text, to_html, to_html_with_stats, DEFAULT_STYLE};
pub use json::{nav_to_json, to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{
    MathOptions, ParentSelection, RenderOptions, DEFAULT_KATEX_CDN, DEFAULT_KATEX_VERSION,
};
pub use result::{RenderResult, RenderStats};
pub use text::to_text;
