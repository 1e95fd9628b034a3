//! Markdown rendering for report documents.

use crate::error::Result;
use crate::model::{ContentNode, Document, ImageRef, ListItem, ParentSection, Section, SublistEntry};
use crate::nav::derive_nav;

use super::html::escape_attr;
use super::page::page_title;
use super::{RenderOptions, RenderResult, RenderStats};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: RenderStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        self.stats.count_text(&content);
        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        doc.validate()?;
        let selected = doc.select(&self.options.parents)?;
        if self.options.collect_stats {
            self.stats = RenderStats::collect(&selected);
        }

        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&selected.metadata.to_yaml_frontmatter());
            output.push('\n');
        }

        let title = page_title(&selected, &self.options);
        if !title.is_empty() {
            output.push_str(&format!("# {}\n\n", self.escape(title)));
        }
        if let Some(ref subtitle) = selected.metadata.subtitle {
            output.push_str(&format!("*{}*\n\n", self.escape(subtitle)));
        }

        if self.options.include_toc {
            output.push_str("## Contents\n\n");
            output.push_str(&derive_nav(&selected).to_markdown());
            output.push('\n');
        }

        for parent in &selected.parents {
            self.render_parent(&mut output, parent);
        }

        log::debug!("Rendered {} bytes of Markdown", output.len());
        Ok(output.trim().to_string())
    }

    fn render_parent(&self, output: &mut String, parent: &ParentSection) {
        output.push_str(&format!(
            "## <a id=\"{}\"></a>{}\n\n",
            escape_attr(&parent.id),
            self.escape(&parent.title)
        ));
        for section in &parent.sections {
            self.render_section(output, section);
        }
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        output.push_str(&format!(
            "### <a id=\"{}\"></a>{}\n\n",
            escape_attr(&section.id),
            self.escape(&section.title)
        ));
        for node in &section.content {
            let lines = self.block_lines(node);
            if lines.is_empty() {
                continue;
            }
            output.push_str(&lines.join("\n"));
            output.push_str("\n\n");
        }
    }

    /// Lines of one block, without indentation.
    fn block_lines(&self, node: &ContentNode) -> Vec<String> {
        match node {
            ContentNode::Paragraph { text } => text.lines().map(|line| self.escape(line)).collect(),
            ContentNode::Math { text } => text.lines().map(str::to_string).collect(),
            ContentNode::List { items } => self.list_lines(items),
            ContentNode::ImageGrid { columns, images } => self.grid_lines(columns.get(), images),
        }
    }

    fn list_lines(&self, items: &[ListItem]) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let marker = format!("{}. ", i + 1);
            let indent = " ".repeat(marker.len());
            lines.push(format!("{}{}", marker, self.escape(&item.text)));

            for entry in item.entries() {
                let entry_lines = match entry {
                    SublistEntry::Text(text) => vec![self.escape(text)],
                    SublistEntry::Node(nested) => self.block_lines(nested),
                };
                push_bullet(&mut lines, &indent, self.options.list_marker, entry_lines);
            }
        }
        lines
    }

    fn grid_lines(&self, columns: u32, images: &[ImageRef]) -> Vec<String> {
        if images.is_empty() {
            return Vec::new();
        }
        let columns = columns as usize;
        let mut lines = vec![
            format!("|{}", "   |".repeat(columns)),
            format!("|{}", " --- |".repeat(columns)),
        ];

        for row in images.chunks(columns) {
            let mut line = String::from("|");
            for image in row {
                let title = self.escape(&image.title);
                line.push_str(&format!(
                    " ![{}]({})<br>{} |",
                    title,
                    link_destination(&image.image_url),
                    title
                ));
            }
            line.push_str(&"   |".repeat(columns - row.len()));
            lines.push(line);
        }
        lines
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Append `entry` as a bullet under an item whose content starts at `indent`.
fn push_bullet(lines: &mut Vec<String>, indent: &str, marker: char, entry: Vec<String>) {
    let mut entry = entry.into_iter();
    let first = entry.next().unwrap_or_default();
    lines.push(format!("{}{} {}", indent, marker, first));
    for line in entry {
        if line.is_empty() {
            lines.push(line);
        } else {
            lines.push(format!("{}  {}", indent, line));
        }
    }
}

/// Link destination in angle brackets, so spaces and parentheses survive.
fn link_destination(url: &str) -> String {
    let mut result = String::with_capacity(url.len() + 2);
    result.push('<');
    for c in url.chars() {
        if matches!(c, '<' | '>' | '|' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('>');
    result
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Core formatting that must be escaped
            '\\' | '`' | '*' | '_' |
            // Brackets for links/images, pipe for tables
            '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
