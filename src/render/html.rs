//! HTML rendering: a complete single-page document.

use crate::error::Result;
use crate::model::Document;

use super::element::{Element, Node, Tag};
use super::page::{assemble, page_title};
use super::{MathOptions, RenderOptions, RenderResult, RenderStats};

/// Stylesheet embedded when `inline_style` is set.
pub const DEFAULT_STYLE: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; line-height: 1.6; color: #222; }
.page { display: flex; align-items: flex-start; }
.sidebar { position: sticky; top: 0; flex: 0 0 16rem; max-height: 100vh; overflow-y: auto; padding: 1rem; border-right: 1px solid #ddd; }
.sidebar ul { list-style: none; padding-left: 0.75rem; margin: 0; }
.sidebar a { color: inherit; text-decoration: none; }
.sidebar a:hover { text-decoration: underline; }
.content { flex: 1; min-width: 0; padding: 1rem 2rem; }
.section { scroll-margin-top: 1rem; }
.image-grid { display: grid; gap: 1rem; margin: 1rem 0; }
.image-cell { margin: 0; text-align: center; }
.image-cell img { max-width: 100%; height: auto; }
.math { overflow-x: auto; }
";

/// Convert a document to a complete HTML page.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    let page = assemble(doc, options)?;
    Ok(write_page(doc, options, &page))
}

/// Convert a document to HTML with statistics.
///
/// Word counts come from the same assembled page that is serialized.
pub fn to_html_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let page = assemble(doc, options)?;
    let content = write_page(doc, options, &page);
    let mut stats = RenderStats::collect(&doc.select(&options.parents)?);
    stats.count_text(&page.text_content());
    Ok(RenderResult::new(content, doc.metadata.clone(), stats))
}

fn write_page(doc: &Document, options: &RenderOptions, page: &Element) -> String {
    let mut output = String::with_capacity(16 * 1024);
    output.push_str("<!DOCTYPE html>\n");
    output.push_str(&format!("<html lang=\"{}\">\n", escape_attr(&options.lang)));
    write_head(&mut output, doc, page_title(doc, options), options);
    output.push_str("<body>\n");
    write_element(&mut output, page);
    output.push_str("</body>\n</html>\n");
    output
}

/// Serialize a visual tree fragment to HTML.
pub fn element_to_html(element: &Element) -> String {
    let mut output = String::new();
    write_element(&mut output, element);
    output
}

fn write_head(output: &mut String, doc: &Document, title: &str, options: &RenderOptions) {
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_text(title)));

    if let Some(ref description) = doc.metadata.description {
        output.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_attr(description)
        ));
    }
    if let Some(ref author) = doc.metadata.author {
        output.push_str(&format!(
            "<meta name=\"author\" content=\"{}\">\n",
            escape_attr(author)
        ));
    }

    if options.math.enabled {
        write_math_head(output, &options.math);
    }
    if let Some(ref href) = options.stylesheet {
        output.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_attr(href)
        ));
    }
    if options.inline_style {
        output.push_str("<style>\n");
        output.push_str(DEFAULT_STYLE);
        output.push_str("</style>\n");
    }

    output.push_str("</head>\n");
}

fn write_math_head(output: &mut String, math: &MathOptions) {
    output.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}\">\n",
        escape_attr(&math.asset_url("katex.min.css"))
    ));
    output.push_str(&format!(
        "<script defer src=\"{}\"></script>\n",
        escape_attr(&math.asset_url("katex.min.js"))
    ));
    output.push_str(&format!(
        "<script defer src=\"{}\" onload=\"renderMathInElement(document.body, {{delimiters: [{{left: '\\\\[', right: '\\\\]', display: true}}, {{left: '\\\\(', right: '\\\\)', display: false}}]}});\"></script>\n",
        escape_attr(&math.asset_url("contrib/auto-render.min.js"))
    ));
}

fn write_element(output: &mut String, element: &Element) {
    match element {
        Element::Text(text) => output.push_str(&escape_text(text)),
        Element::Math(markup) => {
            output.push_str("<span class=\"math\">");
            output.push_str(&escape_text(markup));
            output.push_str("</span>");
        }
        Element::Image { src, alt } => {
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape_attr(src),
                escape_attr(alt)
            ));
        }
        Element::Node(node) => write_node(output, node),
    }
}

fn write_node(output: &mut String, node: &Node) {
    let name = node.tag.name();
    let block = is_block(node.tag);

    output.push('<');
    output.push_str(name);
    if let Some(ref id) = node.id {
        output.push_str(&format!(" id=\"{}\"", escape_attr(id)));
    }
    if let Some(ref class) = node.class {
        output.push_str(&format!(" class=\"{}\"", escape_attr(class)));
    }
    for (attr, value) in &node.attrs {
        output.push_str(&format!(" {}=\"{}\"", attr, escape_attr(value)));
    }
    output.push('>');
    if block {
        output.push('\n');
    }

    for child in &node.children {
        write_element(output, child);
        if block && !output.ends_with('\n') {
            output.push('\n');
        }
    }

    output.push_str("</");
    output.push_str(name);
    output.push('>');
    if block {
        output.push('\n');
    }
}

/// Containers whose children are laid out one per line.
fn is_block(tag: Tag) -> bool {
    match tag {
        Tag::Div
        | Tag::Main
        | Tag::Aside
        | Tag::Nav
        | Tag::Header
        | Tag::Section
        | Tag::Ol
        | Tag::Ul
        | Tag::Figure => true,
        Tag::H1
        | Tag::H2
        | Tag::H3
        | Tag::P
        | Tag::Li
        | Tag::Figcaption
        | Tag::A
        | Tag::Span => false,
    }
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value.
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
