//! Plain text rendering for report documents.

use crate::error::Result;
use crate::model::{ContentNode, Document, ListItem, SublistEntry};

use super::page::page_title;
use super::RenderOptions;

/// Convert a document to plain text.
///
/// Parent titles are underlined with `=`, section titles with `-`. Formula
/// markup is kept verbatim and each image is listed with its URL.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    doc.validate()?;
    let selected = doc.select(&options.parents)?;
    let mut output = String::new();

    let title = page_title(&selected, options);
    if !title.is_empty() {
        output.push_str(title);
        output.push_str("\n\n");
    }

    if options.include_toc {
        output.push_str("Contents\n");
        for parent in &selected.parents {
            output.push_str(&format!("  {}\n", parent.title));
            for section in &parent.sections {
                output.push_str(&format!("    {}\n", section.title));
            }
        }
        output.push('\n');
    }

    for parent in &selected.parents {
        push_heading(&mut output, &parent.title, '=');
        for section in &parent.sections {
            push_heading(&mut output, &section.title, '-');
            for node in &section.content {
                let lines = block_lines(node, options.list_marker);
                if lines.is_empty() {
                    continue;
                }
                output.push_str(&lines.join("\n"));
                output.push_str("\n\n");
            }
        }
    }

    Ok(output.trim().to_string())
}

fn push_heading(output: &mut String, title: &str, underline: char) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&underline.to_string().repeat(title.chars().count()));
    output.push_str("\n\n");
}

fn block_lines(node: &ContentNode, marker: char) -> Vec<String> {
    match node {
        ContentNode::Paragraph { text } | ContentNode::Math { text } => {
            text.lines().map(str::to_string).collect()
        }
        ContentNode::List { items } => list_lines(items, marker),
        ContentNode::ImageGrid { images, .. } => images
            .iter()
            .map(|image| format!("[image: {}] {}", image.title, image.image_url))
            .collect(),
    }
}

fn list_lines(items: &[ListItem], marker: char) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let number = format!("{}. ", i + 1);
        let indent = " ".repeat(number.len());
        lines.push(format!("{}{}", number, item.text));

        for entry in item.entries() {
            let nested = match entry {
                SublistEntry::Text(text) => vec![text.clone()],
                SublistEntry::Node(node) => block_lines(node, marker),
            };
            for (j, line) in nested.into_iter().enumerate() {
                if j == 0 {
                    lines.push(format!("{}{} {}", indent, marker, line));
                } else {
                    lines.push(format!("{}  {}", indent, line));
                }
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageRef, Metadata, ParentSection, Section};

    fn sample() -> Document {
        Document::new(
            Metadata::with_title("Face Morphing"),
            vec![ParentSection::new(
                "mean-face",
                "Mean Face",
                vec![Section::new(
                    "mean-face-population",
                    "Population",
                    vec![
                        ContentNode::paragraph("Hello, world!"),
                        ContentNode::list(vec![ListItem::with_sublist(
                            "Warp",
                            vec![ContentNode::math("\\( A \\)").into()],
                        )]),
                        ContentNode::image_grid(2, vec![ImageRef::new("Mean", "/images/mean.jpg")])
                            .unwrap(),
                    ],
                )],
            )],
        )
    }

    #[test]
    fn test_to_text() {
        let result = to_text(&sample(), &RenderOptions::default()).unwrap();
        let expected = "Face Morphing\n\nMean Face\n=========\n\nPopulation\n----------\n\n\
Hello, world!\n\n1. Warp\n   - \\( A \\)\n\n[image: Mean] /images/mean.jpg";
        assert_eq!(result, expected);
    }

    #[test]
    fn test_to_text_toc() {
        let options = RenderOptions::new().with_toc(true);
        let result = to_text(&sample(), &options).unwrap();
        assert!(result.contains("Contents\n  Mean Face\n    Population\n"));
    }
}
