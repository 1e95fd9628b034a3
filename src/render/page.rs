//! Page assembler: navigation side panel next to the main content stream.

use crate::error::Result;
use crate::model::Document;
use crate::nav::derive_nav;

use super::element::{Element, Tag};
use super::section::compose_parent;
use super::RenderOptions;

/// Assemble the full page tree for a document.
///
/// The document is validated first; an integrity violation aborts assembly.
/// Navigation and content are both derived from the same parent selection,
/// so every sidebar link has a target.
pub fn assemble(document: &Document, options: &RenderOptions) -> Result<Element> {
    document.validate()?;
    let selected = document.select(&options.parents)?;

    let nav = derive_nav(&selected);
    let title = page_title(&selected, options);

    let mut header = Element::node(Tag::Header)
        .with_class("page-header")
        .with_child(Element::node(Tag::H1).with_child(Element::text(title)));
    if let Some(ref subtitle) = selected.metadata.subtitle {
        header = header.with_child(
            Element::node(Tag::P)
                .with_class("subtitle")
                .with_child(Element::text(subtitle)),
        );
    }

    let main = Element::node(Tag::Main)
        .with_class("content")
        .with_child(header)
        .with_children(selected.parents.iter().map(compose_parent));

    let sidebar = Element::node(Tag::Aside)
        .with_class("sidebar")
        .with_child(nav.to_element());

    log::debug!(
        "Assembled page with {} parents and {} sections",
        selected.parent_count(),
        selected.section_count()
    );

    Ok(Element::node(Tag::Div)
        .with_class("page")
        .with_child(sidebar)
        .with_child(main)
        .into())
}

/// Title shown in the page heading.
pub(crate) fn page_title<'a>(document: &'a Document, options: &'a RenderOptions) -> &'a str {
    options
        .page_title
        .as_deref()
        .unwrap_or(&document.metadata.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{ContentNode, Metadata, ParentSection, Section};
    use crate::render::ParentSelection;

    fn sample() -> Document {
        Document::new(
            Metadata::with_title("Face Morphing"),
            vec![
                ParentSection::new(
                    "face-morphing",
                    "Face Morphing",
                    vec![Section::new(
                        "midway-face",
                        "Midway Face",
                        vec![ContentNode::paragraph("Average of two faces.")],
                    )],
                ),
                ParentSection::new(
                    "extra",
                    "Extra",
                    vec![Section::new("class-morphing", "Class Morphing", vec![])],
                ),
            ],
        )
    }

    #[test]
    fn test_assemble_layout() {
        let page = assemble(&sample(), &RenderOptions::default()).unwrap();
        assert_eq!(page.class(), Some("page"));

        let [sidebar, main] = page.children() else {
            panic!("expected sidebar and main");
        };
        assert_eq!(sidebar.tag(), Some(Tag::Aside));
        assert_eq!(main.tag(), Some(Tag::Main));
        assert_eq!(main.children()[0].text_content(), "Face Morphing");

        let ids: Vec<_> = main.children()[1..].iter().filter_map(Element::id).collect();
        assert_eq!(ids, ["face-morphing", "extra"]);
    }

    #[test]
    fn test_every_nav_link_has_a_target() {
        let page = assemble(&sample(), &RenderOptions::default()).unwrap();
        let sidebar = &page.children()[0];
        let main = &page.children()[1];

        let nav = derive_nav(&sample());
        for anchor in nav.anchors() {
            assert!(main.find_by_id(anchor).is_some(), "missing target {}", anchor);
        }
        assert_eq!(sidebar.count(&|e| e.attr("href").is_some()), 4);
    }

    #[test]
    fn test_assemble_selected_parents() {
        let options = RenderOptions::new()
            .with_parents(ParentSelection::Ids(vec!["extra".to_string()]))
            .with_title("Extras");
        let page = assemble(&sample(), &options).unwrap();

        assert!(page.find_by_id("extra").is_some());
        assert!(page.find_by_id("midway-face").is_none());
        assert_eq!(page.count(&|e| e.attr("href").is_some()), 2);
        assert!(page.text_content().starts_with("Extra"));
        assert!(page.text_content().contains("Extras"));
    }

    #[test]
    fn test_assemble_rejects_invalid_document() {
        let mut doc = sample();
        doc.parents[1].sections[0].id = "midway-face".to_string();
        let err = assemble(&doc, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
    }
}
