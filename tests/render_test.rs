//! Integration tests for the block renderer, section composer and exporters.

use morphpage::render::{self, block, section, Element, RenderOptions, Tag};
use morphpage::{builtin_report, ContentNode, ImageRef, ListItem, Section, SublistEntry};

/// Three levels of sublists mixing plain entries and nested blocks.
fn three_level_list() -> ContentNode {
    let level3 = ContentNode::list(vec![ListItem::with_sublist(
        "Level three",
        vec!["leaf".into(), ContentNode::math("\\( c \\)").into()],
    )]);
    let level2 = ContentNode::list(vec![ListItem::with_sublist(
        "Level two",
        vec!["second text".into(), level3.into()],
    )]);
    ContentNode::list(vec![
        ListItem::with_sublist(
            "Level one",
            vec!["first text".into(), level2.into(), ContentNode::math("\\( a \\)").into()],
        ),
        ListItem::new("Sibling"),
    ])
}

#[test]
fn test_render_is_deterministic() {
    let doc = builtin_report();
    for node in doc.sections().flat_map(|s| s.content.iter()) {
        assert_eq!(block::render(node), block::render(node));
    }

    let options = RenderOptions::default();
    assert_eq!(
        render::to_html(&doc, &options).unwrap(),
        render::to_html(&doc, &options).unwrap()
    );
    assert_eq!(
        render::to_markdown(&doc, &options).unwrap(),
        render::to_markdown(&doc, &options).unwrap()
    );
}

#[test]
fn test_recursive_list_fidelity() {
    let node = three_level_list();
    let element = block::render(&node);

    // One ordered list per list block, one bullet list per sublist.
    assert_eq!(node.list_depth(), 6);
    assert_eq!(element.list_depth(), node.list_depth());

    // Plain entries become items holding only their text.
    let plain_items = element.count(&|e| {
        e.tag() == Some(Tag::Li) && matches!(e.children(), [Element::Text(_)])
    });
    assert_eq!(plain_items, 3);

    // Nested nodes go through the same renderer.
    assert_eq!(element.count(&|e| matches!(e, Element::Math(_))), 2);
    assert_eq!(element.count(&|e| e.tag() == Some(Tag::Ol)), 3);

    let ContentNode::List { items } = &node else {
        panic!("expected list, got {}", node.kind());
    };
    let SublistEntry::Node(level2) = &items[0].entries()[1] else {
        panic!("expected nested node");
    };
    let nested = &element.children()[0].children()[1].children()[1].children()[0];
    assert_eq!(nested, &block::render(level2));
}

#[test]
fn test_grid_integrity() {
    let images: Vec<_> = (0..9)
        .map(|i| ImageRef::new(format!("Face {}", i), format!("/images/face{}.jpg", i)))
        .collect();
    let node = ContentNode::image_grid(4, images.clone()).unwrap();
    let element = block::render(&node);

    let cells = element.children();
    assert_eq!(cells.len(), 9);
    for (cell, image) in cells.iter().zip(&images) {
        assert_eq!(cell.tag(), Some(Tag::Figure));
        assert_eq!(
            cell.children()[0],
            Element::image(&image.image_url, &image.title)
        );
    }
    assert_eq!(
        element.attr("style"),
        Some("grid-template-columns: repeat(4, minmax(0, 1fr))")
    );
}

#[test]
fn test_section_order_preservation() {
    let content = vec![
        ContentNode::math("\\( x \\)"),
        three_level_list(),
        ContentNode::paragraph("after"),
        ContentNode::image_grid(1, vec![]).unwrap(),
    ];
    let section = Section::new("order", "Order", content.clone());
    let element = section::compose(&section);

    let rendered: Vec<_> = content.iter().map(block::render).collect();
    assert_eq!(element.children()[1..], rendered[..]);
}

#[test]
fn test_page_order_matches_document() {
    let doc = builtin_report();
    let page = render::page::assemble(&doc, &RenderOptions::default()).unwrap();
    let main = &page.children()[1];

    let parent_ids: Vec<_> = main.children()[1..].iter().filter_map(Element::id).collect();
    let expected: Vec<_> = doc.parents.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(parent_ids, expected);

    for (rendered, parent) in main.children()[1..].iter().zip(&doc.parents) {
        let section_ids: Vec<_> = rendered.children()[1..]
            .iter()
            .filter_map(Element::id)
            .collect();
        let expected: Vec<_> = parent.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(section_ids, expected);
    }
}

#[test]
fn test_builtin_html() {
    let html = render::to_html(&builtin_report(), &RenderOptions::default()).unwrap();

    for id in ["midway-face", "mean-face-population", "pca-rationale", "modify-a-face"] {
        assert!(html.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        assert!(html.contains(&format!("href=\"#{}\"", id)), "missing link {}", id);
    }
    assert!(html.contains("<span class=\"math\">\\( X = U \\Sigma V^T \\)</span>"));
    assert!(html.contains("repeat(5, minmax(0, 1fr))"));
    assert!(html.contains("src=\"/images/comp3_-5.jpg\""));
    assert_eq!(html.matches("<figure").count(), 51);
}

#[test]
fn test_builtin_markdown_and_text() {
    let doc = builtin_report();
    let options = RenderOptions::new().with_toc(true);

    let md = render::to_markdown(&doc, &options).unwrap();
    assert!(md.contains("### <a id=\"pca-rationale\"></a>Rationale"));
    assert!(md.contains("   - \\( C = \\frac{1}{n} X^T X \\)"));
    assert!(md.contains("- [Extra](#extra)"));

    let text = render::to_text(&doc, &options).unwrap();
    let underline = "=".repeat("Principal Component Analysis".len());
    assert!(text.contains(&format!("Principal Component Analysis\n{}", underline)));
    assert!(text.contains("[image: Interactive tool] /images/output.gif"));
}

#[test]
fn test_html_with_stats() {
    let result =
        render::to_html_with_stats(&builtin_report(), &RenderOptions::default()).unwrap();
    assert_eq!(result.stats.parent_count, 4);
    assert_eq!(result.stats.section_count, 8);
    assert_eq!(result.stats.math_count, 7);
    assert!(result.content.starts_with("<!DOCTYPE html>"));
}
