//! Block renderer: content block to visual tree.

use crate::model::{ContentNode, ImageRef, ListItem, SublistEntry};

use super::element::{Element, Node, Tag};

/// Render one content block.
///
/// Pure and deterministic. Lists recurse through this same function for
/// every node entry of a sublist, to any depth.
pub fn render(node: &ContentNode) -> Element {
    match node {
        ContentNode::Paragraph { text } => Element::node(Tag::P)
            .with_class("paragraph")
            .with_child(Element::text(text))
            .into(),
        ContentNode::Math { text } => Element::math(text),
        ContentNode::List { items } => render_list(items).into(),
        ContentNode::ImageGrid { columns, images } => render_grid(columns.get(), images).into(),
    }
}

fn render_list(items: &[ListItem]) -> Node {
    log::trace!("Rendering list with {} items", items.len());
    Element::node(Tag::Ol)
        .with_class("list")
        .with_children(items.iter().map(render_item))
}

fn render_item(item: &ListItem) -> Node {
    let label = Element::node(Tag::Span)
        .with_class("item-label")
        .with_child(Element::text(&item.text));
    let node = Element::node(Tag::Li).with_child(label);

    match &item.sublist {
        Some(entries) => node.with_child(
            Element::node(Tag::Ul)
                .with_class("sublist")
                .with_children(entries.iter().map(render_entry)),
        ),
        None => node,
    }
}

fn render_entry(entry: &SublistEntry) -> Node {
    let item = Element::node(Tag::Li);
    match entry {
        SublistEntry::Text(text) => item.with_child(Element::text(text)),
        SublistEntry::Node(node) => item.with_child(render(node)),
    }
}

/// Column template for a grid of `columns` equal tracks.
pub fn grid_template(columns: u32) -> String {
    format!("grid-template-columns: repeat({}, minmax(0, 1fr))", columns)
}

fn render_grid(columns: u32, images: &[ImageRef]) -> Node {
    log::trace!("Rendering {}-column grid with {} images", columns, images.len());
    Element::node(Tag::Div)
        .with_class("image-grid")
        .with_attr("data-columns", columns.to_string())
        .with_attr("style", grid_template(columns))
        .with_children(images.iter().map(render_cell))
}

fn render_cell(image: &ImageRef) -> Node {
    Element::node(Tag::Figure)
        .with_class("image-cell")
        .with_child(Element::image(&image.image_url, &image.title))
        .with_child(Element::node(Tag::Figcaption).with_child(Element::text(&image.title)))
}
