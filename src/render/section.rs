//! Section composer.

use crate::model::{ParentSection, Section};

use super::block;
use super::element::{Element, Tag};

/// Compose a section: an anchorable title followed by its blocks in order.
pub fn compose(section: &Section) -> Element {
    log::trace!(
        "Composing section '{}' with {} blocks",
        section.id,
        section.content.len()
    );
    Element::node(Tag::Section)
        .with_id(&section.id)
        .with_class("section")
        .with_child(Element::node(Tag::H3).with_child(Element::text(&section.title)))
        .with_children(section.content.iter().map(block::render))
        .into()
}

/// Compose a parent section: its title followed by every composed section.
pub fn compose_parent(parent: &ParentSection) -> Element {
    Element::node(Tag::Section)
        .with_id(&parent.id)
        .with_class("parent-section")
        .with_child(Element::node(Tag::H2).with_child(Element::text(&parent.title)))
        .with_children(parent.sections.iter().map(compose))
        .into()
}
