//! Navigation tree derived from a document.
//!
//! The tree is a pure projection of the parent/section structure with every
//! content payload dropped. Entries link with same-page anchors (`#<id>`).

use serde::{Deserialize, Serialize};

use crate::model::Document;
use crate::render::{Element, Tag};

/// Table of contents: one group per parent section, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTree {
    /// Navigation groups
    pub groups: Vec<NavGroup>,
}

/// A parent section and the sections it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Anchor id of the parent section
    pub parent_id: String,

    /// Parent section title
    pub parent_title: String,

    /// Section entries in document order
    pub children: Vec<NavEntry>,
}

/// A single jump target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Anchor id of the section
    pub section_id: String,

    /// Section title
    pub section_title: String,
}

/// Project a document onto its navigation tree.
pub fn derive_nav(document: &Document) -> NavTree {
    NavTree {
        groups: document
            .parents
            .iter()
            .map(|parent| NavGroup {
                parent_id: parent.id.clone(),
                parent_title: parent.title.clone(),
                children: parent
                    .sections
                    .iter()
                    .map(|section| NavEntry {
                        section_id: section.id.clone(),
                        section_title: section.title.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

impl NavTree {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the tree has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of section entries.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.children.len()).sum()
    }

    /// Every anchor the tree links to, groups first within each group.
    pub fn anchors(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| {
                std::iter::once(g.parent_id.as_str())
                    .chain(g.children.iter().map(|c| c.section_id.as_str()))
            })
            .collect()
    }

    /// Render the tree as a sidebar navigation list.
    pub fn to_element(&self) -> Element {
        let groups = self.groups.iter().map(|group| {
            let entries = group.children.iter().map(|entry| {
                Element::node(Tag::Li).with_child(anchor_link(&entry.href(), &entry.section_title))
            });

            Element::node(Tag::Li)
                .with_class("nav-group")
                .with_child(anchor_link(&group.href(), &group.parent_title))
                .with_child(
                    Element::node(Tag::Ul)
                        .with_class("nav-sections")
                        .with_children(entries),
                )
        });

        Element::node(Tag::Nav)
            .with_class("nav")
            .with_child(Element::node(Tag::Ul).with_class("nav-groups").with_children(groups))
            .into()
    }

    /// Render the tree as a nested Markdown bullet list of anchor links.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        for group in &self.groups {
            output.push_str(&format!("- [{}]({})\n", group.parent_title, group.href()));
            for entry in &group.children {
                output.push_str(&format!("  - [{}]({})\n", entry.section_title, entry.href()));
            }
        }
        output
    }
}

impl NavGroup {
    /// Same-page link to the parent section.
    pub fn href(&self) -> String {
        format!("#{}", self.parent_id)
    }
}

impl NavEntry {
    /// Same-page link to the section.
    pub fn href(&self) -> String {
        format!("#{}", self.section_id)
    }
}

fn anchor_link(href: &str, label: &str) -> Element {
    Element::node(Tag::A)
        .with_attr("href", href)
        .with_child(Element::text(label))
        .into()
}
