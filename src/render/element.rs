//! Visual tree produced by the renderers.
//!
//! The tree is format-neutral: the HTML writer serializes it, tests inspect
//! it directly. Formula markup and image sources stay opaque leaves that
//! the typesetting and asset collaborators resolve.

/// Element tags used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Generic block container
    Div,
    /// Main content stream
    Main,
    /// Side panel
    Aside,
    /// Navigation block
    Nav,
    /// Page header
    Header,
    /// Anchorable section
    Section,
    /// Page title
    H1,
    /// Parent section title
    H2,
    /// Section title
    H3,
    /// Paragraph
    P,
    /// Ordered list
    Ol,
    /// Bulleted list
    Ul,
    /// List item
    Li,
    /// Captioned figure
    Figure,
    /// Figure caption
    Figcaption,
    /// Hyperlink
    A,
    /// Inline container
    Span,
}

impl Tag {
    /// HTML tag name.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Main => "main",
            Tag::Aside => "aside",
            Tag::Nav => "nav",
            Tag::Header => "header",
            Tag::Section => "section",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::P => "p",
            Tag::Ol => "ol",
            Tag::Ul => "ul",
            Tag::Li => "li",
            Tag::Figure => "figure",
            Tag::Figcaption => "figcaption",
            Tag::A => "a",
            Tag::Span => "span",
        }
    }

    /// Check if this tag is a list container.
    pub fn is_list(self) -> bool {
        matches!(self, Tag::Ol | Tag::Ul)
    }
}

/// A node of the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Verbatim text
    Text(String),

    /// Host for the formula typesetter, carrying the raw markup
    Math(String),

    /// Image whose bytes the asset collaborator serves
    Image {
        /// Resolved asset URL
        src: String,
        /// Alternative text
        alt: String,
    },

    /// Container element
    Node(Node),
}

/// A container element with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Element tag
    pub tag: Tag,

    /// Anchor id
    pub id: Option<String>,

    /// Style class
    pub class: Option<String>,

    /// Other attributes in insertion order
    pub attrs: Vec<(String, String)>,

    /// Child elements in display order
    pub children: Vec<Element>,
}

impl Node {
    /// Create an empty node.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the anchor id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the style class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

impl Element {
    /// Start a container element.
    pub fn node(tag: Tag) -> Node {
        Node::new(tag)
    }

    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    /// Create a formula host.
    pub fn math(markup: impl Into<String>) -> Self {
        Element::Math(markup.into())
    }

    /// Create an image leaf.
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Element::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Tag of a container, `None` for leaves.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Element::Node(node) => Some(node.tag),
            _ => None,
        }
    }

    /// Anchor id of a container.
    pub fn id(&self) -> Option<&str> {
        match self {
            Element::Node(node) => node.id.as_deref(),
            _ => None,
        }
    }

    /// Style class of a container.
    pub fn class(&self) -> Option<&str> {
        match self {
            Element::Node(node) => node.class.as_deref(),
            _ => None,
        }
    }

    /// Attribute value of a container.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Element::Node(node) => node
                .attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Children of a container, empty for leaves.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Node(node) => &node.children,
            _ => &[],
        }
    }

    /// Height of the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Element::depth).max().unwrap_or(0)
    }

    /// Largest number of nested list containers on any path from here.
    pub fn list_depth(&self) -> usize {
        let own = usize::from(self.tag().is_some_and(Tag::is_list));
        own + self
            .children()
            .iter()
            .map(Element::list_depth)
            .max()
            .unwrap_or(0)
    }

    /// Count elements in this subtree (including this one) matching a predicate.
    pub fn count<F>(&self, predicate: &F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        usize::from(predicate(self))
            + self
                .children()
                .iter()
                .map(|child| child.count(predicate))
                .sum::<usize>()
    }

    /// Find the first element in this subtree with the given anchor id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_id(id))
    }

    /// Concatenated text and formula markup of this subtree.
    pub fn text_content(&self) -> String {
        let mut output = String::new();
        self.collect_text(&mut output);
        output
    }

    fn collect_text(&self, output: &mut String) {
        match self {
            Element::Text(text) | Element::Math(text) => output.push_str(text),
            Element::Image { .. } => {}
            Element::Node(node) => {
                for child in &node.children {
                    child.collect_text(output);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::node(Tag::Section)
            .with_id("midway-face")
            .with_child(Element::node(Tag::H3).with_child(Element::text("Midway Face")))
            .with_child(
                Element::node(Tag::Ol).with_child(
                    Element::node(Tag::Li)
                        .with_child(Element::text("Warp"))
                        .with_child(
                            Element::node(Tag::Ul)
                                .with_child(Element::node(Tag::Li).with_child(Element::math("\\( A \\)"))),
                        ),
                ),
            )
            .into()
    }

    #[test]
    fn test_depth_and_list_depth() {
        let element = sample();
        // section > ol > li > ul > li > math
        assert_eq!(element.depth(), 6);
        assert_eq!(element.list_depth(), 2);
        assert_eq!(Element::text("leaf").depth(), 1);
    }

    #[test]
    fn test_find_and_count() {
        let element = sample();
        assert!(element.find_by_id("midway-face").is_some());
        assert!(element.find_by_id("missing").is_none());
        assert_eq!(element.count(&|e| e.tag() == Some(Tag::Li)), 2);
        assert_eq!(element.count(&|e| matches!(e, Element::Math(_))), 1);
    }

    #[test]
    fn test_text_content() {
        assert_eq!(sample().text_content(), "Midway FaceWarp\\( A \\)");
    }

    #[test]
    fn test_attributes() {
        let element: Element = Element::node(Tag::A)
            .with_class("nav-link")
            .with_attr("href", "#pca")
            .into();
        assert_eq!(element.attr("href"), Some("#pca"));
        assert_eq!(element.class(), Some("nav-link"));
        assert_eq!(element.attr("title"), None);
        assert!(Element::text("x").children().is_empty());
    }
}
