//! Abstract render trees and their materialization into a document.

pub mod materialize;

use std::collections::BTreeMap;

pub use materialize::DomMaterializer;
pub use materialize::Materializer;

/// Markup that came pre-sanitized from a trusted source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wraps markup the backend has already sanitized. Never pass user input here.
    pub fn from_sanitized(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VChild {
    Node(VNode),
    Text(String),
}

/// Immutable description of one element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    inner_html: Option<TrustedHtml>,
    children: Vec<VChild>,
}

impl VNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            inner_html: None,
            children: Vec::new(),
        }
    }

    /// Shorthand for `VNode::new(tag).attr("class", class)`.
    pub fn with_class(tag: &str, class: &str) -> Self {
        Self::new(tag).attr("class", class)
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(VChild::Node(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children
            .extend(children.into_iter().map(VChild::Node));
        self
    }

    /// Appends a plain-text leaf; it is never interpreted as markup.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(VChild::Text(text.into()));
        self
    }

    /// Sets trusted markup that replaces this node's children when materialized.
    pub fn inner_html(mut self, markup: TrustedHtml) -> Self {
        self.inner_html = Some(markup);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn trusted_html(&self) -> Option<&TrustedHtml> {
        self.inner_html.as_ref()
    }

    pub fn child_nodes(&self) -> &[VChild] {
        &self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|item| item == class))
    }

    /// Concatenated text leaves of the subtree. Trusted markup is not included.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Nodes of the subtree (including `self`) carrying `class`, in pre-order.
    pub fn find_all_by_class(&self, class: &str) -> Vec<&VNode> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    /// Serializes the tree the same way a materialized copy would serialize.
    pub fn to_html(&self) -> String {
        let mut document = hq_dom::Document::new();
        match DomMaterializer.materialize(&mut document, self) {
            Ok(node) => document.outer_html(node),
            Err(error) => {
                tracing::warn!(%error, "render tree failed to serialize");
                String::new()
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                VChild::Text(text) => out.push_str(text),
                VChild::Node(node) => node.collect_text(out),
            }
        }
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a VNode>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            if let VChild::Node(node) = child {
                node.collect_by_class(class, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TrustedHtml;
    use super::VNode;

    #[test]
    fn attribute_order_does_not_affect_equality() {
        let left = VNode::new("div").attr("class", "a").attr("title", "t");
        let right = VNode::new("div").attr("title", "t").attr("class", "a");
        assert_eq!(left, right);
    }

    #[test]
    fn text_content_skips_trusted_markup() {
        let tree = VNode::with_class("div", "post")
            .child(VNode::new("span").text("3"))
            .child(VNode::new("div").inner_html(TrustedHtml::from_sanitized("<p>body</p>")));
        assert_eq!(tree.text_content(), "3");
    }

    #[test]
    fn find_all_by_class_includes_root_and_preserves_order() {
        let tree = VNode::with_class("div", "container")
            .child(VNode::with_class("div", "container").text("a"))
            .child(VNode::with_class("div", "other container").text("b"));
        let found = tree.find_all_by_class("container");
        assert_eq!(found.len(), 3);
        assert_eq!(found[1].text_content(), "a");
        assert_eq!(found[2].text_content(), "b");
    }

    #[test]
    fn to_html_escapes_text_and_keeps_trusted_markup() {
        let tree = VNode::with_class("div", "js-inline-preview")
            .child(VNode::new("h3").text("<b>not bold</b>"))
            .child(VNode::new("div").inner_html(TrustedHtml::from_sanitized("<b>bold</b>")));
        assert_eq!(
            tree.to_html(),
            "<div class=\"js-inline-preview\"><h3>&lt;b&gt;not bold&lt;/b&gt;</h3><div><b>bold</b></div></div>"
        );
    }
}
