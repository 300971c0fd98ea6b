//! DOM tree data structures.

pub mod event;
pub mod selector;
mod serialize;

use hq_core::PreviewError;
use hq_core::PreviewResult;

pub use event::Event;
pub use event::EventKind;
pub use event::EventTarget;
pub use event::ListenerId;
pub use selector::Selector;
pub use serialize::escape_attribute;
pub use serialize::escape_text;

/// ID used to address nodes in the DOM arena.
pub type NodeId = u64;

/// Payload carried by one arena slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
    /// Pre-sanitized markup serialized verbatim.
    Markup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|item| item == class))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document with an `html > body` skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    root: NodeId,
    body: NodeId,
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut document = Self {
            title: String::new(),
            root: 0,
            body: 0,
            nodes: Vec::new(),
        };
        let root = document.create_element("html");
        let body = document.create_element("body");
        document.link(root, body);
        document.root = root;
        document.body = body;
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_markup(&mut self, markup: impl Into<String>) -> NodeId {
        self.push(NodeData::Markup(markup.into()))
    }

    pub fn data(&self, node: NodeId) -> PreviewResult<&NodeData> {
        self.node(node).map(|slot| &slot.data)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.node(node).ok()?.data {
            NodeData::Element(ref element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag_name.as_str())
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attribute(name)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.has_class(class))
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> PreviewResult<()> {
        let value = value.into();
        let slot = self.node_mut(node)?;
        let NodeData::Element(element) = &mut slot.data else {
            return Err(PreviewError::new(
                "dom.not_an_element",
                format!("node {node} cannot carry attributes"),
            ));
        };

        match element
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => element.attributes.push((name.to_ascii_lowercase(), value)),
        }
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).ok()?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// Appends `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> PreviewResult<()> {
        self.node(child)?;
        if !matches!(self.node(parent)?.data, NodeData::Element(_)) {
            return Err(PreviewError::new(
                "dom.not_an_element",
                format!("node {parent} cannot have children"),
            ));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(PreviewError::new(
                "dom.hierarchy",
                format!("appending node {child} under {parent} would create a cycle"),
            ));
        }

        if let Some(previous) = self.parent(child) {
            self.unlink(previous, child);
        }
        self.link(parent, child);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> PreviewResult<()> {
        self.node(parent)?;
        if self.parent(child) != Some(parent) {
            return Err(PreviewError::new(
                "dom.not_a_child",
                format!("node {child} is not a child of {parent}"),
            ));
        }
        self.unlink(parent, child);
        Ok(())
    }

    /// True when the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.is_ancestor(self.root, node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Element descendants of `node` (excluding itself) carrying `class`, in document order.
    pub fn find_all_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.has_class(current, class) {
                found.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        found
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.element(node)
            .is_some_and(|element| selector.matches(element))
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        serialize::write_node(self, node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Ok(slot) = self.node(node) else {
            return;
        };
        match &slot.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Markup(markup) => out.push_str(&serialize::strip_tags(markup)),
            NodeData::Element(_) => {
                for child in &slot.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() as NodeId
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(slot) = self.node_mut(parent) {
            slot.children.push(child);
        }
        if let Ok(slot) = self.node_mut(child) {
            slot.parent = Some(parent);
        }
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(slot) = self.node_mut(parent) {
            slot.children.retain(|candidate| *candidate != child);
        }
        if let Ok(slot) = self.node_mut(child) {
            slot.parent = None;
        }
    }

    fn node(&self, node: NodeId) -> PreviewResult<&Node> {
        node.checked_sub(1)
            .and_then(|index| self.nodes.get(index as usize))
            .ok_or_else(|| missing(node))
    }

    fn node_mut(&mut self, node: NodeId) -> PreviewResult<&mut Node> {
        node.checked_sub(1)
            .and_then(|index| self.nodes.get_mut(index as usize))
            .ok_or_else(|| missing(node))
    }
}

fn missing(node: NodeId) -> PreviewError {
    PreviewError::new("dom.node_missing", format!("node {node} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::Document;
    use super::NodeData;

    #[test]
    fn new_document_has_empty_body_under_root() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
        assert_eq!(doc.child_count(doc.body()), 0);
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn append_and_remove_round_trip_keeps_node_in_arena() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(doc.append_child(doc.body(), div).is_ok());
        assert!(doc.is_connected(div));

        assert!(doc.remove_child(doc.body(), div).is_ok());
        assert!(!doc.is_connected(div));
        assert_eq!(doc.parent(div), None);
        assert!(matches!(doc.data(div), Ok(NodeData::Element(_))));
    }

    #[test]
    fn remove_child_rejects_foreign_nodes() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let error = doc.remove_child(doc.body(), div);
        assert!(error.is_err_and(|error| error.code == "dom.not_a_child"));
    }

    #[test]
    fn append_reparents_and_refuses_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        assert!(doc.append_child(doc.body(), outer).is_ok());
        assert!(doc.append_child(outer, inner).is_ok());
        assert!(doc.append_child(doc.body(), inner).is_ok());
        assert_eq!(doc.children(outer), &[] as &[u64]);
        assert_eq!(doc.children(doc.body()), &[outer, inner]);

        let cycle = doc.append_child(outer, doc.root());
        assert!(cycle.is_err_and(|error| error.code == "dom.hierarchy"));
    }

    #[test]
    fn attributes_are_case_insensitive_and_overwrite() {
        let mut doc = Document::new();
        let link = doc.create_element("A");
        assert!(doc.set_attribute(link, "Data-Topic", "42").is_ok());
        assert!(doc.set_attribute(link, "data-topic", "43").is_ok());
        assert_eq!(doc.get_attribute(link, "DATA-TOPIC"), Some("43"));
        assert_eq!(doc.tag_name(link), Some("a"));

        let text = doc.create_text("hi");
        assert!(doc.set_attribute(text, "class", "x").is_err());
    }

    #[test]
    fn text_content_flattens_text_and_markup() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("Total of ");
        let strong = doc.create_element("strong");
        let count = doc.create_text("7 posts");
        let markup = doc.create_markup("<p>quoted <em>body</em></p>");
        for (parent, child) in [(div, text), (div, strong), (strong, count), (div, markup)] {
            assert!(doc.append_child(parent, child).is_ok());
        }
        assert_eq!(doc.text_content(div), "Total of 7 postsquoted body");
    }

    #[test]
    fn find_all_by_class_walks_in_document_order() {
        let mut doc = Document::new();
        let first = doc.create_element("div");
        let nested = doc.create_element("div");
        let second = doc.create_element("div");
        for node in [first, nested, second] {
            assert!(doc.set_attribute(node, "class", "container").is_ok());
        }
        assert!(doc.append_child(doc.body(), first).is_ok());
        assert!(doc.append_child(first, nested).is_ok());
        assert!(doc.append_child(doc.body(), second).is_ok());

        assert_eq!(
            doc.find_all_by_class(doc.body(), "container"),
            vec![first, nested, second]
        );
    }
}
