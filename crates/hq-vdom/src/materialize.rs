//! Render-tree to live-node adapter.

use crate::VChild;
use crate::VNode;
use hq_core::PreviewResult;
use hq_dom::Document;
use hq_dom::NodeId;

/// Turns render trees into document nodes and takes them down again.
///
/// Any adapter satisfying this contract can back the preview pipeline.
pub trait Materializer {
    /// Builds a detached node for `tree` inside `document`.
    fn materialize(&self, document: &mut Document, tree: &VNode) -> PreviewResult<NodeId>;

    /// Appends a materialized node as the last child of the body.
    fn insert(&self, document: &mut Document, node: NodeId) -> PreviewResult<()> {
        let body = document.body();
        document.append_child(body, node)
    }

    /// Removes a live node from whatever parent holds it. Parentless nodes are left alone.
    fn detach_live(&self, document: &mut Document, node: NodeId) -> PreviewResult<()> {
        match document.parent(node) {
            Some(parent) => document.remove_child(parent, node),
            None => Ok(()),
        }
    }
}

/// Default materializer writing straight into the arena document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomMaterializer;

impl Materializer for DomMaterializer {
    fn materialize(&self, document: &mut Document, tree: &VNode) -> PreviewResult<NodeId> {
        let node = document.create_element(tree.tag());
        for (name, value) in tree.attributes() {
            document.set_attribute(node, name, value)?;
        }

        if let Some(markup) = tree.trusted_html() {
            let markup = document.create_markup(markup.as_str());
            document.append_child(node, markup)?;
            return Ok(node);
        }

        for child in tree.child_nodes() {
            let child_node = match child {
                VChild::Text(text) => document.create_text(text.as_str()),
                VChild::Node(subtree) => self.materialize(document, subtree)?,
            };
            document.append_child(node, child_node)?;
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::DomMaterializer;
    use super::Materializer;
    use crate::TrustedHtml;
    use crate::VNode;
    use hq_dom::Document;

    fn sample() -> VNode {
        VNode::with_class("div", "js-inline-preview board")
            .child(VNode::with_class("div", "cascade-header").text("General"))
            .child(VNode::with_class("div", "cascade-body").text("Talk about anything"))
    }

    #[test]
    fn materialized_node_starts_detached() {
        let mut doc = Document::new();
        let node = DomMaterializer
            .materialize(&mut doc, &sample())
            .unwrap_or_else(|error| panic!("{error}"));

        assert!(!doc.is_connected(node));
        assert_eq!(doc.child_count(node), 2);
        assert!(doc.has_class(node, "board"));
        assert_eq!(doc.text_content(node), "GeneralTalk about anything");
    }

    #[test]
    fn insert_appends_after_existing_body_children() {
        let mut doc = Document::new();
        let existing = doc.create_element("p");
        assert!(doc.append_child(doc.body(), existing).is_ok());

        let node = DomMaterializer
            .materialize(&mut doc, &sample())
            .unwrap_or_else(|error| panic!("{error}"));
        assert!(DomMaterializer.insert(&mut doc, node).is_ok());
        assert_eq!(doc.children(doc.body()), &[existing, node]);
    }

    #[test]
    fn detach_live_is_idempotent() {
        let mut doc = Document::new();
        let node = DomMaterializer
            .materialize(&mut doc, &sample())
            .unwrap_or_else(|error| panic!("{error}"));
        assert!(DomMaterializer.insert(&mut doc, node).is_ok());

        assert!(DomMaterializer.detach_live(&mut doc, node).is_ok());
        assert!(DomMaterializer.detach_live(&mut doc, node).is_ok());
        assert_eq!(doc.child_count(doc.body()), 0);
    }

    #[test]
    fn trusted_markup_replaces_children() {
        let mut doc = Document::new();
        let tree = VNode::with_class("div", "post-body")
            .text("ignored")
            .inner_html(TrustedHtml::from_sanitized("<p>&gt;&gt;3 hi</p>"));
        let node = DomMaterializer
            .materialize(&mut doc, &tree)
            .unwrap_or_else(|error| panic!("{error}"));
        assert_eq!(
            doc.outer_html(node),
            "<div class=\"post-body\"><p>&gt;&gt;3 hi</p></div>"
        );
    }
}
