//! In-memory SVG element tree
//!
//! `SvgTree` is the native stand-in for a mounted SVG: markup is parsed with
//! the `svg` crate into an arena of elements that can be queried by class,
//! re-parented and serialized back. Mounting assigns the client size the
//! corrector measures.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use svg::node::element::tag::Type;
use svg::parser::Event;

use schedview_core::RenderError;

use crate::correct::CorrectableSvg;

/// Handle to an element in an [`SvgTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: Vec<Child>,
    parent: Option<NodeId>,
}

/// Arena-backed SVG element tree
#[derive(Clone, Debug, Default)]
pub struct SvgTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    client_size: Option<(f64, f64)>,
    reflows: u32,
}

impl SvgTree {
    /// Parse SVG markup. The first element becomes the root.
    pub fn parse(markup: &str) -> Result<Self, RenderError> {
        let parser = svg::read(markup)?;
        let mut tree = Self::default();
        let mut open: Vec<NodeId> = Vec::new();

        for event in parser {
            match event {
                Event::Tag(name, Type::Start, attrs) => {
                    let id = tree.push_element(name, &attrs, open.last().copied())?;
                    open.push(id);
                }
                Event::Tag(name, Type::Empty, attrs) => {
                    tree.push_element(name, &attrs, open.last().copied())?;
                }
                Event::Tag(name, Type::End, _) => match open.pop() {
                    Some(id) if tree.nodes[id.0].tag == name => {}
                    _ => {
                        return Err(RenderError::Format(format!(
                            "unexpected closing tag </{name}>"
                        )))
                    }
                },
                Event::Text(text) => {
                    let text = text.trim();
                    if let (Some(&parent), false) = (open.last(), text.is_empty()) {
                        tree.nodes[parent.0].children.push(Child::Text(text.to_string()));
                    }
                }
                Event::Error(e) => return Err(RenderError::Format(e.to_string())),
                _ => {}
            }
        }

        if let Some(id) = open.last() {
            return Err(RenderError::Format(format!(
                "unclosed <{}>",
                tree.nodes[id.0].tag
            )));
        }
        if tree.root.is_none() {
            return Err(RenderError::Format("no SVG element in markup".into()));
        }
        Ok(tree)
    }

    fn push_element(
        &mut self,
        tag: &str,
        attrs: &svg::node::Attributes,
        parent: Option<NodeId>,
    ) -> Result<NodeId, RenderError> {
        if parent.is_none() && self.root.is_some() {
            return Err(RenderError::Format(format!(
                "<{tag}> outside the root element"
            )));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
            children: Vec::new(),
            parent,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(Child::Element(id)),
            None => self.root = Some(id),
        }
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Mounting
    // ------------------------------------------------------------------------

    /// Attach to a container of the given size
    pub fn mount(&mut self, width: f64, height: f64) {
        self.client_size = Some((width, height));
    }

    pub fn unmount(&mut self) {
        self.client_size = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.client_size.is_some()
    }

    /// Number of forced reflows so far
    pub fn reflow_count(&self) -> u32 {
        self.reflows
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn classes(&self, node: NodeId) -> impl Iterator<Item = &str> {
        self.attr(node, "class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).any(|c| c == class)
    }

    /// Element children in order
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
            .collect()
    }

    /// Concatenated text of the element's direct text children
    pub fn text(&self, node: NodeId) -> String {
        self.nodes[node.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Text(t) => Some(t.as_str()),
                Child::Element(_) => None,
            })
            .collect()
    }

    /// Element descendants of `scope` in document order, excluding `scope`
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    pub fn descendants_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn find_first_by_class(&self, class: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attrs.remove(name);
    }

    /// Remove `node` from its parent; it stays in the arena
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0]
                .children
                .retain(|c| *c != Child::Element(node));
        }
    }

    /// Move `child` to the front of `parent`. Refuses to create a cycle.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[parent.0].children.insert(0, Child::Element(child));
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// Move `child` to the end of `parent`. Refuses to create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[parent.0].children.push(Child::Element(child));
        self.nodes[child.0].parent = Some(parent);
        true
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    /// Serialize the tree back to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.write_node(root, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attrs {
            let _ = write!(out, " {name}=\"{value}\"");
        }
        if node.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &node.children {
            match child {
                Child::Element(c) => self.write_node(*c, out),
                Child::Text(t) => out.push_str(t),
            }
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

impl CorrectableSvg for SvgTree {
    type Node = NodeId;

    fn client_size(&self) -> (f64, f64) {
        self.client_size.unwrap_or((0.0, 0.0))
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn descendants_by_class(&self, scope: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants_with_class(*scope, class)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        SvgTree::has_class(self, *node, class)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.set_attr(*node, name, value);
    }

    fn prepend_to_root(&mut self, node: &NodeId) {
        if let Some(root) = self.root {
            self.prepend_child(root, *node);
        }
    }

    fn append_to_root(&mut self, node: &NodeId) {
        if let Some(root) = self.root {
            self.append_child(root, *node);
        }
    }

    fn set_display(&mut self, node: &NodeId, visible: bool) {
        if visible {
            self.remove_attr(*node, "display");
        } else {
            self.set_attr(*node, "display", "none");
        }
    }

    fn force_layout(&mut self, _node: &NodeId) {
        self.reflows += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <g class="a first"><rect class="x" width="1" height="1"/><text class="x">03 Fev</text></g>
  <g class="b"/>
</svg>"#;

    #[test]
    fn parses_elements_and_text() {
        let tree = SvgTree::parse(MARKUP).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.tag(root), "svg");
        assert_eq!(tree.children(root).len(), 2);
        let text = tree.descendants_with_class(root, "x")[1];
        assert_eq!(tree.tag(text), "text");
        assert_eq!(tree.text(text), "03 Fev");
    }

    #[test]
    fn class_matching_is_token_based() {
        let tree = SvgTree::parse(MARKUP).unwrap();
        let a = tree.find_first_by_class("first").unwrap();
        assert!(tree.has_class(a, "a"));
        assert!(!tree.has_class(a, "fir"));
    }

    #[test]
    fn markup_round_trips_through_parse() {
        let tree = SvgTree::parse(MARKUP).unwrap();
        let again = SvgTree::parse(&tree.to_markup()).unwrap();
        assert_eq!(again.to_markup(), tree.to_markup());
    }

    #[test]
    fn moving_children() {
        let mut tree = SvgTree::parse(MARKUP).unwrap();
        let root = tree.root().unwrap();
        let b = tree.find_first_by_class("b").unwrap();
        assert!(tree.prepend_child(root, b));
        assert_eq!(tree.children(root)[0], b);

        let a = tree.find_first_by_class("a").unwrap();
        assert!(!tree.append_child(a, root), "root cannot move under its child");
        assert!(!tree.append_child(a, a));
    }

    #[test]
    fn unbalanced_markup_is_rejected() {
        assert!(SvgTree::parse("<svg><g></svg>").is_err());
        assert!(SvgTree::parse("just text").is_err());
    }

    #[test]
    fn mounting_sets_client_size() {
        let mut tree = SvgTree::parse(MARKUP).unwrap();
        assert_eq!(CorrectableSvg::client_size(&tree), (0.0, 0.0));
        tree.mount(640.0, 300.0);
        assert_eq!(CorrectableSvg::client_size(&tree), (640.0, 300.0));
        tree.unmount();
        assert!(!tree.is_mounted());
    }
}
