// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Document Model
//!
//! A thin mutable tree over `html5ever` and `markup5ever_rcdom`. Nodes are
//! reference-counted [`Handle`]s, so a handle stays valid while siblings are
//! inserted or removed around it. Positions are always recomputed from
//! pointer identity at the moment of a mutation; no index is cached across
//! mutations.
//!
//! Dropping an `RcDom` clears the children of every node still attached to
//! it, including nodes another handle points at. Nodes that must outlive
//! their source tree are therefore [`detach`]ed first.

use std::fmt;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::core::error::Result;

/// Matches elements by local tag name and, optionally, one class token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: String,
    class: Option<String>,
}

impl Selector {
    /// Creates a selector. Tag names compare ASCII case-insensitively; the
    /// class must appear as one whitespace-separated token of `class`.
    pub fn new(tag: &str, class: Option<&str>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            class: class.map(str::to_string),
        }
    }

    /// Whether `node` is an element this selector accepts.
    pub fn matches(&self, node: &Handle) -> bool {
        let NodeData::Element {
            ref name,
            ref attrs,
            ..
        } = node.data
        else {
            return false;
        };
        let local: &str = &name.local;
        if !local.eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        match &self.class {
            None => true,
            Some(class) => attrs.borrow().iter().any(|attr| {
                attr.name.local.as_ref() == "class"
                    && attr
                        .value
                        .split_ascii_whitespace()
                        .any(|token| token == class.as_str())
            }),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}.{}", self.tag, class),
            None => f.write_str(&self.tag),
        }
    }
}

/// A parsed HTML document that owns its tree.
pub struct Document {
    dom: RcDom,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("children", &self.dom.document.children.borrow().len())
            .finish()
    }
}

impl Document {
    /// Parses `text` as an HTML document. Parsing never fails; malformed
    /// markup is repaired the way browsers repair it.
    pub fn parse(text: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), opts).one(text);
        Self { dom }
    }

    /// The document root.
    pub fn root(&self) -> Handle {
        self.dom.document.clone()
    }

    /// Serializes the whole tree back to text.
    pub fn serialize(&self) -> Result<String> {
        let document: SerializableHandle = self.dom.document.clone().into();
        let mut bytes = Vec::new();
        serialize(&mut bytes, &document, SerializeOpts::default())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// First descendant of `scope` (excluding `scope` itself) matching
/// `selector`, in document order.
pub fn find_first(scope: &Handle, selector: &Selector) -> Option<Handle> {
    for child in scope.children.borrow().iter() {
        if selector.matches(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, selector) {
            return Some(found);
        }
    }
    None
}

/// Every node under `scope` matching `selector`, in document order. With
/// `direct_only`, only the immediate children of `scope` are considered.
pub fn find_all(
    scope: &Handle,
    selector: &Selector,
    direct_only: bool,
) -> Vec<Handle> {
    let mut found = Vec::new();
    collect(scope, selector, direct_only, &mut found);
    found
}

fn collect(
    scope: &Handle,
    selector: &Selector,
    direct_only: bool,
    found: &mut Vec<Handle>,
) {
    for child in scope.children.borrow().iter() {
        if selector.matches(child) {
            found.push(child.clone());
        }
        if !direct_only {
            collect(child, selector, direct_only, found);
        }
    }
}

/// The parent of `node`, if it is attached.
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Removes `node` from its parent. The node keeps its own subtree. Returns
/// `false` when the node was not attached.
pub fn detach(node: &Handle) -> bool {
    let Some(parent) = parent(node) else {
        node.parent.set(None);
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let position = children.iter().position(|child| Rc::ptr_eq(child, node));
    if let Some(index) = position {
        _ = children.remove(index);
    }
    node.parent.set(None);
    position.is_some()
}

/// Moves `node` into the tree immediately before `reference`, detaching it
/// from wherever it was. Returns `false` when `reference` has no parent.
pub fn insert_before(reference: &Handle, node: Handle) -> bool {
    let Some(parent) = parent(reference) else {
        return false;
    };
    _ = detach(&node);

    let mut children = parent.children.borrow_mut();
    let Some(index) =
        children.iter().position(|child| Rc::ptr_eq(child, reference))
    else {
        return false;
    };
    node.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(index, node);
    true
}

/// Local tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => {
            Some(name.local.to_string())
        }
        _ => None,
    }
}

/// Concatenated text content of `node` and its descendants.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: &Handle, text: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        text.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        push_text(child, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html><body>\
        <div class=\"container wide\">\
        <header class=\"card\">H</header>\
        <section class=\"card\">old</section>\
        <div><section class=\"card\">nested</section></div>\
        <footer>F</footer>\
        </div></body></html>";

    fn card() -> Selector {
        Selector::new("section", Some("card"))
    }

    #[test]
    fn test_selector_matches_class_token() {
        let doc = Document::parse(PAGE);
        let container =
            find_first(&doc.root(), &Selector::new("div", Some("wide")))
                .unwrap();
        assert_eq!(tag_name(&container).as_deref(), Some("div"));
        assert!(
            find_first(&doc.root(), &Selector::new("div", Some("wid")))
                .is_none()
        );
        assert_eq!(Selector::new("DIV", Some("x")).to_string(), "div.x");
    }

    #[test]
    fn test_find_all_direct_only() {
        let doc = Document::parse(PAGE);
        let container = find_first(
            &doc.root(),
            &Selector::new("div", Some("container")),
        )
        .unwrap();

        let all = find_all(&container, &card(), false);
        let direct = find_all(&container, &card(), true);
        assert_eq!(all.len(), 2);
        assert_eq!(direct.len(), 1);
        assert_eq!(text_content(&direct[0]), "old");
        assert_eq!(text_content(&all[1]), "nested");
    }

    #[test]
    fn test_detach_and_insert_before_keep_handles_valid() {
        let doc = Document::parse(PAGE);
        let root = doc.root();
        let footer =
            find_first(&root, &Selector::new("footer", None)).unwrap();
        let stale = find_all(&root, &card(), false);

        assert!(detach(&stale[0]));
        assert!(!detach(&stale[0]));
        assert!(insert_before(&footer, stale[1].clone()));
        assert!(insert_before(&footer, stale[0].clone()));

        let container = parent(&footer).unwrap();
        let order: Vec<String> = container
            .children
            .borrow()
            .iter()
            .map(text_content)
            .collect();
        assert_eq!(order, vec!["H", "", "nested", "old", "F"]);
    }

    #[test]
    fn test_serialize_round_trip_is_stable() {
        let first = Document::parse(PAGE).serialize().unwrap();
        let second = Document::parse(&first).serialize().unwrap();
        assert!(first.starts_with("<!DOCTYPE html>"));
        assert_eq!(first, second);
    }
}
