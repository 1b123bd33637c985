//! Arena-based document tree.
//!
//! Nodes are allocated in a contiguous vector and linked by index. Removing a
//! subtree only unlinks it: the nodes stay allocated but become unreachable
//! from the document root, so a stale [`NodeId`] can never observe a
//! half-updated parent/child relationship.

use html5ever::{LocalName, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id.
        id: Option<String>,
        /// Pre-extracted classes.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (never rendered).
    Comment(String),
    /// Document type declaration.
    Doctype { name: String },
    /// Synthetic node holding resolved, unescaped footnote text.
    FootnoteMarker(String),
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Build an attribute in the null namespace.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string(),
        }
    }
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-backed document tree.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    /// Create a new empty tree with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name.local.as_ref() == "id" {
                id = Some(attr.value.clone());
            } else if attr.name.local.as_ref() == "class" {
                classes = attr
                    .value
                    .split_whitespace()
                    .map(|s| s.to_string())
                    .collect();
            }
        }

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    /// Create an HTML element from a tag name and `(name, value)` attribute pairs.
    pub fn create_html_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let name = QualName::new(None, ns!(html), LocalName::from(tag));
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute::new(name, value))
            .collect();
        self.create_element(name, attrs)
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.into())))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype { name: name.into() }))
    }

    /// Create a footnote marker carrying resolved footnote text.
    pub fn create_footnote_marker(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::FootnoteMarker(text.into())))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self.get(sibling).map(|n| n.prev_sibling).unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Unlink a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Put `new_node` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) {
        if self.parent(old).is_none() {
            return;
        }
        self.insert_before(old, new_node);
        self.detach(old);
    }

    /// Replace an element by its children, keeping their order.
    pub fn unwrap(&mut self, id: NodeId) {
        if self.parent(id).is_none() {
            return;
        }
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            self.detach(child);
            self.insert_before(id, child);
        }
        self.detach(id);
    }

    /// Get the number of allocated nodes (including detached ones).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree only holds the document root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Parent of a node, or `NodeId::NONE`.
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE)
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while current.is_some() {
            if current == self.document {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = id;
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over the proper ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> AncestorsIter<'_> {
        AncestorsIter {
            dom: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the descendants of a node in document order.
    pub fn descendants(&self, root: NodeId) -> DescendantsIter<'_> {
        let first = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        DescendantsIter {
            dom: self,
            root,
            current: first,
        }
    }

    /// Iterate over every node after `id` in document order, starting with its
    /// own first child.
    pub fn following(&self, id: NodeId) -> FollowingIter<'_> {
        FollowingIter {
            dom: self,
            current: self.next_in_order(id, self.document),
        }
    }

    /// Iterate over every node before `id` in document order, nearest first.
    /// Ancestors are included, since their start precedes `id`.
    pub fn preceding(&self, id: NodeId) -> PrecedingIter<'_> {
        PrecedingIter {
            dom: self,
            current: self.prev_in_order(id),
        }
    }

    fn next_in_order(&self, id: NodeId, root: NodeId) -> NodeId {
        let Some(node) = self.get(id) else {
            return NodeId::NONE;
        };
        if node.first_child.is_some() {
            return node.first_child;
        }
        let mut current = id;
        while current.is_some() && current != root {
            let Some(n) = self.get(current) else {
                break;
            };
            if n.next_sibling.is_some() {
                return n.next_sibling;
            }
            current = n.parent;
        }
        NodeId::NONE
    }

    fn prev_in_order(&self, id: NodeId) -> NodeId {
        let Some(node) = self.get(id) else {
            return NodeId::NONE;
        };
        if node.prev_sibling.is_none() {
            return node.parent;
        }
        let mut current = node.prev_sibling;
        while let Some(n) = self.get(current) {
            if n.last_child.is_none() {
                break;
            }
            current = n.last_child;
        }
        current
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.get(id).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorsIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for AncestorsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, excluding its root.
pub struct DescendantsIter<'a> {
    dom: &'a Dom,
    root: NodeId,
    current: NodeId,
}

impl Iterator for DescendantsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.next_in_order(id, self.root);
        Some(id)
    }
}

/// Forward document-order iterator.
pub struct FollowingIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for FollowingIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.next_in_order(id, self.dom.document);
        Some(id)
    }
}

/// Reverse document-order iterator.
pub struct PrecedingIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for PrecedingIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.prev_in_order(id);
        Some(id)
    }
}

/// Convenience methods for element and text nodes.
impl Dom {
    /// Get element's local name (tag).
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name.local.as_ref()),
            _ => None,
        })
    }

    /// Check whether the node is an element with one of the given tags.
    pub fn has_tag(&self, id: NodeId, tags: &[&str]) -> bool {
        self.tag(id).is_some_and(|t| tags.contains(&t))
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// The `name` attribute, falling back to `id`, of an anchor element.
    pub fn anchor_name(&self, id: NodeId) -> Option<&str> {
        self.get_attr(id, "name")
            .filter(|s| !s.is_empty())
            .or_else(|| self.element_id(id).filter(|s| !s.is_empty()))
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Get text content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenate every text descendant, unmodified.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        let mut result = String::new();
        for child in self.descendants(id) {
            if let Some(text) = self.text(child) {
                result.push_str(text);
            }
        }
        result
    }

    /// Trim every text descendant, drop empty ones and join with `separator`.
    pub fn stripped_text(&self, id: NodeId, separator: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(text) = self.text(id) {
            parts.push(text.trim());
        } else {
            for child in self.descendants(id) {
                if let Some(text) = self.text(child) {
                    parts.push(text.trim());
                }
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(separator)
    }

    /// Element descendants with one of the given tags, in document order.
    pub fn find_all(&self, root: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.has_tag(id, tags))
            .collect()
    }

    /// First element descendant with one of the given tags.
    pub fn find_first(&self, root: NodeId, tags: &[&str]) -> Option<NodeId> {
        self.descendants(root).find(|&id| self.has_tag(id, tags))
    }

    /// Nearest proper ancestor with one of the given tags.
    pub fn find_ancestor(&self, id: NodeId, tags: &[&str]) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.has_tag(a, tags))
    }

    /// Anchor elements (`a` with a non-empty `name` or `id`) below `root`.
    pub fn named_anchors(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.has_tag(id, &["a"]) && self.anchor_name(id).is_some())
            .collect()
    }

    /// Find element by tag name (first match in the whole document).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find_first(self.document, &[tag])
    }
}
