//! Mutable XML document tree
//!
//! The rename pass needs to change the text of a handful of elements and write the
//! document back without disturbing anything else, so the document is kept as an
//! arena of nodes that remembers comments, processing instructions, CDATA sections
//! and the raw start tags exactly as they were read.

mod parser;
mod writer;

pub use writer::verify_well_formed;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Kind of a node and its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root holding the prolog, the root element and trailing misc nodes
    Document,
    Element {
        /// Qualified tag name (`prefix:local` when prefixed)
        name: String,
        /// Raw start tag content (name and attributes as written)
        raw: String,
        /// Whether the element was written as `<name/>`
        self_closing: bool,
    },
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    Declaration(String),
    DocType(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Error raised while reading an XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Markup quick-xml could not read
    Syntax(String),
    /// An end tag with no matching start tag, or elements left open at the end
    Unbalanced(String),
    /// An entity reference other than the predefined ones or a character reference
    UnknownEntity(String),
    /// Content that is not valid UTF-8
    Encoding(String),
    /// No root element at all
    NoRootElement,
    /// An element after the root element closed
    MultipleRootElements(String),
    /// Character data outside the root element
    TextOutsideRoot,
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Syntax(msg) => write!(f, "XML syntax error {}", msg),
            DocumentError::Unbalanced(msg) => write!(f, "Unbalanced XML: {}", msg),
            DocumentError::UnknownEntity(name) => write!(f, "Unknown entity reference: &{};", name),
            DocumentError::Encoding(msg) => write!(f, "Invalid UTF-8 in document: {}", msg),
            DocumentError::NoRootElement => write!(f, "Document has no root element"),
            DocumentError::MultipleRootElements(name) => {
                write!(f, "Second root element <{}> after the document element", name)
            }
            DocumentError::TextOutsideRoot => write!(f, "Text outside the root element"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// An owned, mutable XML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse XML text into a document tree
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        parser::parse(content)
    }

    /// Serialize the tree back to XML text
    pub fn to_xml_string(&self) -> anyhow::Result<String> {
        writer::write(self)
    }

    pub(crate) fn empty() -> Self {
        Document {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The synthetic document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append text to `parent`, merging with a trailing text node so that
    /// entity references don't split character data
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()));
    }

    /// Tag name of an element node, `None` for any other kind
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.tag_name(id) == Some(name)
    }

    /// All nodes below the document node, in document order
    pub fn descendants(&self) -> Descendants<'_> {
        self.descendants_of(self.root())
    }

    /// Nodes below `id` (not `id` itself), in document order
    pub fn descendants_of(&self, id: NodeId) -> Descendants<'_> {
        let stack = self.node(id).children.iter().rev().copied().collect();
        Descendants { doc: self, stack }
    }

    /// Parent, grandparent and so on up to the document node
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, |&n| self.node(n).parent)
    }

    /// Elements with the given qualified name, in document order
    pub fn elements_by_tag_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants()
            .filter(move |&id| self.is_element_named(id, name))
    }

    /// Number of element nodes reachable from the root
    pub fn element_count(&self) -> usize {
        self.descendants()
            .filter(|&id| self.tag_name(id).is_some())
            .count()
    }

    /// `id` itself followed by every later sibling
    pub fn siblings_from(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings: &[NodeId] = match self.node(id).parent {
            Some(parent) => {
                let children = &self.node(parent).children;
                let position = children.iter().position(|&s| s == id).unwrap_or(children.len());
                &children[position..]
            }
            None => &[],
        };
        siblings.iter().copied()
    }

    /// Concatenated text and CDATA of all descendants (DOM `textContent`)
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(text) | NodeKind::CData(text) => out.push_str(text),
            NodeKind::Element { .. } | NodeKind::Document => {
                for &child in &self.node(id).children {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Replace the children of an element with a single text node
    pub fn set_text_content(&mut self, id: NodeId, value: &str) {
        let children = std::mem::take(&mut self.nodes[id.0].children);

        // Reuse a lone text child instead of growing the arena
        if let [only] = children.as_slice() {
            if let NodeKind::Text(text) = &mut self.nodes[only.0].kind {
                *text = value.to_string();
                self.nodes[id.0].children = children;
                return;
            }
        }

        for child in children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.append(id, NodeKind::Text(value.to_string()));
        }
    }
}

/// Pre-order iterator over the attached nodes of a document
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.node(id).children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<objets>
  <objet>
    <id>G1</id>
    <code>A</code>
    <libelle>Alpha</libelle>
  </objet>
  <objet>
    <id>G2</id>
    <libelle>Be<![CDATA[ta]]></libelle>
  </objet>
</objets>
"#;

    #[test]
    fn test_elements_in_document_order() {
        let doc = Document::parse(RECORDS).unwrap();

        let ids: Vec<String> = doc
            .elements_by_tag_name("id")
            .map(|id| doc.text_content(id))
            .collect();

        assert_eq!(ids, vec!["G1", "G2"]);
    }

    #[test]
    fn test_text_content_includes_cdata() {
        let doc = Document::parse(RECORDS).unwrap();

        let labels: Vec<String> = doc
            .elements_by_tag_name("libelle")
            .map(|id| doc.text_content(id))
            .collect();

        assert_eq!(labels, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_siblings_walk_includes_whitespace_nodes() {
        let doc = Document::parse(RECORDS).unwrap();
        let first_id = doc.elements_by_tag_name("id").next().unwrap();

        let walk: Vec<NodeId> = doc.siblings_from(first_id).collect();

        // id, ws, code, ws, libelle, ws
        assert_eq!(walk.len(), 6);
        assert_eq!(walk[0], first_id);
        assert_eq!(doc.tag_name(walk[2]), Some("code"));
        assert_eq!(doc.tag_name(walk[4]), Some("libelle"));
    }

    #[test]
    fn test_set_text_content_replaces_mixed_children() {
        let mut doc = Document::parse(RECORDS).unwrap();
        let label = doc.elements_by_tag_name("libelle").nth(1).unwrap();

        doc.set_text_content(label, "Gamma");

        assert_eq!(doc.text_content(label), "Gamma");
        assert_eq!(doc.node(label).children.len(), 1);
    }

    #[test]
    fn test_set_text_content_on_empty_element() {
        let mut doc = Document::parse("<r><id>G1</id><libelle/></r>").unwrap();
        let label = doc.elements_by_tag_name("libelle").next().unwrap();

        doc.set_text_content(label, "New");

        assert_eq!(doc.text_content(label), "New");
        assert_eq!(doc.to_xml_string().unwrap(), "<r><id>G1</id><libelle>New</libelle></r>");
    }

    #[test]
    fn test_ancestors_and_subtree() {
        let doc = Document::parse(RECORDS).unwrap();
        let label = doc.elements_by_tag_name("libelle").nth(1).unwrap();

        let names: Vec<Option<&str>> = doc.ancestors(label).map(|n| doc.tag_name(n)).collect();
        assert_eq!(names, vec![Some("objet"), Some("objets"), None]);

        let objet = doc.ancestors(label).next().unwrap();
        let inner: Vec<&str> = doc
            .descendants_of(objet)
            .filter_map(|n| doc.tag_name(n))
            .collect();
        assert_eq!(inner, vec!["id", "libelle"]);
    }

    #[test]
    fn test_element_count() {
        let doc = Document::parse(RECORDS).unwrap();
        assert_eq!(doc.element_count(), 8);
    }
}
