//! Finding the label element of a record from its identifier
//!
//! A record is an identifier element followed, somewhere among its later
//! siblings, by a label element:
//!
//! ```xml
//! <objet>
//!     <id>3f2a…</id>
//!     <code>A12</code>
//!     <libelle>Ancien nom</libelle>
//! </objet>
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, NodeId};

/// Tag names of the identifier and label elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSchema {
    pub identifier_tag: String,
    pub label_tag: String,
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self {
            identifier_tag: "id".to_string(),
            label_tag: "libelle".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateError {
    IdentifierNotFound,
    LabelNotFound,
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocateError::IdentifierNotFound => write!(f, "identifier not found"),
            LocateError::LabelNotFound => write!(f, "label not found after identifier"),
        }
    }
}

impl std::error::Error for LocateError {}

/// Walk forward from the identifier element (itself included) to the first label
fn label_after(doc: &Document, schema: &DocumentSchema, id_node: NodeId) -> Result<NodeId, LocateError> {
    doc.siblings_from(id_node)
        .find(|&node| doc.is_element_named(node, &schema.label_tag))
        .ok_or(LocateError::LabelNotFound)
}

/// Locate the label of the first record whose identifier text equals `identifier`
///
/// Matching is exact: no trimming, case-sensitive. Duplicated identifiers are not
/// an error, the first one in document order wins.
pub fn locate_label(
    doc: &Document,
    schema: &DocumentSchema,
    identifier: &str,
) -> Result<NodeId, LocateError> {
    let id_node = doc
        .elements_by_tag_name(&schema.identifier_tag)
        .find(|&node| doc.text_content(node) == identifier)
        .ok_or(LocateError::IdentifierNotFound)?;

    label_after(doc, schema, id_node)
}

/// Identifier → label lookup built with a single scan of the document
///
/// Gives the same answers as [`locate_label`] for the document it was built from,
/// as long as identifier texts are not modified afterwards.
#[derive(Debug, Default)]
pub struct LabelIndex {
    entries: HashMap<String, Result<NodeId, LocateError>>,
    duplicates: usize,
}

impl LabelIndex {
    pub fn build(doc: &Document, schema: &DocumentSchema) -> Self {
        let mut index = LabelIndex::default();

        for id_node in doc.elements_by_tag_name(&schema.identifier_tag) {
            let key = doc.text_content(id_node);
            if index.entries.contains_key(&key) {
                log::warn!("Duplicate identifier '{}', keeping the first occurrence", key);
                index.duplicates += 1;
                continue;
            }
            index.entries.insert(key, label_after(doc, schema, id_node));
        }

        index
    }

    pub fn get(&self, identifier: &str) -> Result<NodeId, LocateError> {
        self.entries
            .get(identifier)
            .copied()
            .unwrap_or(Err(LocateError::IdentifierNotFound))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}
