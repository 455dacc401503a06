//! quick-xml event reader building a [`Document`]

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

use super::{Document, DocumentError, NodeId, NodeKind};

fn utf8(bytes: &[u8]) -> Result<&str, DocumentError> {
    std::str::from_utf8(bytes).map_err(|e| DocumentError::Encoding(e.to_string()))
}

fn element_name(raw: &str) -> String {
    raw.split(|c: char| c.is_ascii_whitespace())
        .next()
        .unwrap_or_default()
        .to_string()
}

fn check_root(open: &[NodeId], saw_root: bool, name: &str) -> Result<(), DocumentError> {
    if open.len() == 1 && saw_root {
        return Err(DocumentError::MultipleRootElements(name.to_string()));
    }
    Ok(())
}

pub(super) fn parse(content: &str) -> Result<Document, DocumentError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);

    let mut doc = Document::empty();
    let mut open: Vec<NodeId> = vec![doc.root()];
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            DocumentError::Syntax(format!("at byte {}: {}", reader.error_position(), e))
        })?;

        // The document node is always at the bottom of the stack
        let parent = *open.last().unwrap_or(&NodeId(0));

        match event {
            Event::Start(e) => {
                let raw = utf8(&e)?.to_string();
                let name = element_name(&raw);
                check_root(&open, saw_root, &name)?;
                let id = doc.append(
                    parent,
                    NodeKind::Element {
                        name,
                        raw,
                        self_closing: false,
                    },
                );
                open.push(id);
                saw_root = true;
            }
            Event::Empty(e) => {
                let raw = utf8(&e)?.to_string();
                let name = element_name(&raw);
                check_root(&open, saw_root, &name)?;
                doc.append(
                    parent,
                    NodeKind::Element {
                        name,
                        raw,
                        self_closing: true,
                    },
                );
                saw_root = true;
            }
            Event::End(e) => {
                if open.len() <= 1 {
                    return Err(DocumentError::Unbalanced(format!(
                        "unexpected end tag </{}>",
                        utf8(&e)?
                    )));
                }
                open.pop();
            }
            Event::Text(e) => {
                let text = utf8(&e)?;
                if open.len() == 1 && !text.chars().all(|c| c.is_ascii_whitespace()) {
                    return Err(DocumentError::TextOutsideRoot);
                }
                doc.append_text(parent, text);
            }
            Event::GeneralRef(_) | Event::CData(_) if open.len() == 1 => {
                return Err(DocumentError::TextOutsideRoot);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref().map_err(|err| {
                    DocumentError::Syntax(format!("at byte {}: {}", reader.buffer_position(), err))
                })? {
                    doc.append_text(parent, ch.encode_utf8(&mut [0; 4]));
                } else {
                    let name = utf8(&e)?;
                    let resolved = resolve_predefined_entity(name)
                        .ok_or_else(|| DocumentError::UnknownEntity(name.to_string()))?;
                    doc.append_text(parent, resolved);
                }
            }
            Event::CData(e) => {
                doc.append(parent, NodeKind::CData(utf8(&e)?.to_string()));
            }
            Event::Comment(e) => {
                doc.append(parent, NodeKind::Comment(utf8(&e)?.to_string()));
            }
            Event::PI(e) => {
                doc.append(parent, NodeKind::ProcessingInstruction(utf8(&e)?.to_string()));
            }
            Event::Decl(e) => {
                doc.append(parent, NodeKind::Declaration(utf8(&e)?.to_string()));
            }
            Event::DocType(e) => {
                doc.append(parent, NodeKind::DocType(utf8(&e)?.to_string()));
            }
            Event::Eof => break,
        }
    }

    if open.len() > 1 {
        let unclosed: Vec<&str> = open[1..]
            .iter()
            .filter_map(|&id| doc.tag_name(id))
            .collect();
        return Err(DocumentError::Unbalanced(format!(
            "unclosed element(s): {}",
            unclosed.join(", ")
        )));
    }

    if !saw_root {
        return Err(DocumentError::NoRootElement);
    }

    log::debug!("Parsed XML document with {} elements", doc.element_count());
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_are_resolved_into_text() {
        let doc = Document::parse("<r><libelle>R&amp;D &#233;t&#xE9; &lt;x&gt;</libelle></r>").unwrap();
        let label = doc.elements_by_tag_name("libelle").next().unwrap();

        assert_eq!(doc.text_content(label), "R&D été <x>");
        // Entity references must not split the text into several nodes
        assert_eq!(doc.node(label).children.len(), 1);
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let result = Document::parse("<r><libelle>&nbsp;</libelle></r>");
        assert_eq!(result.unwrap_err(), DocumentError::UnknownEntity("nbsp".to_string()));
    }

    #[test]
    fn test_unclosed_element_is_rejected() {
        let result = Document::parse("<r><objet><id>G1</id></objet>");
        assert!(matches!(
            result,
            Err(DocumentError::Unbalanced(_)) | Err(DocumentError::Syntax(_))
        ));
    }

    #[test]
    fn test_mismatched_end_tag_is_rejected() {
        let result = Document::parse("<r><id>G1</libelle></r>");
        assert!(matches!(result, Err(DocumentError::Syntax(_))));
    }

    #[test]
    fn test_document_without_element_is_rejected() {
        let result = Document::parse("<?xml version=\"1.0\"?>\n<!-- vide -->\n");
        assert_eq!(result.unwrap_err(), DocumentError::NoRootElement);
    }

    #[test]
    fn test_second_root_element_is_rejected() {
        let result = Document::parse("<a><id>G1</id></a>\n<b/>");
        assert_eq!(
            result.unwrap_err(),
            DocumentError::MultipleRootElements("b".to_string())
        );
    }

    #[test]
    fn test_text_outside_root_is_rejected() {
        for xml in ["just text", "<r/>trailing", "&amp;<r/>", "<r/><![CDATA[x]]>"] {
            assert_eq!(
                Document::parse(xml).unwrap_err(),
                DocumentError::TextOutsideRoot,
                "{:?}",
                xml
            );
        }
    }

    #[test]
    fn test_whitespace_and_comments_around_root_are_kept() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- a -->\n<r/>\n<!-- b -->\n";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn test_prefixed_names_keep_prefix() {
        let doc = Document::parse(r#"<b:r xmlns:b="urn:x"><b:id>G1</b:id></b:r>"#).unwrap();
        assert_eq!(doc.elements_by_tag_name("b:id").count(), 1);
        assert_eq!(doc.elements_by_tag_name("id").count(), 0);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let doc = Document::parse("\u{feff}<r><id>G1</id></r>").unwrap();
        assert_eq!(doc.element_count(), 2);
    }
}
