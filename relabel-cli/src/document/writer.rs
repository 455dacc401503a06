//! Serialization of a [`Document`] with quick-xml, and an independent
//! well-formedness check with roxmltree

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use super::{Document, NodeId, NodeKind};

pub(super) fn write(doc: &Document) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    for &child in &doc.node(doc.root()).children {
        write_node(doc, child, &mut writer)?;
    }
    String::from_utf8(writer.into_inner()).context("Serialized document is not valid UTF-8")
}

fn write_node(doc: &Document, id: NodeId, writer: &mut Writer<Vec<u8>>) -> Result<()> {
    let node = doc.node(id);
    match &node.kind {
        NodeKind::Document => {
            for &child in &node.children {
                write_node(doc, child, writer)?;
            }
        }
        NodeKind::Element {
            name,
            raw,
            self_closing,
        } => {
            let start = BytesStart::from_content(raw.as_str(), name.len());
            if *self_closing && node.children.is_empty() {
                writer
                    .write_event(Event::Empty(start))
                    .with_context(|| format!("Failed to write <{}/>", name))?;
                return Ok(());
            }

            writer
                .write_event(Event::Start(start))
                .with_context(|| format!("Failed to write <{}>", name))?;
            for &child in &node.children {
                write_node(doc, child, writer)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .with_context(|| format!("Failed to write </{}>", name))?;
        }
        NodeKind::Text(text) => {
            // Only <, > and & need escaping in character data
            writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))
                .context("Failed to write text")?;
        }
        NodeKind::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .context("Failed to write CDATA section")?;
        }
        NodeKind::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .context("Failed to write comment")?;
        }
        NodeKind::ProcessingInstruction(text) => {
            writer
                .write_event(Event::PI(BytesPI::new(text.as_str())))
                .context("Failed to write processing instruction")?;
        }
        NodeKind::Declaration(text) => {
            let decl = BytesDecl::from_start(BytesStart::from_content(text.as_str(), 3));
            writer
                .write_event(Event::Decl(decl))
                .context("Failed to write XML declaration")?;
        }
        NodeKind::DocType(text) => {
            writer
                .write_event(Event::DocType(BytesText::from_escaped(text.as_str())))
                .context("Failed to write DOCTYPE")?;
        }
    }
    Ok(())
}

/// Re-parse serialized XML with roxmltree and return its element count
pub fn verify_well_formed(xml: &str) -> Result<usize> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    let parsed = roxmltree::Document::parse_with_options(xml, options)
        .context("Renamed document is not well-formed XML")?;
    Ok(parsed.descendants().filter(|n| n.is_element()).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_document_round_trips() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- export BASIC -->
<objets version="2">
  <objet type='a'>
    <id>G1</id>
    <vide/>
    <libelle>L'école</libelle>
    <?traitement ok?>
    <note><![CDATA[<brut>]]></note>
  </objet>
</objets>
"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn test_text_is_escaped_on_write() {
        let mut doc = Document::parse("<r><libelle>x</libelle></r>").unwrap();
        let label = doc.elements_by_tag_name("libelle").next().unwrap();

        doc.set_text_content(label, "R&D <new>");

        assert_eq!(
            doc.to_xml_string().unwrap(),
            "<r><libelle>R&amp;D &lt;new&gt;</libelle></r>"
        );
    }

    #[test]
    fn test_verify_counts_elements() {
        let count = verify_well_formed("<r><id>G1</id><libelle>A</libelle></r>").unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_verify_rejects_broken_xml() {
        assert!(verify_well_formed("<r><id>G1</r>").is_err());
    }

    #[test]
    fn test_written_document_verifies() {
        let doc = Document::parse("<?xml version=\"1.0\"?>\n<r><id>G1</id><libelle>A</libelle></r>").unwrap();
        let xml = doc.to_xml_string().unwrap();
        assert_eq!(verify_well_formed(&xml).unwrap(), doc.element_count());
    }
}
