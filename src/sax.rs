//! SAX-style tokenizer adapter over `quick-xml`.
//!
//! Turns the pull-style event stream into push callbacks on a
//! [`SaxHandler`]. Adjacent text and entity references are coalesced into a
//! single `characters` call, entity references are expanded through the
//! document's [`EntityTable`], and `<!ENTITY>` declarations in the DOCTYPE
//! internal subset are registered before the root element is seen.

use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};

use crate::context::Attributes;
use crate::entities::EntityTable;
use crate::error::{Error, Result};

/// Receiver of tokenizer callbacks, in document order.
pub trait SaxHandler {
    fn start_document(&mut self) {}

    fn end_document(&mut self) {}

    fn start_element(&mut self, name: &str, attrs: Attributes);

    fn end_element(&mut self, name: &str);

    fn characters(&mut self, text: &str);

    fn cdata_block(&mut self, text: &str) {
        self.characters(text);
    }

    fn comment(&mut self, _text: &str) {}

    /// An entity reference with no definition. Its literal `&name;` form
    /// is delivered as character data.
    fn unresolved_entity(&mut self, _name: &str) {}
}

/// Run the tokenizer over `source`, delivering callbacks to `handler`.
///
/// Any tokenizer error is fatal and aborts the walk. Elements still open
/// at the end of input count as one.
pub fn parse<H: SaxHandler>(source: &str, handler: &mut H) -> Result<()> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut entities = EntityTable::new();
    let mut text = String::new();
    let mut open: Vec<String> = Vec::new();

    handler.start_document();
    loop {
        let event = reader.read_event().map_err(|source| Error::Xml {
            position: reader.error_position(),
            source,
        })?;

        match event {
            Event::Text(e) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
                continue;
            }
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(e.as_ref());
                match entities.resolve(&name) {
                    Some(value) => text.push_str(&value),
                    None => {
                        log::debug!(target: "db2html.sax", "unresolved entity &{name};");
                        handler.unresolved_entity(&name);
                        text.push('&');
                        text.push_str(&name);
                        text.push(';');
                    }
                }
                continue;
            }
            _ => {}
        }

        flush_text(&mut text, handler);

        match event {
            Event::Start(e) => {
                let (name, attrs) = element_parts(&e, &entities, reader.buffer_position())?;
                handler.start_element(&name, attrs);
                open.push(name);
            }
            Event::Empty(e) => {
                let (name, attrs) = element_parts(&e, &entities, reader.buffer_position())?;
                handler.start_element(&name, attrs);
                handler.end_element(&name);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                open.pop();
                handler.end_element(&name);
            }
            Event::CData(e) => {
                handler.cdata_block(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::Comment(e) => {
                handler.comment(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::DocType(e) => {
                entities.register_internal_subset(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::Eof => {
                if let Some(name) = open.pop() {
                    return Err(Error::Xml {
                        position: reader.buffer_position(),
                        source: quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(name)),
                    });
                }
                break;
            }
            _ => {}
        }
    }
    handler.end_document();

    Ok(())
}

fn flush_text<H: SaxHandler>(text: &mut String, handler: &mut H) {
    if !text.is_empty() {
        handler.characters(text);
        text.clear();
    }
}

fn element_parts(
    e: &BytesStart<'_>,
    entities: &EntityTable,
    position: u64,
) -> Result<(String, Attributes)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Xml {
            position,
            source: quick_xml::Error::InvalidAttr(err),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = entities.expand(&String::from_utf8_lossy(&attr.value));
        attrs.push(key, value);
    }
    Ok((name, attrs))
}
