use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use crate::error::PolicyParseError;
use crate::error::Result;

/// Minimal owned element tree: enough structure to walk a policy document by
/// element name without binding to a fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Local name, without any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text and CDATA content, entities resolved, whitespace untouched.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Parses a complete document and returns its root element.
    pub fn parse(document: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(document);
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| PolicyParseError::MalformedXml(err.to_string()))?;
            match event {
                Event::Start(start) => open.push(XmlElement::new(local_name(&start))),
                Event::Empty(start) => {
                    attach(&mut open, &mut root, XmlElement::new(local_name(&start)))?;
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| {
                        PolicyParseError::MalformedXml("unexpected closing tag".to_string())
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = open.last_mut() {
                        let decoded = text
                            .decode()
                            .map_err(|err| PolicyParseError::MalformedXml(err.to_string()))?;
                        current.text.push_str(&decoded);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&cdata));
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&resolve_reference(&reference)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(PolicyParseError::MalformedXml(format!(
                "element `{}` is never closed",
                unclosed.name
            )));
        }
        root.ok_or(PolicyParseError::EmptyDocument)
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(PolicyParseError::MalformedXml(format!(
            "unexpected second root element `{}`",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| PolicyParseError::MalformedXml(err.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = reference
        .decode()
        .map_err(|err| PolicyParseError::MalformedXml(err.to_string()))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| PolicyParseError::MalformedXml(format!("unknown entity `&{name};`")))
}
