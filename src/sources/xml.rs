//! Small element tree built on the quick-xml event reader.
//!
//! PubMed titles and abstracts are mixed content (`<i>`, `<sup>`, ...), which
//! serde-based deserialization handles poorly. This tree keeps text and child
//! elements in document order so that [`Element::text`] can concatenate them.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::SourceError;

/// A node of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Element, SourceError> {
        let mut reader = Reader::from_str(xml);
        // Synthetic document node; its first element child is the root
        let mut stack = vec![Element::default()];

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    push_child(&mut stack, Node::Element(element));
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        if let Some(element) = stack.pop() {
                            push_child(&mut stack, Node::Element(element));
                        }
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?.into_owned();
                    push_child(&mut stack, Node::Text(text));
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_child(&mut stack, Node::Text(text));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(SourceError::Parse("XML: unclosed element".to_string()));
        }
        stack
            .pop()
            .and_then(|document| {
                document.children.into_iter().find_map(|node| match node {
                    Node::Element(element) => Some(element),
                    Node::Text(_) => None,
                })
            })
            .ok_or_else(|| SourceError::Parse("XML: empty document".to_string()))
    }

    fn open(start: &BytesStart<'_>) -> Result<Element, SourceError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Value of attribute `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements named `name`
    pub fn children_named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// First element reached by a slash-separated path of child names
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }

    /// All elements reached by a slash-separated path of child names
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for step in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|element| element.children_named(step))
                .collect();
        }
        current
    }

    /// All text below this element, concatenated in document order and trimmed
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Text of the element at `path`, if it exists
    pub fn find_text(&self, path: &str) -> Option<String> {
        self.find(path).map(Element::text)
    }
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<!DOCTYPE Set>
<Set>
  <Article>
    <Title>Fast <i>ab initio</i> &amp; more</Title>
    <Id IdType="pii">S0010</Id>
    <Id IdType="doi">10.1/abc</Id>
    <Empty/>
  </Article>
</Set>"#;

    #[test]
    fn test_parse_mixed_content() {
        let root = Element::parse(DOC).unwrap();
        assert_eq!(root.name, "Set");
        assert_eq!(
            root.find_text("Article/Title").as_deref(),
            Some("Fast ab initio & more")
        );
    }

    #[test]
    fn test_attributes_and_find_all() {
        let root = Element::parse(DOC).unwrap();
        let ids = root.find_all("Article/Id");
        assert_eq!(ids.len(), 2);
        let doi = ids.iter().find(|e| e.attr("IdType") == Some("doi")).unwrap();
        assert_eq!(doi.text(), "10.1/abc");
        assert!(root.find("Article/Empty").is_some());
        assert!(root.find("Article/Missing").is_none());
    }

    #[test]
    fn test_found_elements_outlive_path() {
        let root = Element::parse(DOC).unwrap();
        let ids = {
            let path = format!("{}/{}", "Article", "Id");
            root.find_all(&path)
        };
        assert_eq!(ids.len(), 2);
        assert_eq!(root.children_named("Article").count(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a><b></a>").is_err());
    }
}
