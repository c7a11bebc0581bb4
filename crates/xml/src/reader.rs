//! Element tree built from `quick-xml` pull events.
//!
//! The decoder needs random access to an element's attributes and children
//! before it allocates graph nodes, so the event stream is folded into a
//! small owned tree first. Comments, processing instructions, the XML
//! declaration and DOCTYPE are skipped; CDATA is appended to text content.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SerifXmlError};

/// One parsed element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
	pub name: String,
	/// Attributes in source order, values unescaped.
	pub attrs: Vec<(String, String)>,
	pub children: Vec<Element>,
	/// Concatenated text content; `None` for self-closing elements.
	pub text: Option<String>,
	/// Byte offset of the start tag.
	pub offset: usize,
}

impl Element {
	/// Returns the value of an attribute.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}

	/// Returns true if the text content holds anything but whitespace.
	pub fn has_significant_text(&self) -> bool {
		self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
	}
}

/// Parses `input` into its single root element.
pub(crate) fn parse(input: &str) -> Result<Element> {
	let mut reader = Reader::from_str(input);
	let mut stack: Vec<Element> = Vec::new();
	let mut root: Option<Element> = None;

	loop {
		let offset = position(&reader);
		let event = reader.read_event().map_err(|e| syntax(position(&reader), e))?;
		match event {
			Event::Start(start) => {
				let mut element = open(&start, offset)?;
				element.text = Some(String::new());
				stack.push(element);
			}
			Event::Empty(start) => {
				let element = open(&start, offset)?;
				attach(&mut stack, &mut root, element)?;
			}
			Event::End(_) => {
				let element = stack.pop().ok_or_else(|| syntax(offset, "unmatched end tag"))?;
				attach(&mut stack, &mut root, element)?;
			}
			Event::Text(text) => {
				let text = text.unescape().map_err(|e| syntax(offset, e))?;
				append_text(&mut stack, &text, offset)?;
			}
			Event::CData(data) => {
				let text = std::str::from_utf8(&data).map_err(|e| syntax(offset, e))?;
				append_text(&mut stack, text, offset)?;
			}
			Event::Eof => break,
			_ => {}
		}
	}

	if let Some(open) = stack.last() {
		return Err(syntax(open.offset, format!("<{}> is never closed", open.name)));
	}
	root.ok_or_else(|| syntax(0, "no root element"))
}

fn open(start: &BytesStart<'_>, offset: usize) -> Result<Element> {
	let name = std::str::from_utf8(start.name().as_ref())
		.map_err(|e| syntax(offset, e))?
		.to_owned();
	let mut attrs = Vec::new();
	for attr in start.attributes() {
		let attr = attr.map_err(|e| syntax(offset, e))?;
		let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| syntax(offset, e))?;
		let value = attr.unescape_value().map_err(|e| syntax(offset, e))?;
		attrs.push((key.to_owned(), value.into_owned()));
	}
	Ok(Element {
		name,
		attrs,
		children: Vec::new(),
		text: None,
		offset,
	})
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
	if let Some(parent) = stack.last_mut() {
		parent.children.push(element);
		return Ok(());
	}
	if root.is_some() {
		return Err(syntax(element.offset, "more than one root element"));
	}
	*root = Some(element);
	Ok(())
}

fn append_text(stack: &mut [Element], text: &str, offset: usize) -> Result<()> {
	match stack.last_mut() {
		Some(parent) => {
			parent.text.get_or_insert_with(String::new).push_str(text);
			Ok(())
		}
		None if text.trim().is_empty() => Ok(()),
		None => Err(syntax(offset, "text outside the root element")),
	}
}

fn position(reader: &Reader<&[u8]>) -> usize {
	usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn syntax(offset: usize, message: impl ToString) -> SerifXmlError {
	SerifXmlError::Syntax {
		offset,
		message: message.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builds_tree_with_text_and_cdata() {
		let root = parse(r#"<?xml version="1.0"?><!-- c --><a x="1 &amp; 2"><b/><c>hi <![CDATA[<raw>]]>&#33;</c></a>"#)
			.expect("well-formed");
		assert_eq!(root.name, "a");
		assert_eq!(root.attr("x"), Some("1 & 2"));
		assert_eq!(root.children.len(), 2);
		assert_eq!(root.children[0].text, None);
		assert_eq!(root.children[1].text.as_deref(), Some("hi <raw>!"));
	}

	#[test]
	fn test_empty_pair_keeps_empty_text() {
		let root = parse("<a></a>").expect("well-formed");
		assert_eq!(root.text.as_deref(), Some(""));
		assert!(!root.has_significant_text());
	}

	#[test]
	fn test_rejects_malformed_input() {
		assert!(matches!(parse("<a><b></a>"), Err(SerifXmlError::Syntax { .. })));
		assert!(matches!(parse("<a>"), Err(SerifXmlError::Syntax { .. })));
		assert!(matches!(parse("<a/><b/>"), Err(SerifXmlError::Syntax { .. })));
		assert!(matches!(parse(""), Err(SerifXmlError::Syntax { .. })));
		assert!(matches!(parse("<a x='1' x='2'/>"), Err(SerifXmlError::Syntax { .. })));
	}
}
