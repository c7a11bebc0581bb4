//! SerifXML to graph.
//!
//! Decoding maps each element onto the schema of its variant: attributes by
//! XML name, child elements by tag. References are only recorded here; the
//! builder resolves them once every node exists, so forward references need
//! no special handling.
//!
//! The whole input is trimmed before parsing. That is the one normalization
//! applied; text content and attribute values are kept verbatim.

use serifxml_theory::schema::{AttrKind, TheorySchema};
use serifxml_theory::validate::first_missing;
use serifxml_theory::{Document, DocumentBuilder, GraphError, NodeId, Offsets, ResolveOptions, Variant};

use crate::encode::ROOT_TAG;
use crate::error::{Result, SerifXmlError};
use crate::reader::{self, Element};

/// Options for loading a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
	/// Reject references to absent ids instead of keeping them dangling.
	/// Attributes declared optional may still dangle.
	pub strict_references: bool,
}

impl From<LoadOptions> for ResolveOptions {
	fn from(options: LoadOptions) -> Self {
		ResolveOptions {
			strict_references: options.strict_references,
		}
	}
}

/// Parses a SerifXML document.
///
/// # Errors
///
/// - [`SerifXmlError::Syntax`] for malformed XML.
/// - [`SerifXmlError::UnexpectedElement`], [`SerifXmlError::UnknownAttribute`],
///   [`SerifXmlError::InvalidValue`] and [`SerifXmlError::ConflictingUnion`]
///   when the input does not fit the schema.
/// - [`SerifXmlError::Graph`] for duplicate ids, type mismatches,
///   unresolved references under strict loading and missing required values.
pub fn from_str(input: &str, options: &LoadOptions) -> Result<Document> {
	let wrapper = reader::parse(input.trim())?;
	let document = document_element(&wrapper)?;

	let mut builder = DocumentBuilder::new();
	let root = builder.root(element_id(document)?)?;
	let mut stack = vec![(document, root, Variant::Document)];
	while let Some((element, node, variant)) = stack.pop() {
		let schema = variant.schema();
		apply_attributes(&mut builder, element, node, schema)?;
		apply_text(&mut builder, element, node, schema)?;

		let mut children = Vec::with_capacity(element.children.len());
		for child in &element.children {
			let (attr, child_variant) = schema
				.child_attr(&child.name)
				.and_then(|attr| Some((attr, schema.attrs[attr].kind.child_variant()?)))
				.ok_or_else(|| unexpected(element, child))?;
			let child_node = builder.child(node, attr, element_id(child)?)?;
			children.push((child, child_node, child_variant));
		}
		stack.extend(children.into_iter().rev());
	}

	let doc = builder.finish((*options).into())?;
	for id in doc.walk() {
		if let Some(node) = doc.node(id) {
			first_missing(node)?;
		}
	}
	tracing::debug!(nodes = doc.len(), docid = ?doc.docid(), "xml.decode");
	Ok(doc)
}

/// Checks the wrapper and returns its single `Document` element.
fn document_element(wrapper: &Element) -> Result<&Element> {
	if wrapper.name != ROOT_TAG {
		return Err(SerifXmlError::UnexpectedElement {
			parent: String::new(),
			element: wrapper.name.clone(),
			offset: wrapper.offset,
		});
	}
	if let Some((attr, _)) = wrapper.attrs.iter().find(|(k, _)| k != "version") {
		return Err(SerifXmlError::UnknownAttribute {
			element: wrapper.name.clone(),
			attr: attr.clone(),
		});
	}
	if wrapper.has_significant_text() {
		return Err(SerifXmlError::UnexpectedText {
			element: wrapper.name.clone(),
			offset: wrapper.offset,
		});
	}
	let mut documents = wrapper.children.iter();
	let document = documents.next().ok_or(GraphError::MissingRoot)?;
	if let Some(extra) = documents.next() {
		return Err(unexpected(wrapper, extra));
	}
	if document.name != Variant::Document.name() {
		return Err(unexpected(wrapper, document));
	}
	Ok(document)
}

fn apply_attributes(builder: &mut DocumentBuilder, element: &Element, node: NodeId, schema: &TheorySchema) -> Result<()> {
	let mut char_span = None;
	let mut edt_span = None;
	let mut seen_refs: Vec<usize> = Vec::new();

	for (name, value) in &element.attrs {
		match name.as_str() {
			"id" => {}
			"char_offsets" if schema.has_offsets => char_span = Some(parse_span(element, name, value)?),
			"edt_offsets" if schema.has_offsets => edt_span = Some(parse_span(element, name, value)?),
			_ => {
				let target = schema.xml_attr(name).ok_or_else(|| SerifXmlError::UnknownAttribute {
					element: element.name.clone(),
					attr: name.clone(),
				})?;
				let def = &schema.attrs[target.attr];
				match def.kind {
					AttrKind::Simple(ty) => {
						let scalar = (ty.parse)(value).ok_or_else(|| SerifXmlError::InvalidValue {
							element: element.name.clone(),
							attr: name.clone(),
							value: value.clone(),
							expected: ty.name,
						})?;
						builder.set_scalar(node, target.attr, scalar)?;
					}
					AttrKind::Reference(_) => {
						if seen_refs.contains(&target.attr) {
							return Err(SerifXmlError::ConflictingUnion {
								element: element.name.clone(),
								attr: def.name,
							});
						}
						seen_refs.push(target.attr);
						builder.defer_reference(node, target.attr, target.choice.unwrap_or(0), value.as_str())?;
					}
					AttrKind::ReferenceList(_) => {
						let ids = value.split_whitespace().map(str::to_owned).collect();
						builder.defer_reference_list(node, target.attr, ids)?;
					}
					AttrKind::Text | AttrKind::Child(_) | AttrKind::ChildList(_) => {
						return Err(SerifXmlError::UnknownAttribute {
							element: element.name.clone(),
							attr: name.clone(),
						});
					}
				}
			}
		}
	}

	match (char_span, edt_span) {
		(Some((start, end)), edt) => {
			let mut offsets = Offsets::new(start, end);
			if let Some((start_edt, end_edt)) = edt {
				offsets = offsets.with_edt(start_edt, end_edt);
			}
			builder.set_offsets(node, offsets)?;
		}
		(None, Some(_)) => {
			return Err(SerifXmlError::InvalidValue {
				element: element.name.clone(),
				attr: "char_offsets".to_owned(),
				value: String::new(),
				expected: "offset span",
			});
		}
		(None, None) => {}
	}
	Ok(())
}

fn apply_text(builder: &mut DocumentBuilder, element: &Element, node: NodeId, schema: &TheorySchema) -> Result<()> {
	match (schema.text_attr(), &element.text) {
		(Some(attr), Some(text)) => builder.set_text(node, attr, text.clone())?,
		(None, _) if element.has_significant_text() => {
			return Err(SerifXmlError::UnexpectedText {
				element: element.name.clone(),
				offset: element.offset,
			});
		}
		_ => {}
	}
	Ok(())
}

/// Parses an inclusive `start:end` span.
fn parse_span(element: &Element, attr: &str, value: &str) -> Result<(usize, usize)> {
	value
		.split_once(':')
		.and_then(|(start, end)| Some((start.parse().ok()?, end.parse().ok()?)))
		.ok_or_else(|| SerifXmlError::InvalidValue {
			element: element.name.clone(),
			attr: attr.to_owned(),
			value: value.to_owned(),
			expected: "offset span",
		})
}

fn element_id(element: &Element) -> Result<&str> {
	element.attr("id").ok_or_else(|| SerifXmlError::MissingId {
		element: element.name.clone(),
		offset: element.offset,
	})
}

fn unexpected(parent: &Element, child: &Element) -> SerifXmlError {
	SerifXmlError::UnexpectedElement {
		parent: parent.name.clone(),
		element: child.name.clone(),
		offset: child.offset,
	}
}
