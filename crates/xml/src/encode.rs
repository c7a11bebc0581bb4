//! Graph to SerifXML.
//!
//! Every live node becomes one element tagged with its variant name. Attributes
//! are written as `id`, `char_offsets`, `edt_offsets`, then the variant's
//! declared attributes in declaration order, so encoding the same graph always
//! yields the same bytes.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use serifxml_theory::node::{Node, RefSlot, Slot};
use serifxml_theory::schema::{AttrDef, variant_names};
use serifxml_theory::validate::first_missing;
use serifxml_theory::{Document, GraphError, NodeId, RefView, Variant};

use crate::error::{Result, SerifXmlError};
use crate::escape::{escape_attr, escape_text};

/// Tag of the outer wrapper element.
pub const ROOT_TAG: &str = "SerifXML";
/// Format version written on the wrapper element.
pub const FORMAT_VERSION: &str = "18";

enum Step {
	Open(NodeId),
	Close(&'static str),
}

/// Serializes a document.
///
/// # Errors
///
/// Returns [`GraphError::MissingRequired`] for the first node, in ownership
/// pre-order, that lacks a required attribute, and a graph error for any
/// reference whose target is unknown to `doc` or of a variant the attribute
/// rejects. Nothing is written in either case.
pub fn to_string(doc: &Document) -> Result<String> {
	let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
	write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
	let mut wrapper = BytesStart::new(ROOT_TAG);
	push_attr(&mut wrapper, "version", FORMAT_VERSION);
	write(&mut writer, Event::Start(wrapper))?;

	let mut stack = vec![Step::Open(doc.root_node())];
	let mut elements = 0usize;
	while let Some(step) = stack.pop() {
		match step {
			Step::Close(tag) => write(&mut writer, Event::End(BytesEnd::new(tag)))?,
			Step::Open(id) => {
				elements += 1;
				encode_node(doc, id, &mut writer, &mut stack)?;
			}
		}
	}

	write(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;
	let bytes = writer.into_inner();
	tracing::debug!(elements, bytes = bytes.len(), "xml.encode");
	String::from_utf8(bytes).map_err(|e| SerifXmlError::Write(e.to_string()))
}

fn encode_node(doc: &Document, id: NodeId, writer: &mut Writer<Vec<u8>>, stack: &mut Vec<Step>) -> Result<()> {
	let node = doc.node(id).ok_or(GraphError::StaleNode(id))?;
	first_missing(node)?;
	let schema = node.schema();

	let mut start = BytesStart::new(schema.tag);
	push_attr(&mut start, "id", node.id());
	if let Some(offsets) = node.offsets() {
		push_attr(&mut start, "char_offsets", &format!("{}:{}", offsets.start_char, offsets.end_char));
		push_attr(&mut start, "edt_offsets", &format!("{}:{}", offsets.start_edt, offsets.end_edt));
	}

	let mut text = None;
	let mut children = Vec::new();
	for (def, slot) in schema.attrs.iter().zip(node.slots()) {
		match slot {
			Slot::Simple(Some(value)) => push_attr(&mut start, def.name, &value.to_xml()),
			Slot::Text(Some(value)) => text = Some(value.as_str()),
			Slot::Ref(Some(target)) => {
				let view = checked_view(doc, node, def, target)?;
				push_attr(&mut start, reference_name(def, view.variant), view.id);
			}
			Slot::RefList(targets) if !targets.is_empty() => {
				push_attr(&mut start, def.name, &join_ids(doc, node, def, targets)?);
			}
			Slot::Child(Some(child)) => children.push(*child),
			Slot::Children(list) => children.extend_from_slice(list),
			_ => {}
		}
	}

	if let Some(text) = text {
		write(writer, Event::Start(start))?;
		// Always emitted, even when empty, so the writer keeps the close tag inline.
		write(writer, Event::Text(BytesText::from_escaped(escape_text(text))))?;
		write(writer, Event::End(BytesEnd::new(schema.tag)))?;
	} else if children.is_empty() {
		write(writer, Event::Empty(start))?;
	} else {
		write(writer, Event::Start(start))?;
		stack.push(Step::Close(schema.tag));
		stack.extend(children.into_iter().rev().map(Step::Open));
	}
	Ok(())
}

/// Picks the XML attribute name of the union case matching `target`.
fn reference_name(def: &AttrDef, target: Variant) -> &'static str {
	def.kind
		.choices()
		.and_then(|choices| choices.iter().find(|c| c.variant == target))
		.map_or(def.name, |choice| def.xml_name(choice))
}

/// Resolves a stored reference for writing.
///
/// A live index `doc` never issued, or a target of a variant `def` rejects,
/// would load back as a different graph or not at all, so both are errors.
fn checked_view<'a>(doc: &'a Document, holder: &Node, def: &AttrDef, slot: &'a RefSlot) -> Result<RefView<'a>> {
	let Some(view) = doc.ref_view(slot) else {
		return Err(match slot {
			RefSlot::Live(target) => GraphError::ForeignNode(*target),
			RefSlot::Dangling { id, .. } => GraphError::UnresolvedReference {
				holder: holder.id().to_owned(),
				attr: def.name,
				target: id.to_string(),
			},
		}
		.into());
	};
	let choices = def.kind.choices().unwrap_or_default();
	if choices.iter().any(|c| c.variant == view.variant) {
		return Ok(view);
	}
	Err(GraphError::TypeMismatch {
		holder: holder.id().to_owned(),
		attr: def.name,
		expected: variant_names(choices),
		target: view.id.to_owned(),
		found: view.variant,
	}
	.into())
}

fn join_ids(doc: &Document, holder: &Node, def: &AttrDef, targets: &[RefSlot]) -> Result<String> {
	let mut out = String::new();
	for target in targets {
		let view = checked_view(doc, holder, def, target)?;
		if !out.is_empty() {
			out.push(' ');
		}
		out.push_str(view.id);
	}
	Ok(out)
}

fn push_attr(start: &mut BytesStart<'_>, name: &str, value: &str) {
	let escaped = escape_attr(value);
	start.push_attribute(Attribute {
		key: QName(name.as_bytes()),
		value: Cow::Borrowed(escaped.as_bytes()),
	});
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
	writer.write_event(event).map_err(|e| SerifXmlError::Write(e.to_string()))
}
