//! Attribute descriptor tables.
//!
//! Every theory variant is described by a static [`TheorySchema`]: a flat table
//! of [`AttrDef`]s emitted by the `theory!` macro. The serializer, the loader and
//! the validation layer are driven entirely by these tables.
//!
//! # Invariants
//!
//! - Attribute names are unique within a schema, and no XML attribute name
//!   collides with the reserved `id`, `char_offsets` and `edt_offsets`.
//!   - Tested by: `schema::tests::test_xml_attribute_names_are_unique`
//! - Child-bearing attributes of one schema use distinct element tags, so an
//!   element maps back to exactly one attribute on load.
//!   - Tested by: `schema::tests::test_child_tags_are_unambiguous`
//! - `Text` attributes only appear on variants that own no children.
//!   - Tested by: `schema::tests::test_text_only_on_leaves`

use crate::Variant;
use crate::scalar::{Scalar, ScalarType};


/// Attribute names the serializer reserves for every element.
pub const RESERVED_XML_NAMES: &[&str] = &["id", "char_offsets", "edt_offsets"];

/// One admissible target of a reference attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefChoice {
	/// XML attribute name for this choice; `None` uses the attribute's own name.
	pub xml_name: Option<&'static str>,
	/// Variant the referenced node must have.
	pub variant: Variant,
}

/// Joins the admissible variants of a reference with `|`, as errors report them.
pub fn variant_names(choices: &[RefChoice]) -> String {
	choices.iter().map(|c| c.variant.name()).collect::<Vec<_>>().join("|")
}

/// Kind of a declared attribute.
#[derive(Debug, Clone, Copy)]
pub enum AttrKind {
	/// Scalar stored as an XML attribute.
	Simple(ScalarType),
	/// The element's own text content.
	Text,
	/// Id-resolved pointer to one node of any listed choice.
	Reference(&'static [RefChoice]),
	/// Ordered list of id-resolved pointers.
	ReferenceList(&'static [RefChoice]),
	/// Single owned child.
	Child(Variant),
	/// Ordered owned children.
	ChildList(Variant),
}

impl AttrKind {
	/// Returns a short name for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			AttrKind::Simple(_) => "simple",
			AttrKind::Text => "text",
			AttrKind::Reference(_) => "reference",
			AttrKind::ReferenceList(_) => "reference list",
			AttrKind::Child(_) => "child",
			AttrKind::ChildList(_) => "child list",
		}
	}

	/// Returns the owned variant for child kinds.
	pub fn child_variant(&self) -> Option<Variant> {
		match self {
			AttrKind::Child(v) | AttrKind::ChildList(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the reference choices for reference kinds.
	pub fn choices(&self) -> Option<&'static [RefChoice]> {
		match self {
			AttrKind::Reference(c) | AttrKind::ReferenceList(c) => Some(c),
			_ => None,
		}
	}
}

/// Declaration of one attribute of a theory variant.
#[derive(Clone, Copy)]
pub struct AttrDef {
	/// Field name (also the XML attribute name for simple and single-target references).
	pub name: &'static str,
	/// What kind of value the attribute holds.
	pub kind: AttrKind,
	/// Must carry a value when the node is serialized.
	pub required: bool,
	/// Reference that may dangle even under strict resolution.
	pub optional: bool,
	/// Factory for the value applied at construction and when absent on load.
	pub default: Option<fn() -> Scalar>,
}

impl core::fmt::Debug for AttrDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("AttrDef")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("required", &self.required)
			.field("optional", &self.optional)
			.field("default", &self.default.map(|f| f()))
			.finish()
	}
}

impl AttrDef {
	/// Returns the XML attribute name used for the given reference choice.
	pub fn xml_name(&self, choice: &RefChoice) -> &'static str {
		choice.xml_name.unwrap_or(self.name)
	}

	/// Returns every XML attribute name this declaration may occupy.
	pub fn xml_names(&self) -> Vec<&'static str> {
		match self.kind {
			AttrKind::Simple(_) | AttrKind::ReferenceList(_) => vec![self.name],
			AttrKind::Reference(choices) => {
				let mut names: Vec<_> = choices.iter().map(|c| self.xml_name(c)).collect();
				names.dedup();
				names
			}
			AttrKind::Text | AttrKind::Child(_) | AttrKind::ChildList(_) => Vec::new(),
		}
	}
}

/// Static description of one theory variant.
#[derive(Debug)]
pub struct TheorySchema {
	/// The variant described.
	pub variant: Variant,
	/// XML element tag.
	pub tag: &'static str,
	/// Whether nodes carry character and EDT offsets.
	pub has_offsets: bool,
	/// Attributes in declaration order (also serialization order).
	pub attrs: &'static [AttrDef],
}

/// Where an XML attribute name lands in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlAttrTarget {
	/// Index of the attribute declaration.
	pub attr: usize,
	/// Index of the reference choice, for single references.
	pub choice: Option<usize>,
}

impl TheorySchema {
	/// Looks up an attribute by field name.
	pub fn attr(&self, name: &str) -> Option<(usize, &'static AttrDef)> {
		self.attrs.iter().enumerate().find(|(_, a)| a.name == name)
	}

	/// Finds the declaration an XML attribute belongs to.
	pub fn xml_attr(&self, xml_name: &str) -> Option<XmlAttrTarget> {
		self.attrs.iter().enumerate().find_map(|(attr, def)| match def.kind {
			AttrKind::Simple(_) | AttrKind::ReferenceList(_) => {
				(def.name == xml_name).then_some(XmlAttrTarget { attr, choice: None })
			}
			AttrKind::Reference(choices) => choices
				.iter()
				.position(|c| def.xml_name(c) == xml_name)
				.map(|choice| XmlAttrTarget {
					attr,
					choice: Some(choice),
				}),
			_ => None,
		})
	}

	/// Finds the child attribute that owns elements with the given tag.
	pub fn child_attr(&self, tag: &str) -> Option<usize> {
		self.attrs
			.iter()
			.position(|a| a.kind.child_variant().is_some_and(|v| v.name() == tag))
	}

	/// Returns the index of the text attribute, if any.
	pub fn text_attr(&self) -> Option<usize> {
		self.attrs.iter().position(|a| matches!(a.kind, AttrKind::Text))
	}

	/// Returns true if any attribute owns children.
	pub fn has_children(&self) -> bool {
		self.attrs.iter().any(|a| a.kind.child_variant().is_some())
	}
}
