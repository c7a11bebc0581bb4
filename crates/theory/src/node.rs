//! Arena node storage.

use smallvec::SmallVec;

use crate::Variant;
use crate::error::{GraphError, Result};
use crate::scalar::Scalar;
use crate::schema::{AttrDef, AttrKind, TheorySchema};

/// Index of a node in its document's arena.
///
/// Indices are never reused within a document, so a stale index always finds
/// the tombstone of the node it once named. Each index also carries the stamp
/// of the document that issued it; another document treats it as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	stamp: u32,
	index: u32,
}

impl NodeId {
	pub(crate) fn new(stamp: u32, index: usize) -> Self {
		Self {
			stamp,
			index: index as u32,
		}
	}

	/// Returns the arena index.
	#[inline]
	pub fn index(self) -> usize {
		self.index as usize
	}

	/// Returns the stamp of the issuing document.
	#[inline]
	pub(crate) fn stamp(self) -> u32 {
		self.stamp
	}
}

/// Raw and markup-corrected character spans, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offsets {
	/// First character in the raw document text.
	pub start_char: usize,
	/// Last character in the raw document text.
	pub end_char: usize,
	/// First character once inline markup is removed.
	pub start_edt: usize,
	/// Last character once inline markup is removed.
	pub end_edt: usize,
}

impl Offsets {
	/// Creates offsets whose EDT span equals the raw span.
	pub fn new(start_char: usize, end_char: usize) -> Self {
		Self {
			start_char,
			end_char,
			start_edt: start_char,
			end_edt: end_char,
		}
	}

	/// Returns the offsets with a different EDT span.
	pub fn with_edt(self, start_edt: usize, end_edt: usize) -> Self {
		Self {
			start_edt,
			end_edt,
			..self
		}
	}

	/// Checks `start <= end` for both spans.
	pub fn check(&self, id: &str) -> Result<()> {
		if self.start_char > self.end_char {
			return Err(GraphError::InvalidOffsets {
				id: id.to_owned(),
				start: self.start_char,
				end: self.end_char,
			});
		}
		if self.start_edt > self.end_edt {
			return Err(GraphError::InvalidOffsets {
				id: id.to_owned(),
				start: self.start_edt,
				end: self.end_edt,
			});
		}
		Ok(())
	}
}

/// Stored form of one reference.
#[derive(Debug, Clone, PartialEq)]
pub enum RefSlot {
	/// Points at a node in the arena (possibly since removed).
	Live(NodeId),
	/// Id that never resolved on load.
	Dangling {
		/// The unresolved id.
		id: Box<str>,
		/// Variant the reference was declared to hold.
		variant: Variant,
	},
}

/// Storage for one declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
	/// Simple attribute value.
	Simple(Option<Scalar>),
	/// Text content.
	Text(Option<String>),
	/// Single reference.
	Ref(Option<RefSlot>),
	/// Reference list.
	RefList(Vec<RefSlot>),
	/// Single owned child.
	Child(Option<NodeId>),
	/// Owned children in order.
	Children(Vec<NodeId>),
}

impl Slot {
	/// Creates the initial slot for a declaration, applying its default.
	pub(crate) fn initial(def: &AttrDef) -> Self {
		match def.kind {
			AttrKind::Simple(_) => Slot::Simple(def.default.map(|f| f())),
			AttrKind::Text => Slot::Text(None),
			AttrKind::Reference(_) => Slot::Ref(None),
			AttrKind::ReferenceList(_) => Slot::RefList(Vec::new()),
			AttrKind::Child(_) => Slot::Child(None),
			AttrKind::ChildList(_) => Slot::Children(Vec::new()),
		}
	}

	/// Returns true if the slot carries no value.
	pub fn is_empty(&self) -> bool {
		match self {
			Slot::Simple(v) => v.is_none(),
			Slot::Text(v) => v.is_none(),
			Slot::Ref(v) => v.is_none(),
			Slot::RefList(v) => v.is_empty(),
			Slot::Child(v) => v.is_none(),
			Slot::Children(v) => v.is_empty(),
		}
	}
}

/// A live theory node.
#[derive(Debug, Clone)]
pub struct Node {
	pub(crate) variant: Variant,
	pub(crate) id: Box<str>,
	pub(crate) owner: Option<NodeId>,
	pub(crate) offsets: Option<Offsets>,
	pub(crate) slots: Box<[Slot]>,
}

impl Node {
	pub(crate) fn new(variant: Variant, id: Box<str>, owner: Option<NodeId>) -> Self {
		let slots = variant.schema().attrs.iter().map(Slot::initial).collect();
		Self {
			variant,
			id,
			owner,
			offsets: None,
			slots,
		}
	}

	/// Returns the node's variant.
	#[inline]
	pub fn variant(&self) -> Variant {
		self.variant
	}

	/// Returns the node's schema.
	#[inline]
	pub fn schema(&self) -> &'static TheorySchema {
		self.variant.schema()
	}

	/// Returns the document-unique id.
	#[inline]
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns the owning node, `None` for the root.
	#[inline]
	pub fn owner(&self) -> Option<NodeId> {
		self.owner
	}

	/// Returns the offsets of offset-bearing variants.
	#[inline]
	pub fn offsets(&self) -> Option<Offsets> {
		self.offsets
	}

	/// Returns all attribute slots in declaration order.
	#[inline]
	pub fn slots(&self) -> &[Slot] {
		&self.slots
	}

	/// Returns owned children in declaration and list order.
	pub fn owned(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.slots.iter().flat_map(|slot| {
			let ids: SmallVec<[NodeId; 4]> = match slot {
				Slot::Child(Some(id)) => SmallVec::from_elem(*id, 1),
				Slot::Children(ids) => ids.iter().copied().collect(),
				_ => SmallVec::new(),
			};
			ids
		})
	}

	/// Returns every arena index this node's references point at.
	pub fn referenced(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.slots.iter().flat_map(|slot| {
			let ids: SmallVec<[NodeId; 4]> = match slot {
				Slot::Ref(Some(RefSlot::Live(id))) => SmallVec::from_elem(*id, 1),
				Slot::RefList(refs) => refs
					.iter()
					.filter_map(|r| match r {
						RefSlot::Live(id) => Some(*id),
						RefSlot::Dangling { .. } => None,
					})
					.collect(),
				_ => SmallVec::new(),
			};
			ids
		})
	}
}

/// Arena entry.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
	Live(Node),
	/// Tombstone keeping what references to a removed node need to serialize.
	Removed { id: Box<str>, variant: Variant },
}
