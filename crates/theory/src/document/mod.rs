//! The per-document arena.
//!
//! # Mental Model
//!
//! A [`Document`] owns every node of one annotation graph in a single arena.
//! Ownership is arena metadata: each node records its owner, and the owner's
//! child slot lists it. References are arena indices (or dangling ids) and
//! never imply ownership, so reference cycles cannot keep anything alive.
//!
//! Removing a node replaces its arena entry with a tombstone that keeps the id
//! and variant. Arena indices are never reused, so a reference to a removed
//! node reads as [`Ref::Dangling`] and still serializes its original id.
//!
//! Every document draws a process-unique stamp that its [`NodeId`]s carry.
//! A handle from another document never resolves here, and reference setters
//! reject it. A clone keeps the stamp, so handles taken before a snapshot stay
//! valid once the snapshot is restored.
//!
//! # Invariants
//!
//! - Ids are unique among live nodes.
//!   - Enforced in: [`Document::generate_id`], [`crate::builder::DocumentBuilder`].
//!   - Tested by: `document::tests::test_generated_ids_are_unique`
//! - Ownership forms a tree rooted at the `Document` node.
//!   - Enforced in: [`Document::construct_child`], [`Document::add_child`], [`Document::detach`].
//!   - Tested by: `document::tests::test_ownership_is_a_tree`
//! - Replacing a child list keeps the owner's id.
//!   - Tested by: `document::tests::test_replace_all_keeps_sequence_identity`
//! - A live reference always names a node of this document whose variant the
//!   attribute admits.
//!   - Enforced in: [`Document::set_reference`], [`Document::set_reference_list`],
//!     [`Document::push_reference`]
//!   - Tested by: `document::tests::test_foreign_handle_is_rejected`,
//!     `document::tests::test_wrong_variant_target_is_rejected`

use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{GraphError, Result};
use crate::node::{Entry, Node, NodeId, Offsets, RefSlot, Slot};
use crate::reference::{Dangling, DanglingReference, Ref, RefTarget};
use crate::scalar::{Scalar, ScalarValue};
use crate::schema::variant_names;
use crate::theories::DocTheory;
use crate::{Theory, Variant};


/// Prefix of generated ids.
const ID_PREFIX: char = 'a';

fn next_stamp() -> u32 {
	static NEXT: AtomicU32 = AtomicU32::new(0);
	NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Resolved view of a stored reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefView<'a> {
	/// Target id as written to XML.
	pub id: &'a str,
	/// Target variant (declared variant for dangling references).
	pub variant: Variant,
	/// Arena index while the target is live.
	pub live: Option<NodeId>,
}

/// One annotation graph rooted at a `Document` theory node.
#[derive(Debug, Clone)]
pub struct Document {
	entries: Vec<Entry>,
	index: FxHashMap<Box<str>, NodeId>,
	next_id: u64,
	root: NodeId,
	stamp: u32,
}

impl Document {
	/// Creates a document with an empty root node.
	pub fn new(docid: impl Into<String>) -> Self {
		let mut doc = Self::empty();
		let root = doc.alloc(Variant::Document, None);
		doc.root = root;
		doc.root().set_docid(&mut doc, docid);
		doc
	}

	pub(crate) fn empty() -> Self {
		let stamp = next_stamp();
		Self {
			entries: Vec::new(),
			index: FxHashMap::default(),
			next_id: 0,
			root: NodeId::new(stamp, 0),
			stamp,
		}
	}

	/// Returns the root theory.
	#[inline]
	pub fn root(&self) -> DocTheory {
		DocTheory::from_node(self.root)
	}

	/// Returns the arena index of the root.
	#[inline]
	pub fn root_node(&self) -> NodeId {
		self.root
	}

	/// Returns the document id stored on the root.
	pub fn docid(&self) -> Option<String> {
		self.root().docid(self)
	}

	/// Issues a fresh id, unique among every id this document has seen.
	pub fn generate_id(&mut self) -> String {
		loop {
			let candidate = format!("{ID_PREFIX}{}", self.next_id);
			self.next_id += 1;
			if !self.index.contains_key(candidate.as_str()) {
				return candidate;
			}
		}
	}

	/// Advances the id counter past `next`.
	pub(crate) fn seed_ids(&mut self, next: u64) {
		self.next_id = self.next_id.max(next);
	}

	/// Parses the counter of a generated-style id (`a17` gives 17).
	pub(crate) fn id_counter(id: &str) -> Option<u64> {
		id.strip_prefix(ID_PREFIX)?.parse().ok()
	}

	/// Allocates a node with a generated id.
	pub(crate) fn alloc(&mut self, variant: Variant, owner: Option<NodeId>) -> NodeId {
		let id = self.generate_id();
		self.insert(variant, id.into_boxed_str(), owner)
	}

	/// Inserts a node under an id the caller has checked to be unused.
	pub(crate) fn insert(&mut self, variant: Variant, id: Box<str>, owner: Option<NodeId>) -> NodeId {
		let node = NodeId::new(self.stamp, self.entries.len());
		self.index.insert(id.clone(), node);
		self.entries.push(Entry::Live(Node::new(variant, id, owner)));
		node
	}

	pub(crate) fn set_root(&mut self, root: NodeId) {
		self.root = root;
	}

	/// Allocates a node owned by `owner`, or a tombstone if `owner` is gone.
	fn alloc_owned(&mut self, owner: NodeId, variant: Variant) -> NodeId {
		if self.node(owner).is_some() {
			return self.alloc(variant, Some(owner));
		}
		tracing::debug!(?owner, %variant, "theory.alloc under removed owner");
		let id = self.generate_id();
		let node = NodeId::new(self.stamp, self.entries.len());
		self.entries.push(Entry::Removed {
			id: id.into_boxed_str(),
			variant,
		});
		node
	}

	/// Returns the arena entry, live or removed, if `node` was issued here.
	#[inline]
	fn entry(&self, node: NodeId) -> Option<&Entry> {
		if node.stamp() != self.stamp {
			return None;
		}
		self.entries.get(node.index())
	}

	#[inline]
	fn entry_mut(&mut self, node: NodeId) -> Option<&mut Entry> {
		if node.stamp() != self.stamp {
			return None;
		}
		self.entries.get_mut(node.index())
	}

	/// Returns true if `node` was issued by this document, live or removed.
	pub fn owns(&self, node: NodeId) -> bool {
		self.entry(node).is_some()
	}

	/// Returns a live node.
	#[inline]
	pub fn node(&self, node: NodeId) -> Option<&Node> {
		match self.entry(node) {
			Some(Entry::Live(n)) => Some(n),
			_ => None,
		}
	}

	#[inline]
	pub(crate) fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
		match self.entry_mut(node) {
			Some(Entry::Live(n)) => Some(n),
			_ => None,
		}
	}

	/// Looks up a live node by id.
	#[inline]
	pub fn lookup(&self, id: &str) -> Option<NodeId> {
		self.index.get(id).copied()
	}

	/// Looks up a live node by id as a typed handle.
	///
	/// # Errors
	///
	/// Returns [`GraphError::TypeMismatch`] if the id names a node of another variant.
	pub fn get<T: Theory>(&self, id: &str) -> Result<Option<T>> {
		let Some(node) = self.lookup(id) else {
			return Ok(None);
		};
		let found = self.node(node).map(Node::variant);
		match found {
			Some(variant) if variant == T::VARIANT => Ok(Some(T::from_node(node))),
			Some(variant) => Err(GraphError::TypeMismatch {
				holder: self.root_id().to_owned(),
				attr: "lookup",
				expected: T::VARIANT.name().to_owned(),
				target: id.to_owned(),
				found: variant,
			}),
			None => Ok(None),
		}
	}

	fn root_id(&self) -> &str {
		self.node(self.root).map(Node::id).unwrap_or_default()
	}

	/// Returns the number of live nodes.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns true if the document holds no nodes.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Iterates live nodes in allocation order.
	pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
		self.entries.iter().enumerate().filter_map(|(i, e)| match e {
			Entry::Live(n) => Some((NodeId::new(self.stamp, i), n)),
			Entry::Removed { .. } => None,
		})
	}

	/// Returns live nodes reachable through ownership, in pre-order.
	pub fn walk(&self) -> Vec<NodeId> {
		let mut order = Vec::with_capacity(self.index.len());
		let mut stack = vec![self.root];
		while let Some(id) = stack.pop() {
			let Some(node) = self.node(id) else {
				continue;
			};
			order.push(id);
			let owned: SmallVec<[NodeId; 8]> = node.owned().collect();
			stack.extend(owned.into_iter().rev());
		}
		order
	}

	/// Walks strictly upward to the nearest owner of variant `T`.
	pub fn owner_with_type<T: Theory>(&self, node: NodeId) -> Option<T> {
		let mut current = self.node(node)?.owner;
		while let Some(id) = current {
			let owner = self.node(id)?;
			if owner.variant == T::VARIANT {
				return Some(T::from_node(id));
			}
			current = owner.owner;
		}
		None
	}

	/// Returns the offsets of a node.
	pub fn offsets(&self, node: NodeId) -> Option<Offsets> {
		self.node(node)?.offsets
	}

	/// Sets the offsets of an offset-bearing node.
	///
	/// # Errors
	///
	/// Fails if the node is gone, its variant carries no offsets, or either
	/// span has `start > end`.
	pub fn set_offsets(&mut self, node: NodeId, offsets: Offsets) -> Result<()> {
		let target = self.node_mut(node).ok_or(GraphError::StaleNode(node))?;
		if !target.schema().has_offsets {
			return Err(GraphError::NoOffsets(target.variant));
		}
		offsets.check(&target.id)?;
		target.offsets = Some(offsets);
		Ok(())
	}

	/// Returns a stored attribute slot.
	#[inline]
	pub fn slot(&self, node: NodeId, attr: usize) -> Option<&Slot> {
		self.node(node)?.slots.get(attr)
	}

	#[inline]
	fn slot_mut(&mut self, node: NodeId, attr: usize) -> Option<&mut Slot> {
		self.node_mut(node)?.slots.get_mut(attr)
	}

	/// Returns a simple attribute value.
	pub fn simple(&self, node: NodeId, attr: usize) -> Option<&Scalar> {
		match self.slot(node, attr)? {
			Slot::Simple(value) => value.as_ref(),
			_ => None,
		}
	}

	pub(crate) fn simple_value<T: ScalarValue>(&self, node: NodeId, attr: usize) -> Option<T> {
		self.simple(node, attr).and_then(T::from_scalar)
	}

	pub(crate) fn set_simple(&mut self, node: NodeId, attr: usize, value: Scalar) {
		if let Some(Slot::Simple(slot)) = self.slot_mut(node, attr) {
			*slot = Some(value);
		}
	}

	/// Returns a text attribute value.
	pub fn text(&self, node: NodeId, attr: usize) -> Option<&str> {
		match self.slot(node, attr)? {
			Slot::Text(value) => value.as_deref(),
			_ => None,
		}
	}

	pub(crate) fn set_text(&mut self, node: NodeId, attr: usize, value: String) {
		if let Some(Slot::Text(slot)) = self.slot_mut(node, attr) {
			*slot = Some(value);
		}
	}

	/// Describes the target of a stored reference.
	pub fn ref_view<'a>(&'a self, slot: &'a RefSlot) -> Option<RefView<'a>> {
		match slot {
			RefSlot::Live(target) => match self.entry(*target)? {
				Entry::Live(node) => Some(RefView {
					id: &node.id,
					variant: node.variant,
					live: Some(*target),
				}),
				Entry::Removed { id, variant } => Some(RefView {
					id,
					variant: *variant,
					live: None,
				}),
			},
			RefSlot::Dangling { id, variant } => Some(RefView {
				id,
				variant: *variant,
				live: None,
			}),
		}
	}

	/// Resolves a stored reference to a typed value or the dangling sentinel.
	pub fn resolve<T: RefTarget>(&self, slot: &RefSlot) -> Option<Ref<T>> {
		let view = self.ref_view(slot)?;
		let resolved = view.live.and_then(|node| T::from_parts(view.variant, node));
		Some(match resolved {
			Some(target) => Ref::Resolved(target),
			None => Ref::Dangling(Dangling {
				id: view.id.to_owned(),
				variant: view.variant,
			}),
		})
	}

	pub(crate) fn reference<T: RefTarget>(&self, node: NodeId, attr: usize) -> Option<Ref<T>> {
		match self.slot(node, attr)? {
			Slot::Ref(Some(r)) => self.resolve(r),
			_ => None,
		}
	}

	pub(crate) fn reference_list<T: RefTarget>(&self, node: NodeId, attr: usize) -> Vec<Ref<T>> {
		match self.slot(node, attr) {
			Some(Slot::RefList(refs)) => refs.iter().filter_map(|r| self.resolve(r)).collect(),
			_ => Vec::new(),
		}
	}

	/// Points a single-reference slot at `target`.
	///
	/// A removed holder ignores the write.
	///
	/// # Errors
	///
	/// - [`GraphError::ForeignNode`] if `target` was issued by another document.
	/// - [`GraphError::TypeMismatch`] if the attribute rejects the target's variant.
	pub fn set_reference(&mut self, node: NodeId, attr: usize, target: NodeId) -> Result<()> {
		if self.node(node).is_none() {
			return Ok(());
		}
		self.check_target(node, attr, target)?;
		if let Some(Slot::Ref(slot)) = self.slot_mut(node, attr) {
			*slot = Some(RefSlot::Live(target));
		}
		Ok(())
	}

	/// Replaces a reference-list slot. Nothing is written if any target is rejected.
	///
	/// # Errors
	///
	/// As [`Document::set_reference`].
	pub fn set_reference_list(&mut self, node: NodeId, attr: usize, targets: Vec<NodeId>) -> Result<()> {
		if self.node(node).is_none() {
			return Ok(());
		}
		for &target in &targets {
			self.check_target(node, attr, target)?;
		}
		if let Some(Slot::RefList(slot)) = self.slot_mut(node, attr) {
			*slot = targets.into_iter().map(RefSlot::Live).collect();
		}
		Ok(())
	}

	/// Appends to a reference-list slot.
	///
	/// # Errors
	///
	/// As [`Document::set_reference`].
	pub fn push_reference(&mut self, node: NodeId, attr: usize, target: NodeId) -> Result<()> {
		if self.node(node).is_none() {
			return Ok(());
		}
		self.check_target(node, attr, target)?;
		if let Some(Slot::RefList(slot)) = self.slot_mut(node, attr) {
			slot.push(RefSlot::Live(target));
		}
		Ok(())
	}

	/// Checks that `target` belongs to this document and that the reference
	/// attribute `attr` of live `holder` admits its variant.
	fn check_target(&self, holder: NodeId, attr: usize, target: NodeId) -> Result<()> {
		let node = self.node(holder).ok_or(GraphError::StaleNode(holder))?;
		let def = node.schema().attrs.get(attr);
		let Some((def, choices)) = def.and_then(|d| Some((d, d.kind.choices()?))) else {
			return Err(GraphError::WrongSlot {
				variant: node.variant,
				index: attr,
				expected: "reference",
			});
		};
		let (target_id, found) = match self.entry(target) {
			Some(Entry::Live(t)) => (&*t.id, t.variant),
			Some(Entry::Removed { id, variant }) => (&**id, *variant),
			None => return Err(GraphError::ForeignNode(target)),
		};
		if choices.iter().any(|c| c.variant == found) {
			return Ok(());
		}
		Err(GraphError::TypeMismatch {
			holder: node.id.to_string(),
			attr: def.name,
			expected: variant_names(choices),
			target: target_id.to_owned(),
			found,
		})
	}

	/// Returns the single child stored in a child slot.
	pub fn child(&self, node: NodeId, attr: usize) -> Option<NodeId> {
		match self.slot(node, attr)? {
			Slot::Child(child) => *child,
			_ => None,
		}
	}

	/// Returns the children stored in a child-list slot.
	pub fn child_list(&self, node: NodeId, attr: usize) -> &[NodeId] {
		match self.slot(node, attr) {
			Some(Slot::Children(ids)) => ids,
			_ => &[],
		}
	}

	/// Builds a fresh child in a single-child slot, discarding the previous one.
	pub(crate) fn construct_child(&mut self, owner: NodeId, attr: usize, variant: Variant) -> NodeId {
		let previous = match self.slot_mut(owner, attr) {
			Some(Slot::Child(slot)) => slot.take(),
			_ => None,
		};
		if let Some(previous) = previous {
			self.remove_subtree(previous);
		}
		let child = self.alloc_owned(owner, variant);
		if let Some(Slot::Child(slot)) = self.slot_mut(owner, attr) {
			*slot = Some(child);
		}
		child
	}

	/// Appends a fresh child to a child-list slot.
	pub(crate) fn add_child(&mut self, owner: NodeId, attr: usize, variant: Variant) -> NodeId {
		let child = self.alloc_owned(owner, variant);
		if let Some(Slot::Children(ids)) = self.slot_mut(owner, attr) {
			ids.push(child);
		}
		child
	}

	/// Discards every child of a child-list slot, keeping the owner intact.
	pub(crate) fn clear_children(&mut self, owner: NodeId, attr: usize) {
		let removed = match self.slot_mut(owner, attr) {
			Some(Slot::Children(ids)) => std::mem::take(ids),
			_ => return,
		};
		for child in removed {
			self.remove_subtree(child);
		}
	}

	/// Removes a node and its owned subtree.
	///
	/// # Errors
	///
	/// Fails for the root and for nodes that are already gone.
	pub fn detach(&mut self, node: NodeId) -> Result<()> {
		if node == self.root {
			return Err(GraphError::DetachRoot);
		}
		let owner = self.node(node).ok_or(GraphError::StaleNode(node))?.owner;
		if let Some(owner) = owner.and_then(|o| self.node_mut(o)) {
			for slot in owner.slots.iter_mut() {
				match slot {
					Slot::Child(child) if *child == Some(node) => *child = None,
					Slot::Children(ids) => ids.retain(|&id| id != node),
					_ => {}
				}
			}
		}
		self.remove_subtree(node);
		Ok(())
	}

	/// Tombstones a node and everything it owns.
	fn remove_subtree(&mut self, node: NodeId) {
		let mut stack = vec![node];
		let mut removed = 0usize;
		while let Some(current) = stack.pop() {
			let Some(entry) = self.entry_mut(current) else {
				continue;
			};
			let Entry::Live(live) = entry else {
				continue;
			};
			stack.extend(live.owned());
			let id = live.id.clone();
			let variant = live.variant;
			*entry = Entry::Removed { id: id.clone(), variant };
			self.index.remove(&id);
			removed += 1;
		}
		tracing::trace!(?node, removed, "theory.remove_subtree");
	}

	/// Lists every reference site whose target is absent.
	pub fn dangling_references(&self) -> Vec<DanglingReference> {
		let mut out = Vec::new();
		for id in self.walk() {
			let Some(node) = self.node(id) else {
				continue;
			};
			for (def, slot) in node.schema().attrs.iter().zip(node.slots.iter()) {
				let refs: &[RefSlot] = match slot {
					Slot::Ref(Some(r)) => std::slice::from_ref(r),
					Slot::RefList(refs) => refs,
					_ => continue,
				};
				for view in refs.iter().filter_map(|r| self.ref_view(r)) {
					if view.live.is_none() {
						out.push(DanglingReference {
							holder: node.id.to_string(),
							attr: def.name,
							target: view.id.to_owned(),
							variant: view.variant,
						});
					}
				}
			}
		}
		out
	}
}
