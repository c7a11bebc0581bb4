//! Two-pass document construction for loaders.
//!
//! Pass one allocates every node shell under its source id and records
//! references as raw ids. [`DocumentBuilder::finish`] is pass two: each
//! deferred reference resolves against the completed registry, so forward
//! references need no special handling.
//!
//! # Invariants
//!
//! - A reference never resolves to a node of a variant its attribute rejects.
//!   - Enforced in: [`DocumentBuilder::finish`]
//!   - Tested by: `builder::tests::test_wrong_variant_is_type_mismatch`
//! - An absent target yields a dangling reference unless resolution is strict.
//!   - Tested by: `builder::tests::test_absent_target_dangles`,
//!     `builder::tests::test_strict_resolution_rejects_absent_target`
//! - Ids generated after loading never collide with loaded or dangling ids.
//!   - Tested by: `builder::tests::test_generated_ids_skip_loaded_ids`

use crate::Variant;
use crate::document::Document;
use crate::error::{GraphError, Result};
use crate::node::{NodeId, Offsets, RefSlot, Slot};
use crate::scalar::Scalar;
use crate::schema::{AttrDef, AttrKind, RefChoice, variant_names};


/// How pass two treats references whose target id is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
	/// Fail with [`GraphError::UnresolvedReference`] instead of keeping a
	/// dangling reference, except for attributes declared `optional`.
	pub strict_references: bool,
}

#[derive(Debug)]
enum Pending {
	Single { choice: usize, id: String },
	List(Vec<String>),
}

#[derive(Debug)]
struct Deferred {
	holder: NodeId,
	attr: usize,
	pending: Pending,
}

/// Incremental builder used by deserializers.
#[derive(Debug)]
pub struct DocumentBuilder {
	doc: Document,
	root: Option<NodeId>,
	deferred: Vec<Deferred>,
	next_counter: u64,
}

impl Default for DocumentBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl DocumentBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self {
			doc: Document::empty(),
			root: None,
			deferred: Vec::new(),
			next_counter: 0,
		}
	}

	/// Allocates the root `Document` node.
	pub fn root(&mut self, id: &str) -> Result<NodeId> {
		if self.root.is_some() {
			return Err(GraphError::DuplicateId(id.to_owned()));
		}
		let node = self.register(Variant::Document, id, None)?;
		self.root = Some(node);
		Ok(node)
	}

	/// Allocates a node under `owner` in its child attribute `attr`.
	pub fn child(&mut self, owner: NodeId, attr: usize, id: &str) -> Result<NodeId> {
		let (variant, owner_id) = {
			let node = self.doc.node(owner).ok_or(GraphError::StaleNode(owner))?;
			let def = self.def(owner, attr, "child")?;
			let variant = def.kind.child_variant().ok_or(GraphError::WrongSlot {
				variant: node.variant,
				index: attr,
				expected: "child",
			})?;
			(variant, node.id.to_string())
		};
		if let Some(Slot::Child(Some(_))) = self.doc.slot(owner, attr) {
			return Err(GraphError::DuplicateChild {
				owner: owner_id,
				attr: self.def(owner, attr, "child")?.name,
			});
		}
		let node = self.register(variant, id, Some(owner))?;
		match self.slot_mut(owner, attr, "child")? {
			Slot::Child(slot) => *slot = Some(node),
			Slot::Children(ids) => ids.push(node),
			_ => {}
		}
		Ok(node)
	}

	/// Stores a simple attribute value.
	pub fn set_scalar(&mut self, node: NodeId, attr: usize, value: Scalar) -> Result<()> {
		match self.slot_mut(node, attr, "simple")? {
			Slot::Simple(slot) => {
				*slot = Some(value);
				Ok(())
			}
			_ => Err(self.wrong_slot(node, attr, "simple")),
		}
	}

	/// Stores the text content.
	pub fn set_text(&mut self, node: NodeId, attr: usize, value: String) -> Result<()> {
		match self.slot_mut(node, attr, "text")? {
			Slot::Text(slot) => {
				*slot = Some(value);
				Ok(())
			}
			_ => Err(self.wrong_slot(node, attr, "text")),
		}
	}

	/// Stores the offsets of an offset-bearing node.
	pub fn set_offsets(&mut self, node: NodeId, offsets: Offsets) -> Result<()> {
		self.doc.set_offsets(node, offsets)
	}

	/// Records a single reference for pass two; `choice` indexes the
	/// attribute's admissible targets.
	pub fn defer_reference(&mut self, node: NodeId, attr: usize, choice: usize, id: impl Into<String>) -> Result<()> {
		let def = self.def(node, attr, "reference")?;
		match def.kind {
			AttrKind::Reference(choices) if choice < choices.len() => {}
			_ => return Err(self.wrong_slot(node, attr, "reference")),
		}
		self.deferred.push(Deferred {
			holder: node,
			attr,
			pending: Pending::Single { choice, id: id.into() },
		});
		Ok(())
	}

	/// Records a reference list for pass two.
	pub fn defer_reference_list(&mut self, node: NodeId, attr: usize, ids: Vec<String>) -> Result<()> {
		let def = self.def(node, attr, "reference list")?;
		if !matches!(def.kind, AttrKind::ReferenceList(_)) {
			return Err(self.wrong_slot(node, attr, "reference list"));
		}
		self.deferred.push(Deferred {
			holder: node,
			attr,
			pending: Pending::List(ids),
		});
		Ok(())
	}

	/// Resolves every deferred reference and returns the document.
	///
	/// # Errors
	///
	/// - [`GraphError::MissingRoot`] if no root was allocated.
	/// - [`GraphError::TypeMismatch`] if a target has an inadmissible variant.
	/// - [`GraphError::UnresolvedReference`] for absent targets of
	///   non-optional attributes under strict resolution.
	pub fn finish(mut self, options: ResolveOptions) -> Result<Document> {
		let root = self.root.ok_or(GraphError::MissingRoot)?;
		self.doc.set_root(root);

		let deferred = std::mem::take(&mut self.deferred);
		let mut dangling = 0usize;
		for Deferred { holder, attr, pending } in deferred {
			let def = self.def(holder, attr, "reference")?;
			let choices = def.kind.choices().unwrap_or_default();
			let slot = match pending {
				Pending::Single { choice, id } => {
					let choice = choices.get(choice..=choice).unwrap_or_default();
					let resolved = self.resolve_one(holder, def, choice, id, options)?;
					dangling += usize::from(matches!(resolved, RefSlot::Dangling { .. }));
					Slot::Ref(Some(resolved))
				}
				Pending::List(ids) => {
					let mut refs = Vec::with_capacity(ids.len());
					for id in ids {
						let resolved = self.resolve_one(holder, def, choices, id, options)?;
						dangling += usize::from(matches!(resolved, RefSlot::Dangling { .. }));
						refs.push(resolved);
					}
					Slot::RefList(refs)
				}
			};
			*self.slot_mut(holder, attr, "reference")? = slot;
		}

		self.doc.seed_ids(self.next_counter);
		tracing::debug!(nodes = self.doc.len(), dangling, "theory.builder.finish");
		Ok(self.doc)
	}

	fn resolve_one(
		&mut self,
		holder: NodeId,
		def: &'static AttrDef,
		choices: &'static [RefChoice],
		id: String,
		options: ResolveOptions,
	) -> Result<RefSlot> {
		let Some(target) = self.doc.lookup(&id) else {
			if options.strict_references && !def.optional {
				return Err(GraphError::UnresolvedReference {
					holder: self.holder_id(holder),
					attr: def.name,
					target: id,
				});
			}
			let variant = choices.first().map_or(Variant::Document, |c| c.variant);
			tracing::trace!(holder = %self.holder_id(holder), attr = def.name, target = %id, "theory.builder.dangling");
			self.bump_counter(&id);
			return Ok(RefSlot::Dangling {
				id: id.into_boxed_str(),
				variant,
			});
		};
		let found = self.doc.node(target).map_or(Variant::Document, |n| n.variant);
		if choices.iter().any(|c| c.variant == found) {
			return Ok(RefSlot::Live(target));
		}
		Err(GraphError::TypeMismatch {
			holder: self.holder_id(holder),
			attr: def.name,
			expected: variant_names(choices),
			target: id,
			found,
		})
	}

	fn register(&mut self, variant: Variant, id: &str, owner: Option<NodeId>) -> Result<NodeId> {
		if self.doc.lookup(id).is_some() {
			return Err(GraphError::DuplicateId(id.to_owned()));
		}
		self.bump_counter(id);
		Ok(self.doc.insert(variant, id.into(), owner))
	}

	fn bump_counter(&mut self, id: &str) {
		if let Some(n) = Document::id_counter(id) {
			self.next_counter = self.next_counter.max(n.saturating_add(1));
		}
	}

	fn holder_id(&self, holder: NodeId) -> String {
		self.doc.node(holder).map(|n| n.id.to_string()).unwrap_or_default()
	}

	fn def(&self, node: NodeId, attr: usize, expected: &'static str) -> Result<&'static AttrDef> {
		let variant = self.doc.node(node).ok_or(GraphError::StaleNode(node))?.variant;
		variant.schema().attrs.get(attr).ok_or(GraphError::WrongSlot {
			variant,
			index: attr,
			expected,
		})
	}

	fn slot_mut(&mut self, node: NodeId, attr: usize, expected: &'static str) -> Result<&mut Slot> {
		let target = self.doc.node_mut(node).ok_or(GraphError::StaleNode(node))?;
		let variant = target.variant;
		target.slots.get_mut(attr).ok_or(GraphError::WrongSlot {
			variant,
			index: attr,
			expected,
		})
	}

	fn wrong_slot(&self, node: NodeId, attr: usize, expected: &'static str) -> GraphError {
		GraphError::WrongSlot {
			variant: self.doc.node(node).map_or(Variant::Document, |n| n.variant),
			index: attr,
			expected,
		}
	}
}
