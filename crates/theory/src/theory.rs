//! The `Theory` handle trait.

use crate::document::Document;
use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::schema::TheorySchema;
use crate::Variant;

/// Typed handle to a node of one theory variant.
///
/// Handles are plain arena indices: they are `Copy`, carry no borrow of the
/// document, and every accessor takes the owning [`Document`] explicitly.
/// Handles to removed nodes read as absent and ignore writes; handles from
/// another document read as absent too, and reference setters reject them.
pub trait Theory: Copy + Eq + core::fmt::Debug + 'static {
	/// Variant tag of this handle type.
	const VARIANT: Variant;
	/// Declared attribute table.
	const SCHEMA: &'static TheorySchema;

	/// Wraps an arena index. The caller guarantees the variant matches.
	#[doc(hidden)]
	fn from_node(node: NodeId) -> Self;

	/// Returns the arena index.
	fn node(self) -> NodeId;

	/// Returns the document-unique id.
	fn id(self, doc: &Document) -> Option<&str> {
		doc.node(self.node()).map(Node::id)
	}

	/// Returns true while the node is part of the document.
	fn is_live(self, doc: &Document) -> bool {
		doc.node(self.node()).is_some()
	}

	/// Returns the owning node.
	fn owner(self, doc: &Document) -> Option<NodeId> {
		doc.node(self.node()).and_then(Node::owner)
	}

	/// Walks up the ownership tree to the nearest node of variant `T`.
	fn owner_with_type<T: Theory>(self, doc: &Document) -> Option<T> {
		doc.owner_with_type(self.node())
	}

	/// Removes this node and its owned subtree from the document.
	fn detach(self, doc: &mut Document) -> Result<()> {
		doc.detach(self.node())
	}
}
