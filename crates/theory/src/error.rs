//! Error types for graph construction, resolution and validation.

use thiserror::Error;

use crate::Variant;
use crate::node::NodeId;

/// Errors raised by the annotation graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
	/// A reference names an id that no node in the document carries.
	#[error("{attr} on {holder} references unknown id {target}")]
	UnresolvedReference {
		/// Id of the node holding the reference.
		holder: String,
		/// Declared attribute name.
		attr: &'static str,
		/// The id that failed to resolve.
		target: String,
	},

	/// A reference resolved to a node of a variant the attribute does not accept.
	#[error("{attr} on {holder} expects {expected} but {target} is a {found}")]
	TypeMismatch {
		/// Id of the node holding the reference.
		holder: String,
		/// Declared attribute name.
		attr: &'static str,
		/// Accepted variant names, `|`-joined.
		expected: String,
		/// The id the reference points at.
		target: String,
		/// Variant actually registered under `target`.
		found: Variant,
	},

	/// Two nodes claimed the same id.
	#[error("duplicate id {0}")]
	DuplicateId(String),

	/// A single-child slot was filled twice while building.
	#[error("{owner} already owns a {attr}")]
	DuplicateChild {
		/// Id of the owning node.
		owner: String,
		/// Declared attribute name.
		attr: &'static str,
	},

	/// A required attribute has no value.
	#[error("{variant} {id} is missing required attribute {attr}")]
	MissingRequired {
		/// Variant of the incomplete node.
		variant: Variant,
		/// Id of the incomplete node.
		id: String,
		/// Declared attribute name.
		attr: &'static str,
	},

	/// Offsets violate `start <= end`.
	#[error("invalid offsets {start}:{end} on {id}")]
	InvalidOffsets {
		/// Id of the offending node.
		id: String,
		/// Start offset.
		start: usize,
		/// End offset (inclusive).
		end: usize,
	},

	/// Offsets were written on a variant that carries none.
	#[error("{0} does not carry offsets")]
	NoOffsets(Variant),

	/// The attribute index does not name a slot of the requested kind.
	#[error("{variant} has no {expected} attribute at index {index}")]
	WrongSlot {
		/// Variant of the node.
		variant: Variant,
		/// Index into the variant's schema.
		index: usize,
		/// Kind of slot the caller expected.
		expected: &'static str,
	},

	/// The handle was issued by another document.
	#[error("node {0:?} belongs to another document")]
	ForeignNode(NodeId),

	/// The handle points at a node that has been removed.
	#[error("node {0:?} has been removed")]
	StaleNode(NodeId),

	/// The document root cannot be detached.
	#[error("the document root cannot be detached")]
	DetachRoot,

	/// A builder finished without a root node.
	#[error("document has no root node")]
	MissingRoot,
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
