//! Typed reference values.

use crate::Variant;
use crate::node::NodeId;
use crate::schema::RefChoice;

/// Types a reference attribute can point at.
///
/// Every theory handle implements this for its own variant; `ref_union!`
/// implements it for tagged unions over several variants.
pub trait RefTarget: Copy {
	/// Admissible target variants, in declaration order.
	const CHOICES: &'static [RefChoice];

	/// Wraps a node of the given variant, or `None` if the variant is not admissible.
	fn from_parts(variant: Variant, node: NodeId) -> Option<Self>;

	/// Returns the arena index of the referenced node.
	fn target_node(&self) -> NodeId;
}

/// A reference whose target id has no live node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dangling {
	/// The id the reference still names.
	pub id: String,
	/// Variant the reference was declared to hold.
	pub variant: Variant,
}

/// Result of reading a reference attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref<T> {
	/// The target is live.
	Resolved(T),
	/// The target is absent; the id is kept so it re-serializes unchanged.
	Dangling(Dangling),
}

impl<T> Ref<T> {
	/// Returns the live target.
	pub fn resolved(self) -> Option<T> {
		match self {
			Ref::Resolved(t) => Some(t),
			Ref::Dangling(_) => None,
		}
	}

	/// Returns the dangling sentinel.
	pub fn dangling(&self) -> Option<&Dangling> {
		match self {
			Ref::Resolved(_) => None,
			Ref::Dangling(d) => Some(d),
		}
	}

	/// Returns true if the target is absent.
	pub fn is_dangling(&self) -> bool {
		matches!(self, Ref::Dangling(_))
	}

	/// Maps the live target.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Ref<U> {
		match self {
			Ref::Resolved(t) => Ref::Resolved(f(t)),
			Ref::Dangling(d) => Ref::Dangling(d),
		}
	}
}

/// A reference site whose target is absent, as reported by
/// [`Document::dangling_references`](crate::Document::dangling_references).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
	/// Id of the node holding the reference.
	pub holder: String,
	/// Declared attribute name.
	pub attr: &'static str,
	/// The id that has no live node.
	pub target: String,
	/// Variant the reference was declared to hold.
	pub variant: Variant,
}
