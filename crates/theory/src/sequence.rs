//! Ordered child collections.

use core::marker::PhantomData;

use crate::Theory;
use crate::document::Document;
use crate::node::NodeId;

/// Borrowed view of an ordered child list.
#[derive(Debug, Clone, Copy)]
pub struct Children<'a, T> {
	ids: &'a [NodeId],
	_marker: PhantomData<T>,
}

impl<'a, T: Theory> Children<'a, T> {
	pub(crate) fn new(ids: &'a [NodeId]) -> Self {
		Self {
			ids,
			_marker: PhantomData,
		}
	}

	/// Returns the number of children.
	#[inline]
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Returns true if the list is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Returns the child at `index`.
	pub fn get(&self, index: usize) -> Option<T> {
		self.ids.get(index).copied().map(T::from_node)
	}

	/// Returns the first child.
	pub fn first(&self) -> Option<T> {
		self.get(0)
	}

	/// Returns the last child.
	pub fn last(&self) -> Option<T> {
		self.ids.last().copied().map(T::from_node)
	}

	/// Returns the index of `item`.
	pub fn position(&self, item: T) -> Option<usize> {
		self.ids.iter().position(|&id| id == item.node())
	}

	/// Iterates children in insertion order.
	pub fn iter(self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + 'a {
		self.ids.iter().copied().map(T::from_node)
	}

	/// Returns the underlying arena indices.
	pub fn ids(&self) -> &'a [NodeId] {
		self.ids
	}
}

impl<'a, T: Theory> IntoIterator for Children<'a, T> {
	type Item = T;
	type IntoIter = core::iter::Map<core::iter::Copied<core::slice::Iter<'a, NodeId>>, fn(NodeId) -> T>;

	fn into_iter(self) -> Self::IntoIter {
		self.ids.iter().copied().map(T::from_node as fn(NodeId) -> T)
	}
}

/// Theories that own one ordered list of children.
pub trait SequenceTheory: Theory {
	/// Item variant.
	type Item: Theory;
	/// Schema index of the child list.
	const ITEMS: usize;

	/// Returns the children in insertion order.
	fn items(self, doc: &Document) -> Children<'_, Self::Item> {
		Children::new(doc.child_list(self.node(), Self::ITEMS))
	}

	/// Appends a fresh child.
	fn add_new(self, doc: &mut Document) -> Self::Item {
		let node = doc.add_child(self.node(), Self::ITEMS, <Self::Item as Theory>::VARIANT);
		Self::Item::from_node(node)
	}

	/// Discards every child while keeping this node and its id.
	///
	/// References into the discarded children dangle afterwards.
	fn replace_all(self, doc: &mut Document) {
		doc.clear_children(self.node(), Self::ITEMS);
	}
}
