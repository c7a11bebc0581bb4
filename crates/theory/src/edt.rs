//! Markup-corrected (EDT) offsets.
//!
//! EDT offsets count characters as if every inline markup tag of the original
//! text were removed. [`EdtMap`] is built in one forward pass over the text;
//! [`correct_edt_offsets`] rewrites every reachable offset-bearing node.
//!
//! # Invariants
//!
//! - The mapping is monotonic non-decreasing in the raw offset.
//!   - Tested by: `edt::tests::prop_mapping_is_monotonic`
//! - The correction walk rewrites each node at most once, even when reference
//!   edges form cycles.
//!   - Tested by: `edt::tests::test_walk_survives_reference_cycles`

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::document::Document;
use crate::node::{NodeId, Offsets};


static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("markup tag pattern is valid"));

/// One removed tag, in character units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Removed {
	start: usize,
	end: usize,
	/// Characters removed up to and including this tag.
	cumulative: usize,
}

/// Raw-to-EDT offset mapping for one original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdtMap {
	tags: Vec<Removed>,
}

impl EdtMap {
	/// Scans `text` for inline markup tags.
	pub fn from_text(text: &str) -> Self {
		let mut tags = Vec::new();
		let mut cumulative = 0;
		let mut chars_before = 0;
		let mut byte_cursor = 0;
		for m in MARKUP_TAG.find_iter(text) {
			chars_before += text[byte_cursor..m.start()].chars().count();
			let len = m.as_str().chars().count();
			cumulative += len;
			tags.push(Removed {
				start: chars_before,
				end: chars_before + len,
				cumulative,
			});
			chars_before += len;
			byte_cursor = m.end();
		}
		Self { tags }
	}

	/// Returns the number of markup tags found.
	pub fn tag_count(&self) -> usize {
		self.tags.len()
	}

	/// Maps a raw character offset to its EDT offset.
	///
	/// Offsets inside a tag snap to the position the tag collapsed to.
	pub fn map(&self, raw: usize) -> usize {
		let idx = self.tags.partition_point(|t| t.start <= raw);
		let Some(prev) = idx.checked_sub(1).map(|i| self.tags[i]) else {
			return raw;
		};
		if raw < prev.end {
			prev.start - (prev.cumulative - (prev.end - prev.start))
		} else {
			raw - prev.cumulative
		}
	}

	/// Maps a full offset record, keeping the raw span.
	pub fn correct(&self, offsets: Offsets) -> Offsets {
		offsets.with_edt(self.map(offsets.start_char), self.map(offsets.end_char))
	}
}

/// Recomputes EDT offsets of every node reachable from the root.
///
/// The walk follows owned children and reference edges, so it also reaches
/// live nodes only held by reference. Returns the number of nodes rewritten.
pub fn correct_edt_offsets(doc: &mut Document) -> usize {
	let map = match doc.root().original_text(doc).and_then(|t| t.contents(doc)) {
		Some(text) => EdtMap::from_text(text),
		None => EdtMap::default(),
	};

	let mut visited = FxHashSet::default();
	let mut stack = vec![doc.root_node()];
	let mut rewrites: Vec<(NodeId, Offsets)> = Vec::new();
	while let Some(id) = stack.pop() {
		if !visited.insert(id) {
			continue;
		}
		let Some(node) = doc.node(id) else {
			continue;
		};
		if let Some(offsets) = node.offsets() {
			rewrites.push((id, map.correct(offsets)));
		}
		let next: SmallVec<[NodeId; 8]> = node.owned().chain(node.referenced()).filter(|n| !visited.contains(n)).collect();
		stack.extend(next.into_iter().rev());
	}

	let count = rewrites.len();
	for (id, offsets) in rewrites {
		if let Err(e) = doc.set_offsets(id, offsets) {
			tracing::warn!(?id, error = %e, "theory.edt.rewrite_failed");
		}
	}
	tracing::debug!(count, tags = map.tag_count(), "theory.edt.corrected");
	count
}
