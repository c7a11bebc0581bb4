//! Character-span theories.

use crate::Theory;
use crate::document::Document;
use crate::error::Result;
use crate::node::Offsets;

/// Theories carrying raw and EDT character spans.
///
/// Spans are inclusive character indices into the document's original text.
pub trait OffsetTheory: Theory {
	/// Returns both spans.
	fn offsets(self, doc: &Document) -> Option<Offsets> {
		doc.offsets(self.node())
	}

	/// Returns the raw `(start_char, end_char)` span.
	fn char_offsets(self, doc: &Document) -> Option<(usize, usize)> {
		self.offsets(doc).map(|o| (o.start_char, o.end_char))
	}

	/// Returns the markup-corrected `(start_edt, end_edt)` span.
	fn edt_offsets(self, doc: &Document) -> Option<(usize, usize)> {
		self.offsets(doc).map(|o| (o.start_edt, o.end_edt))
	}

	/// Sets the raw span; the EDT span is set equal to it.
	fn set_offsets(self, doc: &mut Document, start: usize, end: usize) -> Result<()> {
		doc.set_offsets(self.node(), Offsets::new(start, end))
	}

	/// Sets the EDT span, keeping the raw span.
	///
	/// A node without offsets gets the same raw span.
	fn set_edt_offsets(self, doc: &mut Document, start: usize, end: usize) -> Result<()> {
		let offsets = self.offsets(doc).unwrap_or(Offsets::new(start, end));
		doc.set_offsets(self.node(), offsets.with_edt(start, end))
	}

	/// Returns the slice of the original text covered by the raw span.
	fn span_text(self, doc: &Document) -> Option<&str> {
		let (start, end) = self.char_offsets(doc)?;
		let original = doc.root().original_text(doc)?;
		let base = original.char_offsets(doc).map_or(0, |(s, _)| s);
		let contents = original.contents(doc)?;
		char_slice(contents, start.checked_sub(base)?, end.checked_sub(base)?)
	}
}

/// Slices `text` by inclusive character indices.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
	if start > end {
		return None;
	}
	let mut indices = text.char_indices().skip(start);
	let (from, first) = indices.next()?;
	let (last, ch) = if end == start {
		(from, first)
	} else {
		indices.nth(end - start - 1)?
	};
	Some(&text[from..last + ch.len_utf8()])
}
