//! Escaping for text content and attribute values.
//!
//! Both functions borrow the input unchanged when nothing needs escaping.
//! Attribute values also escape tab, newline and carriage return as character
//! references so that conforming readers do not normalize them away.

use std::borrow::Cow;

/// Escapes element text content.
pub fn escape_text(text: &str) -> Cow<'_, str> {
	escape_with(text, first_special_text(text.as_bytes()), text_entity)
}

/// Escapes an attribute value.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
	escape_with(value, first_special_attr(value.as_bytes()), attr_entity)
}

fn first_special_text(bytes: &[u8]) -> Option<usize> {
	let markup = memchr::memchr3(b'&', b'<', b'>', bytes);
	let cr = memchr::memchr(b'\r', bytes);
	match (markup, cr) {
		(Some(a), Some(b)) => Some(a.min(b)),
		(a, b) => a.or(b),
	}
}

fn first_special_attr(bytes: &[u8]) -> Option<usize> {
	bytes.iter().position(|&b| attr_entity(b).is_some())
}

fn text_entity(b: u8) -> Option<&'static str> {
	match b {
		b'&' => Some("&amp;"),
		b'<' => Some("&lt;"),
		b'>' => Some("&gt;"),
		b'\r' => Some("&#13;"),
		_ => None,
	}
}

fn attr_entity(b: u8) -> Option<&'static str> {
	match b {
		b'"' => Some("&quot;"),
		b'\t' => Some("&#9;"),
		b'\n' => Some("&#10;"),
		other => text_entity(other),
	}
}

fn escape_with(input: &str, first: Option<usize>, entity: fn(u8) -> Option<&'static str>) -> Cow<'_, str> {
	let Some(first) = first else {
		return Cow::Borrowed(input);
	};
	let mut out = String::with_capacity(input.len() + 16);
	out.push_str(&input[..first]);
	let mut run_start = first;
	for (i, b) in input.bytes().enumerate().skip(first) {
		if let Some(replacement) = entity(b) {
			out.push_str(&input[run_start..i]);
			out.push_str(replacement);
			run_start = i + 1;
		}
	}
	out.push_str(&input[run_start..]);
	Cow::Owned(out)
}
