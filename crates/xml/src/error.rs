//! Error types for SerifXML encoding and decoding.

use std::path::PathBuf;

use serifxml_theory::GraphError;
use thiserror::Error;

/// Errors raised while reading or writing SerifXML.
#[derive(Debug, Error)]
pub enum SerifXmlError {
	/// The input is not well-formed XML.
	#[error("malformed XML at byte {offset}: {message}")]
	Syntax {
		/// Byte offset into the trimmed input.
		offset: usize,
		/// Parser message.
		message: String,
	},

	/// An element appears where the schema has no place for it.
	#[error("unexpected <{element}> inside <{parent}> at byte {offset}")]
	UnexpectedElement {
		/// Tag of the enclosing element.
		parent: String,
		/// Tag of the offending element.
		element: String,
		/// Byte offset of the offending element.
		offset: usize,
	},

	/// An element carries an attribute its variant does not declare.
	#[error("<{element}> has unknown attribute {attr}")]
	UnknownAttribute {
		/// Element tag.
		element: String,
		/// Attribute name.
		attr: String,
	},

	/// An attribute value does not parse as its declared type.
	#[error("<{element}> attribute {attr}={value:?} is not a valid {expected}")]
	InvalidValue {
		/// Element tag.
		element: String,
		/// Attribute name.
		attr: String,
		/// Raw value.
		value: String,
		/// Declared type name.
		expected: &'static str,
	},

	/// More than one case of a tagged reference union is populated.
	#[error("<{element}> sets more than one case of {attr}")]
	ConflictingUnion {
		/// Element tag.
		element: String,
		/// Declared attribute name.
		attr: &'static str,
	},

	/// A theory element has no `id` attribute.
	#[error("<{element}> at byte {offset} has no id")]
	MissingId {
		/// Element tag.
		element: String,
		/// Byte offset of the element.
		offset: usize,
	},

	/// Text content inside an element that only owns children.
	#[error("<{element}> at byte {offset} cannot hold text")]
	UnexpectedText {
		/// Element tag.
		element: String,
		/// Byte offset of the element.
		offset: usize,
	},

	/// The graph rejected the decoded structure, or a node cannot be encoded.
	#[error(transparent)]
	Graph(#[from] GraphError),

	/// The XML writer failed.
	#[error("failed to write XML: {0}")]
	Write(String),

	/// Error reading or writing a document file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for SerifXML operations.
pub type Result<T> = std::result::Result<T, SerifXmlError>;
