//! SerifXML serialization for the annotation graph.
//!
//! [`to_string`] and [`from_str`] convert between a [`Document`] and its XML
//! form; [`save`] and [`load`] wrap them with file I/O. Encoding is
//! deterministic, so `to_string(&from_str(&to_string(&doc)?, ..)?)?` equals
//! `to_string(&doc)?` byte for byte.

pub mod decode;
pub mod encode;
pub mod error;
pub mod escape;
mod reader;

use std::io::Write;
use std::path::Path;

use serifxml_theory::Document;

pub use decode::{LoadOptions, from_str};
pub use encode::to_string;
pub use error::{Result, SerifXmlError};

/// Reads and decodes a SerifXML file.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Document> {
	let path = path.as_ref();
	let input = std::fs::read_to_string(path).map_err(|error| SerifXmlError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	let doc = from_str(&input, options)?;
	tracing::info!(path = %path.display(), nodes = doc.len(), "xml.load");
	Ok(doc)
}

/// Encodes a document and writes it to `path`.
///
/// The document is encoded fully in memory and written through a temporary
/// file in the target directory that is renamed into place, so a failed save
/// leaves any existing file untouched.
pub fn save(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
	let path = path.as_ref();
	let xml = to_string(doc)?;
	let io_error = |error: std::io::Error| SerifXmlError::Io {
		path: path.to_path_buf(),
		error,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
	temp.write_all(xml.as_bytes()).map_err(io_error)?;
	temp.as_file().sync_all().map_err(io_error)?;
	temp.persist(path).map_err(|e| io_error(e.error))?;
	tracing::info!(path = %path.display(), bytes = xml.len(), "xml.save");
	Ok(())
}
