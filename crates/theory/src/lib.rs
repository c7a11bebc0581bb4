//! Typed annotation graph for SerifXML documents.
//!
//! A [`Document`] is an arena of theory nodes forming one ownership tree
//! rooted at the `Document` variant. Nodes are reached through `Copy` handles
//! ([`Sentence`], [`Mention`], ...) generated from declarative field tables;
//! every accessor takes the document explicitly.
//!
//! ```ignore
//! let mut doc = Document::new("doc-1");
//! let sentences = doc.root().construct_sentences(&mut doc);
//! let sentence = sentences.add_new_sentence(&mut doc);
//! let tokens = sentence.construct_token_sequence(&mut doc);
//! let token = tokens.add_new_token(&mut doc);
//! token.set_text(&mut doc, "Hello");
//! token.set_offsets(&mut doc, 0, 4)?;
//! ```

#[macro_use]
mod macros;

pub mod builder;
pub mod document;
pub mod edt;
pub mod error;
pub mod node;
pub mod offsets;
pub mod prelude;
pub mod reference;
pub mod scalar;
pub mod schema;
pub mod sequence;
pub mod theories;
mod theory;
pub mod validate;

pub use builder::{DocumentBuilder, ResolveOptions};
pub use document::{Document, RefView};
pub use error::{GraphError, Result};
pub use node::{NodeId, Offsets};
pub use offsets::OffsetTheory;
pub use reference::{Dangling, DanglingReference, Ref, RefTarget};
pub use sequence::{Children, SequenceTheory};
pub use theories::*;
pub use theory::Theory;
