//! Structural preconditions checked before a stage mutates a document.
//!
//! Every predicate is stateless and reports a [`PreconditionError`] naming the
//! missing structure. Callers decide whether a failure is fatal.

use thiserror::Error;

use crate::document::Document;
use crate::error::GraphError;
use crate::node::Node;
use crate::offsets::OffsetTheory;
use crate::sequence::SequenceTheory;
use crate::theories::{EntitySet, EventMentionSet, MentionSet, OriginalText, Parse, Sentence, Sentences, TokenSequence, ValueMentionSet};
use crate::Theory;

#[cfg(test)]
mod tests;

/// A stage's required upstream structure is missing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
	/// A required structure is absent.
	#[error("{node} has no {requirement}")]
	Missing {
		/// What is missing.
		requirement: &'static str,
		/// Id of the node that should carry it.
		node: String,
	},

	/// Tokens of a sequence are not in reading order.
	#[error("token {token} in {sequence} does not start after its predecessor")]
	TokensOutOfOrder {
		/// Id of the token sequence.
		sequence: String,
		/// Id of the first offending token.
		token: String,
	},

	/// A node lacks a required attribute value.
	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// Result type for precondition checks.
pub type Result<T> = std::result::Result<T, PreconditionError>;

fn missing(requirement: &'static str, doc: &Document, node: impl Theory) -> PreconditionError {
	PreconditionError::Missing {
		requirement,
		node: node.id(doc).unwrap_or_default().to_owned(),
	}
}

/// The document carries its original text.
pub fn document_has_original_text(doc: &Document) -> Result<OriginalText> {
	let root = doc.root();
	root.original_text(doc).ok_or_else(|| missing("original text", doc, root))
}

/// The document has a sentence list.
pub fn document_has_sentences(doc: &Document) -> Result<Sentences> {
	let root = doc.root();
	root.sentences(doc).ok_or_else(|| missing("sentences", doc, root))
}

/// The document has an entity set.
pub fn document_has_entity_set(doc: &Document) -> Result<EntitySet> {
	let root = doc.root();
	root.entity_set(doc).ok_or_else(|| missing("entity set", doc, root))
}

/// The sentence has a non-empty token sequence.
pub fn sentence_has_tokens(doc: &Document, sentence: Sentence) -> Result<TokenSequence> {
	sentence
		.token_sequence(doc)
		.filter(|seq| !seq.items(doc).is_empty())
		.ok_or_else(|| missing("tokens", doc, sentence))
}

/// The sentence has a parse with a root node.
pub fn sentence_has_parse(doc: &Document, sentence: Sentence) -> Result<Parse> {
	sentence
		.parse(doc)
		.filter(|parse| parse.root(doc).is_some())
		.ok_or_else(|| missing("parse", doc, sentence))
}

/// The sentence has a mention set.
pub fn sentence_has_mention_set(doc: &Document, sentence: Sentence) -> Result<MentionSet> {
	sentence.mention_set(doc).ok_or_else(|| missing("mention set", doc, sentence))
}

/// The sentence has a value mention set.
pub fn sentence_has_value_mention_set(doc: &Document, sentence: Sentence) -> Result<ValueMentionSet> {
	sentence
		.value_mention_set(doc)
		.ok_or_else(|| missing("value mention set", doc, sentence))
}

/// The sentence has an event mention set.
pub fn sentence_has_event_mention_set(doc: &Document, sentence: Sentence) -> Result<EventMentionSet> {
	sentence
		.event_mention_set(doc)
		.ok_or_else(|| missing("event mention set", doc, sentence))
}

/// Tokens of the sequence have strictly increasing `start_char`.
///
/// Tokens without offsets are skipped.
pub fn tokens_are_ordered(doc: &Document, sequence: TokenSequence) -> Result<()> {
	let mut previous: Option<usize> = None;
	for token in sequence.items(doc) {
		let Some((start, _)) = token.char_offsets(doc) else {
			continue;
		};
		if previous.is_some_and(|p| start <= p) {
			return Err(PreconditionError::TokensOutOfOrder {
				sequence: sequence.id(doc).unwrap_or_default().to_owned(),
				token: token.id(doc).unwrap_or_default().to_owned(),
			});
		}
		previous = Some(start);
	}
	Ok(())
}

/// Reports the first node, in ownership pre-order, that lacks a required value.
pub fn check_required(doc: &Document) -> Result<()> {
	for id in doc.walk() {
		if let Some(node) = doc.node(id) {
			first_missing(node)?;
		}
	}
	Ok(())
}

/// Checks one node's required attributes.
pub fn first_missing(node: &Node) -> std::result::Result<(), GraphError> {
	let schema = node.schema();
	for (def, slot) in schema.attrs.iter().zip(node.slots()) {
		if def.required && slot.is_empty() {
			return Err(GraphError::MissingRequired {
				variant: node.variant(),
				id: node.id().to_owned(),
				attr: def.name,
			});
		}
	}
	Ok(())
}
