//! Stages shipped with the pipeline.
//!
//! These operate purely on the graph. Model-backed stages (tokenizers,
//! parsers, taggers) live outside this crate and register themselves in a
//! [`StageRegistry`](crate::StageRegistry) the same way.

use serifxml_theory::prelude::*;
use serifxml_theory::validate;

use crate::context::StageContext;
use crate::stage::{Stage, StageError};


/// Recomputes EDT offsets from the original text.
#[derive(Debug, Default)]
pub struct EdtCorrection;

impl EdtCorrection {
	pub const NAME: &'static str = "edt_correction";
}

impl Stage for EdtCorrection {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn process_document(&self, _ctx: &StageContext, doc: &mut Document) -> Result<(), StageError> {
		validate::document_has_original_text(doc)?;
		let rewritten = serifxml_theory::edt::correct_edt_offsets(doc);
		tracing::trace!(rewritten, "pipeline.stage.edt_correction");
		Ok(())
	}
}

/// Tags mentions whose tokens spell a known country as `GPE.Nation`.
#[derive(Debug, Default)]
pub struct CountryMentions;

impl CountryMentions {
	pub const NAME: &'static str = "country_mentions";
}

impl Stage for CountryMentions {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn process_document(&self, ctx: &StageContext, doc: &mut Document) -> Result<(), StageError> {
		let sentences: Vec<Sentence> = validate::document_has_sentences(doc)?.sentences(doc).iter().collect();
		let mut work = Vec::new();
		for sentence in sentences {
			let tokens = validate::sentence_has_tokens(doc, sentence)?;
			let mentions = validate::sentence_has_mention_set(doc, sentence)?;
			work.extend(mentions.mentions(doc).iter().map(|m| (tokens, m)));
		}

		let mut tagged = 0usize;
		for (tokens, mention) in work {
			let is_country = mention_text(doc, tokens, mention).is_some_and(|text| ctx.countries().contains(&text));
			if is_country {
				mention.set_entity_type(doc, "GPE");
				mention.set_entity_subtype(doc, "Nation");
				tagged += 1;
			}
		}
		tracing::trace!(tagged, "pipeline.stage.country_mentions");
		Ok(())
	}
}

/// Text of the tokens a mention spans, space-joined.
fn mention_text(doc: &Document, tokens: TokenSequence, mention: Mention) -> Option<String> {
	let start = mention.start_token(doc)?.resolved()?;
	let end = mention.end_token(doc)?.resolved()?;
	let list = tokens.tokens(doc);
	let (first, last) = (list.position(start)?, list.position(end)?);
	let words: Vec<&str> = (first..=last).filter_map(|i| list.get(i)?.text(doc)).collect();
	Some(words.join(" "))
}

/// Rejects documents whose tokens are out of reading order.
#[derive(Debug, Default)]
pub struct TokenOrderCheck;

impl TokenOrderCheck {
	pub const NAME: &'static str = "token_order";
}

impl Stage for TokenOrderCheck {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn process_document(&self, _ctx: &StageContext, doc: &mut Document) -> Result<(), StageError> {
		let sentences = validate::document_has_sentences(doc)?;
		for sentence in sentences.sentences(doc) {
			let tokens = validate::sentence_has_tokens(doc, sentence)?;
			validate::tokens_are_ordered(doc, tokens)?;
		}
		Ok(())
	}
}
