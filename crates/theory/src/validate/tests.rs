use super::*;
use crate::Variant;
use crate::theories::MentionType;

fn document_with_sentence() -> (Document, Sentence) {
	let mut doc = Document::new("doc");
	let sentences = doc.root().construct_sentences(&mut doc);
	let sentence = sentences.add_new_sentence(&mut doc);
	(doc, sentence)
}

#[test]
fn test_document_structures() {
	let (mut doc, _) = document_with_sentence();
	assert!(document_has_sentences(&doc).is_ok());
	assert_eq!(
		document_has_entity_set(&doc),
		Err(PreconditionError::Missing {
			requirement: "entity set",
			node: "a0".into(),
		})
	);
	assert!(document_has_original_text(&doc).is_err());

	doc.root().construct_entity_set(&mut doc);
	doc.root().construct_original_text(&mut doc);
	assert!(document_has_entity_set(&doc).is_ok());
	assert!(document_has_original_text(&doc).is_ok());
}

#[test]
fn test_empty_token_sequence_is_missing_tokens() {
	let (mut doc, sentence) = document_with_sentence();
	assert!(sentence_has_tokens(&doc, sentence).is_err());

	let seq = sentence.construct_token_sequence(&mut doc);
	assert!(sentence_has_tokens(&doc, sentence).is_err());
	seq.add_new_token(&mut doc);
	assert_eq!(sentence_has_tokens(&doc, sentence), Ok(seq));
}

#[test]
fn test_parse_needs_root() {
	let (mut doc, sentence) = document_with_sentence();
	let parse = sentence.construct_parse(&mut doc);
	assert!(sentence_has_parse(&doc, sentence).is_err());
	parse.construct_root(&mut doc);
	assert_eq!(sentence_has_parse(&doc, sentence), Ok(parse));
}

#[test]
fn test_sentence_sets() {
	let (mut doc, sentence) = document_with_sentence();
	assert!(sentence_has_mention_set(&doc, sentence).is_err());
	assert!(sentence_has_value_mention_set(&doc, sentence).is_err());
	assert!(sentence_has_event_mention_set(&doc, sentence).is_err());

	sentence.construct_mention_set(&mut doc);
	sentence.construct_value_mention_set(&mut doc);
	sentence.construct_event_mention_set(&mut doc);
	assert!(sentence_has_mention_set(&doc, sentence).is_ok());
	assert!(sentence_has_value_mention_set(&doc, sentence).is_ok());
	assert!(sentence_has_event_mention_set(&doc, sentence).is_ok());
}

#[test]
fn test_tokens_are_ordered() {
	let (mut doc, sentence) = document_with_sentence();
	let seq = sentence.construct_token_sequence(&mut doc);
	for start in [0, 4, 9] {
		seq.add_new_token(&mut doc).set_offsets(&mut doc, start, start + 2).expect("valid");
	}
	assert_eq!(tokens_are_ordered(&doc, seq), Ok(()));

	let late = seq.add_new_token(&mut doc);
	late.set_offsets(&mut doc, 9, 10).expect("valid");
	assert!(matches!(
		tokens_are_ordered(&doc, seq),
		Err(PreconditionError::TokensOutOfOrder { token, .. }) if Some(token.as_str()) == late.id(&doc)
	));
}

#[test]
fn test_check_required_reports_first_gap() {
	let (mut doc, sentence) = document_with_sentence();
	assert_eq!(check_required(&doc), Ok(()));

	let mention = sentence.construct_mention_set(&mut doc).add_new_mention(&mut doc);
	let id = mention.id(&doc).expect("id").to_owned();
	assert_eq!(
		check_required(&doc),
		Err(PreconditionError::Graph(GraphError::MissingRequired {
			variant: Variant::Mention,
			id,
			attr: "entity_type",
		}))
	);

	mention.set_entity_type(&mut doc, "PER");
	assert!(matches!(
		check_required(&doc),
		Err(PreconditionError::Graph(GraphError::MissingRequired { attr: "mention_type", .. }))
	));
	mention.set_mention_type(&mut doc, MentionType::Pron);
	assert_eq!(check_required(&doc), Ok(()));
}
