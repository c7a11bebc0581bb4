//! Shared document fixtures for the serializer tests.

#![allow(dead_code)]

use serifxml_theory::prelude::*;

/// Words of the two fixture sentences, five tokens each.
pub const WORDS: [[&str; 5]; 2] = [["Yesterday", "Alice", "Smith", "met", "Bob"], ["He", "waved", "at", "her", "warmly"]];

pub struct Fixture {
	pub doc: Document,
	pub sentences: Vec<Sentence>,
	/// Mention over tokens 1..=2 of sentence 0.
	pub alice: Mention,
	/// Pronoun mention in sentence 1.
	pub he: Mention,
	pub entity: Entity,
}

/// Wraps a `Document` body in the SerifXML envelope.
pub fn wrap(body: &str) -> String {
	format!(
		r#"<?xml version="1.0" encoding="UTF-8"?>
<SerifXML version="18">
  <Document id="d0" docid="doc-1">{body}</Document>
</SerifXML>"#
	)
}

/// Builds a two-sentence document with tokens, a parse, mentions, an entity
/// and an event covering every attribute kind.
pub fn annotated_document() -> Fixture {
	let mut doc = Document::new("NYT_ENG_20260101.0001");
	let root = doc.root();
	root.set_language(&mut doc, "English");
	root.set_source_type(&mut doc, "UNKNOWN");

	let text = WORDS.map(|words| words.join(" ")).join(" ");
	let original = root.construct_original_text(&mut doc);
	original.set_contents(&mut doc, text.as_str());
	original.set_offsets(&mut doc, 0, text.chars().count() - 1).expect("valid offsets");

	let region = root.construct_regions(&mut doc).add_new_region(&mut doc);
	region.set_tag(&mut doc, "TEXT");
	region.set_offsets(&mut doc, 0, text.chars().count() - 1).expect("valid offsets");

	let list = root.construct_sentences(&mut doc);
	let mut sentences = Vec::new();
	let mut token_lists = Vec::new();
	let mut cursor = 0;
	for words in WORDS {
		let sentence = list.add_new_sentence(&mut doc);
		sentence.set_region(&mut doc, region).expect("valid reference");
		let tokens = sentence.construct_token_sequence(&mut doc);
		let start = cursor;
		let mut made = Vec::new();
		for word in words {
			let token = tokens.add_new_token(&mut doc);
			token.set_text(&mut doc, word);
			token.set_offsets(&mut doc, cursor, cursor + word.len() - 1).expect("valid offsets");
			cursor += word.len() + 1;
			made.push(token);
		}
		sentence.set_offsets(&mut doc, start, cursor - 2).expect("valid offsets");
		sentences.push(sentence);
		token_lists.push(made);
	}

	let first = sentences[0];
	let parse = first.construct_parse(&mut doc);
	parse.set_score(&mut doc, -12.5);
	let first_tokens = first.token_sequence(&doc).expect("tokens");
	parse.set_token_sequence(&mut doc, first_tokens).expect("valid reference");
	let s_node = parse.construct_root(&mut doc);
	s_node.set_tag(&mut doc, "S");
	s_node.set_start_token(&mut doc, token_lists[0][0]).expect("valid reference");
	s_node.set_end_token(&mut doc, token_lists[0][4]).expect("valid reference");
	let verb = s_node.add_new_child(&mut doc);
	verb.set_tag(&mut doc, "VBD");
	verb.set_is_head(&mut doc, true);
	verb.set_start_token(&mut doc, token_lists[0][3]).expect("valid reference");
	verb.set_end_token(&mut doc, token_lists[0][3]).expect("valid reference");

	let mentions = first.construct_mention_set(&mut doc);
	mentions.set_parse(&mut doc, parse).expect("valid reference");
	let alice = mentions.add_new_mention(&mut doc);
	alice.set_entity_type(&mut doc, "PER");
	alice.set_mention_type(&mut doc, MentionType::Name);
	alice.set_start_token(&mut doc, token_lists[0][1]).expect("valid reference");
	alice.set_end_token(&mut doc, token_lists[0][2]).expect("valid reference");
	let bob = mentions.add_new_mention(&mut doc);
	bob.set_entity_type(&mut doc, "PER");
	bob.set_mention_type(&mut doc, MentionType::Name);
	bob.set_start_token(&mut doc, token_lists[0][4]).expect("valid reference");
	bob.set_end_token(&mut doc, token_lists[0][4]).expect("valid reference");
	alice.set_next_mention(&mut doc, bob).expect("valid reference");

	let event_mention = first.construct_event_mention_set(&mut doc).add_new_event_mention(&mut doc);
	event_mention.set_event_type(&mut doc, "Contact.Meet");
	event_mention.set_anchor_node(&mut doc, verb).expect("valid reference");
	let arg = event_mention.add_new_argument(&mut doc);
	arg.set_role(&mut doc, "Entity");
	arg.set_value(&mut doc, ArgValue::Mention(alice)).expect("valid reference");

	let second = sentences[1];
	let he = second.construct_mention_set(&mut doc).add_new_mention(&mut doc);
	he.set_entity_type(&mut doc, "PER");
	he.set_mention_type(&mut doc, MentionType::Pron);
	he.set_start_token(&mut doc, token_lists[1][0]).expect("valid reference");
	he.set_end_token(&mut doc, token_lists[1][0]).expect("valid reference");

	let entity = root.construct_entity_set(&mut doc).add_new_entity(&mut doc);
	entity.set_entity_type(&mut doc, "PER");
	entity.set_canonical_name(&mut doc, "Alice Smith");
	entity.set_mentions(&mut doc, [alice, he]).expect("valid reference");

	let event = root.construct_event_set(&mut doc).add_new_event(&mut doc);
	event.set_event_type(&mut doc, "Contact.Meet");
	event.push_event_mentions(&mut doc, event_mention).expect("valid reference");
	let event_arg = event.add_new_argument(&mut doc);
	event_arg.set_role(&mut doc, "Entity");
	event_arg.set_value(&mut doc, EventArgValue::Entity(entity)).expect("valid reference");

	Fixture {
		doc,
		sentences,
		alice,
		he,
		entity,
	}
}
