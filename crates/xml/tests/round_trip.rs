//! Encode/decode fidelity of SerifXML documents.

mod common;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serifxml_theory::prelude::*;
use serifxml_xml::{LoadOptions, from_str, load, save, to_string};

fn reload(xml: &str) -> Document {
	from_str(xml, &LoadOptions::default()).expect("document should load")
}

#[test]
fn test_encoding_is_idempotent() {
	let fixture = common::annotated_document();
	let xml = to_string(&fixture.doc).expect("encode");
	let again = to_string(&reload(&xml)).expect("re-encode");
	assert_eq!(again, xml);
}

#[test]
fn test_layout_and_attribute_order() {
	let fixture = common::annotated_document();
	let doc = &fixture.doc;
	let xml = to_string(doc).expect("encode");
	assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<SerifXML version=\"18\">\n  <Document "));
	assert!(xml.ends_with("</SerifXML>"));

	let token = fixture.sentences[0].token_sequence(doc).expect("tokens").tokens(doc).get(1).expect("token");
	let token_id = token.id(doc).expect("id");
	assert!(xml.contains(&format!(r#"<Token id="{token_id}" char_offsets="10:14" edt_offsets="10:14">Alice</Token>"#)));

	let alice_id = fixture.alice.id(doc).expect("id");
	let line = xml
		.lines()
		.find(|l| l.contains(&format!(r#"id="{alice_id}""#)))
		.expect("mention element");
	assert!(line.trim_start().starts_with(&format!(
		r#"<Mention id="{alice_id}" entity_type="PER" entity_subtype="UNDET" mention_type="name" confidence="1" start_token="#
	)));
	assert!(line.ends_with("/>"));
}

#[test]
fn test_unions_and_lists_use_declared_names() {
	let fixture = common::annotated_document();
	let doc = &fixture.doc;
	let xml = to_string(doc).expect("encode");
	let alice = fixture.alice.id(doc).expect("id");
	let he = fixture.he.id(doc).expect("id");
	let entity = fixture.entity.id(doc).expect("id");

	assert!(xml.contains(&format!(r#"role="Entity" mention="{alice}"/>"#)));
	assert!(xml.contains(&format!(r#"role="Entity" entity="{entity}"/>"#)));
	assert!(xml.contains(&format!(r#"mentions="{alice} {he}""#)));
}

#[test]
fn test_scenario_survives_save_and_reload() {
	let fixture = common::annotated_document();
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("doc.xml");
	save(&fixture.doc, &path).expect("save");

	let doc = load(&path, &LoadOptions::default()).expect("load");
	let id = fixture.alice.id(&fixture.doc).expect("id");
	let mention: Mention = doc.get(id).expect("typed lookup").expect("mention present");

	let start = mention.start_token(&doc).and_then(Ref::resolved).expect("start token");
	assert_eq!(start.text(&doc), Some(common::WORDS[0][1]));
	assert_eq!(start.span_text(&doc), Some("Alice"));
	let sentence = mention.owner_with_type::<Sentence>(&doc).expect("owning sentence");
	assert_eq!(sentence.sent_no(&doc), Some(0));
	assert_eq!(doc.docid().as_deref(), Some("NYT_ENG_20260101.0001"));
}

#[test]
fn test_special_characters_survive() {
	let mut fixture = common::annotated_document();
	let doc = &mut fixture.doc;
	let token = fixture.sentences[1].token_sequence(doc).expect("tokens").tokens(doc).get(0).expect("token");
	token.set_text(doc, "  <&> \"q\" 'a'\r\n");
	fixture.alice.set_model(doc, "tab\there\nline & \"quote\"");

	let xml = to_string(doc).expect("encode");
	let reloaded = reload(&xml);
	let token: Token = reloaded.get(token.id(doc).expect("id")).expect("lookup").expect("token");
	assert_eq!(token.text(&reloaded), Some("  <&> \"q\" 'a'\r\n"));
	let alice: Mention = reloaded.get(fixture.alice.id(doc).expect("id")).expect("lookup").expect("mention");
	assert_eq!(alice.model(&reloaded).as_deref(), Some("tab\there\nline & \"quote\""));
	assert_eq!(to_string(&reloaded).expect("re-encode"), xml);
}

#[test]
fn test_leading_and_trailing_whitespace_is_stripped() {
	let fixture = common::annotated_document();
	let xml = to_string(&fixture.doc).expect("encode");
	let padded = format!("\n\n   {xml}\n\t\n");
	assert_eq!(to_string(&reload(&padded)).expect("re-encode"), xml);
}

#[test]
fn test_empty_text_stays_empty() {
	let mut fixture = common::annotated_document();
	let doc = &mut fixture.doc;
	let token = fixture.sentences[0].token_sequence(doc).expect("tokens").tokens(doc).get(0).expect("token");
	token.set_text(doc, "");
	let xml = to_string(doc).expect("encode");
	let reloaded = reload(&xml);
	let token: Token = reloaded.get(token.id(doc).expect("id")).expect("lookup").expect("token");
	assert_eq!(token.text(&reloaded), Some(""));
}

proptest! {
	#[test]
	fn prop_token_text_round_trips(words in prop::collection::vec("[ -~\t\n\r\u{e9}\u{4e2d}]{0,12}", 1..8)) {
		let mut doc = Document::new("prop");
		let sentence = doc.root().construct_sentences(&mut doc).add_new_sentence(&mut doc);
		let tokens = sentence.construct_token_sequence(&mut doc);
		for word in &words {
			tokens.add_new_token(&mut doc).set_text(&mut doc, word.as_str());
		}

		let xml = to_string(&doc).expect("encode");
		let reloaded = from_str(&xml, &LoadOptions::default()).expect("decode");
		prop_assert_eq!(to_string(&reloaded).expect("re-encode"), xml);

		let sentence = reloaded.root().sentences(&reloaded).expect("sentences").sentences(&reloaded).get(0).expect("sentence");
		let seq = sentence.token_sequence(&reloaded).expect("tokens");
		let texts: Vec<_> = seq.tokens(&reloaded).iter().map(|t| t.text(&reloaded).unwrap_or_default().to_owned()).collect();
		prop_assert_eq!(texts, words);
	}

	#[test]
	fn prop_reference_shapes_round_trip(
		token_count in 1usize..6,
		mentions in prop::collection::vec((0usize..6, 0usize..6, prop::option::of(0usize..6)), 1..5),
		args in prop::collection::vec((any::<bool>(), 0usize..6), 0..4),
		members in prop::collection::vec(0usize..6, 0..4),
		removed_tokens in prop::collection::vec(0usize..6, 0..3),
		removed_mentions in prop::collection::vec(0usize..6, 0..2)
	) {
		let mut doc = Document::new("prop");
		let sentence = doc.root().construct_sentences(&mut doc).add_new_sentence(&mut doc);
		let seq = sentence.construct_token_sequence(&mut doc);
		let tokens: Vec<Token> = (0..token_count).map(|_| seq.add_new_token(&mut doc)).collect();

		let set = sentence.construct_mention_set(&mut doc);
		let made: Vec<Mention> = mentions.iter().map(|_| set.add_new_mention(&mut doc)).collect();
		for (mention, &(start, end, next)) in made.iter().zip(&mentions) {
			mention.set_entity_type(&mut doc, "PER");
			mention.set_mention_type(&mut doc, MentionType::Name);
			mention.set_start_token(&mut doc, tokens[start % token_count]).expect("same document");
			mention.set_end_token(&mut doc, tokens[end % token_count]).expect("same document");
			if let Some(next) = next {
				mention.set_next_mention(&mut doc, made[next % made.len()]).expect("same document");
			}
		}

		let event_mention = sentence.construct_event_mention_set(&mut doc).add_new_event_mention(&mut doc);
		event_mention.set_event_type(&mut doc, "Contact.Meet");
		for &(to_mention, index) in &args {
			let arg = event_mention.add_new_argument(&mut doc);
			arg.set_role(&mut doc, "Entity");
			let value = if to_mention { ArgValue::Mention(made[index % made.len()]) } else { ArgValue::EventMention(event_mention) };
			arg.set_value(&mut doc, value).expect("same document");
		}

		let entity = doc.root().construct_entity_set(&mut doc).add_new_entity(&mut doc);
		entity.set_entity_type(&mut doc, "PER");
		entity.set_mentions(&mut doc, members.iter().map(|&i| made[i % made.len()])).expect("same document");

		// Detaching twice reports a stale node, which is irrelevant here.
		for i in removed_tokens {
			let _ = tokens[i % token_count].detach(&mut doc);
		}
		for i in removed_mentions {
			let _ = made[i % made.len()].detach(&mut doc);
		}

		let xml = to_string(&doc).expect("encode");
		let reloaded = from_str(&xml, &LoadOptions::default()).expect("decode");
		prop_assert_eq!(to_string(&reloaded).expect("re-encode"), xml);
		prop_assert_eq!(reloaded.dangling_references().len(), doc.dangling_references().len());
	}
}
