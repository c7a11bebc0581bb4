//! Decoding behavior: reference resolution, dangling references and
//! rejection of malformed or schema-violating input.

mod common;

use rstest::rstest;
use serifxml_theory::prelude::*;
use serifxml_theory::{GraphError, Variant};
use serifxml_xml::{LoadOptions, SerifXmlError, from_str, load, save, to_string};

const STRICT: LoadOptions = LoadOptions { strict_references: true };

fn sentence_with_mentions(mentions: &str) -> String {
	common::wrap(&format!(
		r#"
    <Sentences id="ss">
      <Sentence id="s0" char_offsets="0:9">
        <TokenSequence id="ts">
          <Token id="t0" char_offsets="0:4">Alice</Token>
        </TokenSequence>
        <MentionSet id="ms">{mentions}</MentionSet>
      </Sentence>
    </Sentences>
  "#
	))
}

#[test]
fn test_forward_reference_resolves() {
	let xml = sentence_with_mentions(
		r#"
          <Mention id="m0" entity_type="PER" mention_type="name" start_token="t0" next_mention="m1"/>
          <Mention id="m1" entity_type="PER" mention_type="pron"/>"#,
	);
	let doc = from_str(&xml, &STRICT).expect("load");
	let m0: Mention = doc.get("m0").expect("lookup").expect("m0");
	let m1: Mention = doc.get("m1").expect("lookup").expect("m1");
	assert_eq!(m0.next_mention(&doc), Some(Ref::Resolved(m1)));
	assert_eq!(m0.mention_type(&doc), Some(MentionType::Name));
	assert_eq!(m1.entity_subtype(&doc).as_deref(), Some("UNDET"));

	let sentence: Sentence = doc.get("s0").expect("lookup").expect("sentence");
	assert_eq!(sentence.is_annotated(&doc), Some(true));
	assert_eq!(sentence.edt_offsets(&doc), Some((0, 9)));
}

#[test]
fn test_generated_ids_avoid_loaded_ids() {
	let xml = sentence_with_mentions(r#"<Mention id="a7" entity_type="PER" mention_type="name" next_mention="a12"/>"#);
	let mut doc = from_str(&xml, &LoadOptions::default()).expect("load");
	assert_eq!(doc.generate_id(), "a13");
}

#[test]
fn test_handle_from_another_document_is_never_saved() {
	let mut fixture = common::annotated_document();
	let other = common::annotated_document();
	let foreign = other.alice.start_token(&other.doc).and_then(Ref::resolved).expect("start token");
	let before = fixture.alice.start_token(&fixture.doc);

	let err = fixture.he.set_start_token(&mut fixture.doc, foreign).expect_err("foreign handle");
	assert!(matches!(err, GraphError::ForeignNode(_)));
	assert!(fixture.alice.set_next_mention(&mut fixture.doc, other.he).is_err());
	assert!(fixture.entity.push_mentions(&mut fixture.doc, other.alice).is_err());
	assert_eq!(fixture.alice.start_token(&fixture.doc), before);

	let xml = to_string(&fixture.doc).expect("encode");
	let reloaded = from_str(&xml, &LoadOptions::default()).expect("saved document reloads");
	assert_eq!(to_string(&reloaded).expect("re-encode"), xml);
}

#[test]
fn test_dangling_reference_survives_reload() {
	let mut fixture = common::annotated_document();
	let he_id = fixture.he.id(&fixture.doc).expect("id").to_owned();
	fixture.he.detach(&mut fixture.doc).expect("detach");

	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("dangling.xml");
	save(&fixture.doc, &path).expect("save");
	let saved = std::fs::read_to_string(&path).expect("read back");
	assert!(saved.contains(&he_id));

	let doc = load(&path, &LoadOptions::default()).expect("load");
	let entity: Entity = doc.get(fixture.entity.id(&fixture.doc).expect("id")).expect("lookup").expect("entity");
	let mentions = entity.mentions(&doc);
	assert_eq!(mentions.len(), 2);
	assert!(!mentions[0].is_dangling());
	let hole = mentions[1].dangling().expect("dangling mention");
	assert_eq!(hole.id, he_id);
	assert_eq!(hole.variant, Variant::Mention);

	let reported = doc.dangling_references();
	assert_eq!(reported.len(), 1);
	assert_eq!(reported[0].attr, "mentions");
	assert_eq!(to_string(&doc).expect("re-encode"), saved);
}

#[test]
fn test_strict_loading_rejects_absent_targets() {
	let xml = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" start_token="gone"/>"#);
	let lenient = from_str(&xml, &LoadOptions::default()).expect("lenient load");
	let m0: Mention = lenient.get("m0").expect("lookup").expect("m0");
	assert!(m0.start_token(&lenient).is_some_and(|r| r.is_dangling()));

	assert!(matches!(
		from_str(&xml, &STRICT),
		Err(SerifXmlError::Graph(GraphError::UnresolvedReference { attr: "start_token", .. }))
	));
}

#[test]
fn test_strict_loading_tolerates_optional_references() {
	let xml = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" parent_mention="gone"/>"#);
	let doc = from_str(&xml, &STRICT).expect("optional references may dangle");
	let m0: Mention = doc.get("m0").expect("lookup").expect("m0");
	assert!(m0.parent_mention(&doc).is_some_and(|r| r.is_dangling()));
}

#[test]
fn test_wrong_target_variant_is_fatal() {
	let xml = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" start_token="ms"/>"#);
	assert!(matches!(
		from_str(&xml, &LoadOptions::default()),
		Err(SerifXmlError::Graph(GraphError::TypeMismatch { found: Variant::MentionSet, .. }))
	));
}

#[test]
fn test_missing_required_value_is_rejected() {
	let xml = sentence_with_mentions(r#"<Mention id="m0" mention_type="name"/>"#);
	assert!(matches!(
		from_str(&xml, &LoadOptions::default()),
		Err(SerifXmlError::Graph(GraphError::MissingRequired { attr: "entity_type", .. }))
	));
}

#[test]
fn test_failed_save_leaves_existing_file() {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("doc.xml");
	std::fs::write(&path, "previous").expect("seed file");

	let mut doc = Document::new("broken");
	let sentence = doc.root().construct_sentences(&mut doc).add_new_sentence(&mut doc);
	sentence.construct_mention_set(&mut doc).add_new_mention(&mut doc);
	assert!(matches!(save(&doc, &path), Err(SerifXmlError::Graph(GraphError::MissingRequired { .. }))));
	assert_eq!(std::fs::read_to_string(&path).expect("read"), "previous");
}

#[test]
fn test_missing_file_is_io_error() {
	let dir = tempfile::tempdir().expect("temp dir");
	let missing = dir.path().join("absent.xml");
	assert!(matches!(
		load(&missing, &LoadOptions::default()),
		Err(SerifXmlError::Io { path, .. }) if path == missing
	));
}

#[rstest]
#[case::unclosed("<SerifXML version=\"18\"><Document id=\"d0\" docid=\"x\">")]
#[case::mismatched("<SerifXML><Document id=\"d0\" docid=\"x\"></SerifXML></Document>")]
#[case::two_roots("<SerifXML/><SerifXML/>")]
#[case::stray_text("<SerifXML/>trailing")]
fn test_malformed_xml_is_syntax_error(#[case] input: &str) {
	assert!(matches!(
		from_str(input, &LoadOptions::default()),
		Err(SerifXmlError::Syntax { .. })
	));
}

#[rstest]
#[case::wrong_wrapper("<Serif><Document id=\"d0\" docid=\"x\"/></Serif>")]
#[case::unknown_child("<SerifXML><Document id=\"d0\" docid=\"x\"><Paragraph id=\"p\"/></Document></SerifXML>")]
#[case::misplaced_child("<SerifXML><Document id=\"d0\" docid=\"x\"><Token id=\"t\">x</Token></Document></SerifXML>")]
#[case::two_documents("<SerifXML><Document id=\"d0\" docid=\"x\"/><Document id=\"d1\" docid=\"y\"/></SerifXML>")]
fn test_unexpected_element(#[case] input: &str) {
	assert!(matches!(
		from_str(input, &LoadOptions::default()),
		Err(SerifXmlError::UnexpectedElement { .. })
	));
}

#[test]
fn test_schema_violations() {
	let unknown = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" colour="red"/>"#);
	assert!(matches!(
		from_str(&unknown, &LoadOptions::default()),
		Err(SerifXmlError::UnknownAttribute { attr, .. }) if attr == "colour"
	));

	let offsets_on_plain = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" char_offsets="0:1"/>"#);
	assert!(matches!(
		from_str(&offsets_on_plain, &LoadOptions::default()),
		Err(SerifXmlError::UnknownAttribute { attr, .. }) if attr == "char_offsets"
	));

	let bad_enum = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="nickname"/>"#);
	assert!(matches!(
		from_str(&bad_enum, &LoadOptions::default()),
		Err(SerifXmlError::InvalidValue { attr, .. }) if attr == "mention_type"
	));

	let bad_float = sentence_with_mentions(r#"<Mention id="m0" entity_type="PER" mention_type="name" confidence="high"/>"#);
	assert!(matches!(
		from_str(&bad_float, &LoadOptions::default()),
		Err(SerifXmlError::InvalidValue { expected: "float", .. })
	));

	let no_id = sentence_with_mentions(r#"<Mention entity_type="PER" mention_type="name"/>"#);
	assert!(matches!(
		from_str(&no_id, &LoadOptions::default()),
		Err(SerifXmlError::MissingId { element, .. }) if element == "Mention"
	));

	let text_in_set = sentence_with_mentions("loose words");
	assert!(matches!(
		from_str(&text_in_set, &LoadOptions::default()),
		Err(SerifXmlError::UnexpectedText { element, .. }) if element == "MentionSet"
	));
}

#[test]
fn test_bad_offsets_are_rejected() {
	for offsets in [r#"char_offsets="4""#, r#"char_offsets="a:b""#, r#"edt_offsets="0:4""#] {
		let xml = common::wrap(&format!(r#"<OriginalText id="o" {offsets}>hello</OriginalText>"#));
		assert!(
			matches!(from_str(&xml, &LoadOptions::default()), Err(SerifXmlError::InvalidValue { .. })),
			"{offsets} should be rejected"
		);
	}

	let reversed = common::wrap(r#"<OriginalText id="o" char_offsets="4:0">hello</OriginalText>"#);
	assert!(matches!(
		from_str(&reversed, &LoadOptions::default()),
		Err(SerifXmlError::Graph(GraphError::InvalidOffsets { .. }))
	));
}

#[test]
fn test_two_union_cases_conflict() {
	let xml = common::wrap(
		r#"
    <Sentences id="ss">
      <Sentence id="s0">
        <MentionSet id="ms">
          <Mention id="m0" entity_type="PER" mention_type="name"/>
        </MentionSet>
        <ValueMentionSet id="vs">
          <ValueMention id="v0" value_type="TIMEX2.TIME" char_offsets="0:8"/>
        </ValueMentionSet>
        <EventMentionSet id="es">
          <EventMention id="em" event_type="Contact.Meet">
            <EventMentionArg id="arg" role="Time" mention="m0" value_mention="v0"/>
          </EventMention>
        </EventMentionSet>
      </Sentence>
    </Sentences>
  "#,
	);
	assert!(matches!(
		from_str(&xml, &LoadOptions::default()),
		Err(SerifXmlError::ConflictingUnion { attr: "value", .. })
	));

	let single = xml.replace(r#" mention="m0""#, "");
	let doc = from_str(&single, &LoadOptions::default()).expect("single case loads");
	let arg: EventMentionArg = doc.get("arg").expect("lookup").expect("argument");
	let value_mention: ValueMention = doc.get("v0").expect("lookup").expect("value mention");
	assert_eq!(arg.value(&doc), Some(Ref::Resolved(ArgValue::ValueMention(value_mention))));
	assert_eq!(to_string(&doc).expect("encode").matches("value_mention=\"v0\"").count(), 1);
}
