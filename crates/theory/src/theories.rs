//! Theory variant declarations.
//!
//! Every variant of the annotation graph is declared here as a flat field
//! table. Field order is serialization order.

use crate::Theory;
use crate::document::Document;

variants! {
	Document => DocTheory,
	OriginalText,
	Regions,
	Region,
	Sentences,
	Sentence,
	TokenSequence,
	Token,
	PartOfSpeechSequence,
	POS,
	Parse,
	SynNode,
	NameTheory,
	Name,
	MentionSet,
	Mention,
	ValueMentionSet,
	ValueMention,
	PropositionSet,
	Proposition,
	Argument,
	EventMentionSet,
	EventMention,
	EventMentionArg,
	RelationMentionSet,
	RelationMention,
	ActorMentionSet,
	ActorMention,
	AMRNode,
	EntitySet,
	Entity,
	ValueSet,
	Value,
	RelationSet,
	Relation,
	EventSet,
	Event,
	EventArg,
	ActorEntitySet,
	ActorEntity,
	EventEventRelationMentionSet,
	EventEventRelationMention,
}

xml_enum! {
	/// How a mention refers to its entity.
	pub enum MentionType {
		None = "none",
		Name = "name",
		Pron = "pron",
		Desc = "desc",
		Part = "part",
		Appo = "appo",
		List = "list",
		Nest = "nest",
	}
}

xml_enum! {
	/// Predicate class of a proposition.
	pub enum PredType {
		Verb = "verb",
		Copula = "copula",
		Modifier = "modifier",
		Noun = "noun",
		Poss = "poss",
		Loc = "loc",
		Set = "set",
		Comp = "comp",
		Name = "name",
	}
}

ref_union! {
	/// Filler of a proposition or event-mention argument.
	pub enum ArgValue {
		Mention(Mention) = "mention",
		ValueMention(ValueMention) = "value_mention",
		AnchorNode(SynNode) = "anchor_node",
		EventMention(EventMention) = "event_mention",
	}
}

ref_union! {
	/// Filler of a document-level event argument.
	pub enum EventArgValue {
		Entity(Entity) = "entity",
		Value(Value) = "value",
	}
}

theory! {
	/// Root of the ownership tree.
	pub struct DocTheory as Document {
		docid: simple(String, required),
		language: simple(String),
		source_type: simple(String),
		is_downcased: simple(bool, default = false),
		document_time_start: simple(String),
		document_time_end: simple(String),
		original_text: child(OriginalText),
		regions: child(Regions),
		sentences: child(Sentences),
		entity_set: child(EntitySet),
		value_set: child(ValueSet),
		relation_set: child(RelationSet),
		event_set: child(EventSet),
		actor_entity_set: child(ActorEntitySet),
		event_event_relation_mention_set: child(EventEventRelationMentionSet),
	}
}

theory! {
	/// Raw document text, markup included.
	pub struct OriginalText [offsets] {
		contents: text(String),
	}
}

theory! {
	pub struct Regions {
		regions: child_list(Region as region),
	}
}

theory! {
	pub struct Region [offsets] {
		tag: simple(String),
		is_speaker: simple(bool, default = false),
		is_receiver: simple(bool, default = false),
	}
}

theory! {
	pub struct Sentences {
		sentences: child_list(Sentence as sentence),
	}
}

theory! {
	/// One sentence and every per-sentence analysis.
	pub struct Sentence [offsets] {
		region: reference(Region),
		is_annotated: simple(bool, default = true),
		token_sequence: child(TokenSequence),
		part_of_speech_sequence: child(PartOfSpeechSequence),
		parse: child(Parse),
		name_theory: child(NameTheory),
		mention_set: child(MentionSet),
		value_mention_set: child(ValueMentionSet),
		proposition_set: child(PropositionSet),
		event_mention_set: child(EventMentionSet),
		relation_mention_set: child(RelationMentionSet),
		actor_mention_set: child(ActorMentionSet),
		amr: child(AMRNode),
	}
}

theory! {
	pub struct TokenSequence {
		score: simple(f64),
		tokens: child_list(Token as token),
	}
}

theory! {
	pub struct Token [offsets] {
		text: text(String),
	}
}

theory! {
	pub struct PartOfSpeechSequence {
		token_sequence: reference(TokenSequence),
		tags: child_list(POS as pos),
	}
}

theory! {
	/// Part-of-speech tag of one token.
	#[allow(clippy::upper_case_acronyms)]
	pub struct POS [offsets] {
		tag: simple(String, required),
		prob: simple(f64),
		token: reference(Token),
	}
}

theory! {
	pub struct Parse {
		score: simple(f64),
		token_sequence: reference(TokenSequence),
		root: child(SynNode),
	}
}

theory! {
	/// Constituent of a parse tree.
	pub struct SynNode [offsets] {
		tag: simple(String, required),
		is_head: simple(bool, default = false),
		start_token: reference(Token),
		end_token: reference(Token),
		children: child_list(SynNode as child),
	}
}

theory! {
	pub struct NameTheory {
		token_sequence: reference(TokenSequence),
		score: simple(f64),
		names: child_list(Name as name),
	}
}

theory! {
	pub struct Name [offsets] {
		entity_type: simple(String, required),
		start_token: reference(Token),
		end_token: reference(Token),
		score: simple(f64),
	}
}

theory! {
	pub struct MentionSet {
		name_score: simple(f64),
		desc_score: simple(f64),
		parse: reference(Parse),
		mentions: child_list(Mention as mention),
	}
}

theory! {
	/// A span referring to an entity.
	///
	/// `parent_mention`, `child_mention` and `next_mention` may form cycles.
	pub struct Mention {
		entity_type: simple(String, required),
		entity_subtype: simple(String, default = "UNDET"),
		mention_type: simple(MentionType, required),
		confidence: simple(f64, default = 1.0),
		model: simple(String),
		syn_node: reference(SynNode),
		start_token: reference(Token),
		end_token: reference(Token),
		parent_mention: reference(Mention, optional),
		child_mention: reference(Mention, optional),
		next_mention: reference(Mention, optional),
	}
}

theory! {
	pub struct ValueMentionSet {
		token_sequence: reference(TokenSequence),
		value_mentions: child_list(ValueMention as value_mention),
	}
}

theory! {
	pub struct ValueMention [offsets] {
		value_type: simple(String, required),
		start_token: reference(Token),
		end_token: reference(Token),
	}
}

theory! {
	pub struct PropositionSet {
		mention_set: reference(MentionSet),
		propositions: child_list(Proposition as proposition),
	}
}

theory! {
	pub struct Proposition {
		pred_type: simple(PredType, required),
		status: simple(String),
		head: reference(SynNode),
		particle: reference(SynNode, optional),
		adverb: reference(SynNode, optional),
		negation: reference(SynNode, optional),
		modal: reference(SynNode, optional),
		arguments: child_list(Argument as argument),
	}
}

theory! {
	pub struct Argument {
		role: simple(String),
		value: reference(ArgValue),
	}
}

theory! {
	pub struct EventMentionSet {
		parse: reference(Parse),
		event_mentions: child_list(EventMention as event_mention),
	}
}

theory! {
	pub struct EventMention {
		event_type: simple(String, required),
		genericity: simple(String, default = "Specific"),
		polarity: simple(String, default = "Positive"),
		tense: simple(String, default = "Unspecified"),
		modality: simple(String, default = "Asserted"),
		score: simple(f64),
		pattern_id: simple(String),
		anchor_node: reference(SynNode),
		anchor_prop: reference(Proposition, optional),
		arguments: child_list(EventMentionArg as argument),
	}
}

theory! {
	/// Argument of an event mention; may point into another sentence.
	pub struct EventMentionArg {
		role: simple(String, required),
		score: simple(f64),
		value: reference(ArgValue),
	}
}

theory! {
	pub struct RelationMentionSet {
		relation_mentions: child_list(RelationMention as relation_mention),
	}
}

theory! {
	pub struct RelationMention {
		relation_type: simple(String, required),
		tense: simple(String),
		modality: simple(String),
		confidence: simple(f64),
		left_mention: reference(Mention, required),
		right_mention: reference(Mention, required),
	}
}

theory! {
	pub struct ActorMentionSet {
		actor_mentions: child_list(ActorMention as actor_mention),
	}
}

theory! {
	pub struct ActorMention {
		actor_uid: simple(i64),
		actor_name: simple(String),
		source_note: simple(String),
		mention: reference(Mention, required),
	}
}

theory! {
	/// Node of an abstract meaning representation graph.
	pub struct AMRNode {
		content: simple(String),
		varname: simple(String),
		start_token: reference(Token, optional),
		end_token: reference(Token, optional),
		children: child_list(AMRNode as child),
	}
}

theory! {
	pub struct EntitySet {
		score: simple(f64),
		entities: child_list(Entity as entity),
	}
}

theory! {
	/// Coreference cluster of mentions.
	pub struct Entity {
		entity_type: simple(String, required),
		entity_subtype: simple(String, default = "UNDET"),
		is_generic: simple(bool, default = false),
		canonical_name: simple(String),
		mentions: reference_list(Mention),
	}
}

theory! {
	pub struct ValueSet {
		values: child_list(Value as value),
	}
}

theory! {
	pub struct Value {
		value_type: simple(String, required),
		timex_val: simple(String),
		value_mention: reference(ValueMention, required),
	}
}

theory! {
	pub struct RelationSet {
		relations: child_list(Relation as relation),
	}
}

theory! {
	pub struct Relation {
		relation_type: simple(String, required),
		confidence: simple(f64),
		left_entity: reference(Entity, required),
		right_entity: reference(Entity, required),
		relation_mentions: reference_list(RelationMention),
	}
}

theory! {
	pub struct EventSet {
		events: child_list(Event as event),
	}
}

theory! {
	/// Document-level event clustering event mentions.
	pub struct Event {
		event_type: simple(String, required),
		genericity: simple(String),
		polarity: simple(String),
		tense: simple(String),
		modality: simple(String),
		event_mentions: reference_list(EventMention),
		arguments: child_list(EventArg as argument),
	}
}

theory! {
	pub struct EventArg {
		role: simple(String, required),
		score: simple(f64),
		value: reference(EventArgValue),
	}
}

theory! {
	pub struct ActorEntitySet {
		actor_entities: child_list(ActorEntity as actor_entity),
	}
}

theory! {
	pub struct ActorEntity {
		actor_uid: simple(i64),
		actor_name: simple(String),
		confidence: simple(f64),
		entity: reference(Entity, required),
		actor_mentions: reference_list(ActorMention),
	}
}

theory! {
	pub struct EventEventRelationMentionSet {
		event_event_relation_mentions: child_list(EventEventRelationMention as event_event_relation_mention),
	}
}

theory! {
	pub struct EventEventRelationMention {
		relation_type: simple(String, required),
		confidence: simple(f64),
		model: simple(String),
		left_event_mention: reference(EventMention, required),
		right_event_mention: reference(EventMention, required),
	}
}

sequence_theory! {
	Regions => regions: Region,
	Sentences => sentences: Sentence,
	TokenSequence => tokens: Token,
	PartOfSpeechSequence => tags: POS,
	NameTheory => names: Name,
	MentionSet => mentions: Mention,
	ValueMentionSet => value_mentions: ValueMention,
	PropositionSet => propositions: Proposition,
	EventMentionSet => event_mentions: EventMention,
	RelationMentionSet => relation_mentions: RelationMention,
	ActorMentionSet => actor_mentions: ActorMention,
	EntitySet => entities: Entity,
	ValueSet => values: Value,
	RelationSet => relations: Relation,
	EventSet => events: Event,
	ActorEntitySet => actor_entities: ActorEntity,
	EventEventRelationMentionSet => event_event_relation_mentions: EventEventRelationMention,
}

impl Sentence {
	/// Index of this sentence within its `Sentences` owner.
	pub fn sent_no(self, doc: &Document) -> Option<usize> {
		let sentences = self.owner_with_type::<Sentences>(doc)?;
		sentences.sentences(doc).position(self)
	}
}
