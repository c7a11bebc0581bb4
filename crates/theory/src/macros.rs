//! Declaration macros for theory variants.
//!
//! Each variant is a flat table of fields:
//!
//! ```ignore
//! theory! {
//!     /// A single token.
//!     pub struct Token [offsets] {
//!         text: text(String),
//!     }
//! }
//!
//! theory! {
//!     pub struct Mention {
//!         entity_type: simple(String, required),
//!         entity_subtype: simple(String, default = "UNDET"),
//!         syn_node: reference(SynNode),
//!         parent_mention: reference(Mention, optional),
//!     }
//! }
//! ```
//!
//! The macro emits the typed handle, its static [`TheorySchema`](crate::schema::TheorySchema)
//! and every accessor. Field kinds are `simple`, `text`, `reference`,
//! `reference_list`, `child` and `child_list`; a child list names its item
//! (`tokens: child_list(Token as token)`) which yields `add_new_token`.
//! Constraints are `required`, `optional` and `default = <expr>`.

/// Declares one theory variant.
macro_rules! theory {
	(
		$(#[$meta:meta])*
		pub struct $name:ident as $tag:ident $([$flag:ident])? { $($body:tt)* }
	) => {
		theory!(@impl [$(#[$meta])*] $name $tag [$($flag)?] { $($body)* });
	};
	(
		$(#[$meta:meta])*
		pub struct $name:ident $([$flag:ident])? { $($body:tt)* }
	) => {
		theory!(@impl [$(#[$meta])*] $name $name [$($flag)?] { $($body)* });
	};
	(@impl [$(#[$meta:meta])*] $name:ident $tag:ident [$($flag:ident)?] {
		$($field:ident : $kind:ident ( $t:ty $(as $item:ident)? $(, $cflag:ident $(= $val:expr)?)* )),* $(,)?
	}) => {
		paste::paste! {
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
			pub struct $name($crate::node::NodeId);

			#[allow(non_camel_case_types, dead_code)]
			enum [<$name Attr>] {
				$($field),*
			}

			impl $crate::Theory for $name {
				const VARIANT: $crate::Variant = $crate::Variant::$tag;
				const SCHEMA: &'static $crate::schema::TheorySchema = &$crate::schema::TheorySchema {
					variant: $crate::Variant::$tag,
					tag: stringify!($tag),
					has_offsets: __theory_has_offsets!($($flag)?),
					attrs: &[$(
						$crate::schema::AttrDef {
							name: stringify!($field),
							kind: __theory_kind!($kind, $t),
							required: __theory_flag!(required; $($cflag)*),
							optional: __theory_flag!(optional; $($cflag)*),
							default: __theory_default!($t; $($cflag $(= $val)?),*),
						}
					),*],
				};

				#[inline]
				fn from_node(node: $crate::node::NodeId) -> Self {
					Self(node)
				}

				#[inline]
				fn node(self) -> $crate::node::NodeId {
					self.0
				}
			}

			impl $crate::reference::RefTarget for $name {
				const CHOICES: &'static [$crate::schema::RefChoice] = &[$crate::schema::RefChoice {
					xml_name: None,
					variant: $crate::Variant::$tag,
				}];

				fn from_parts(variant: $crate::Variant, node: $crate::node::NodeId) -> Option<Self> {
					(variant == $crate::Variant::$tag).then_some(Self(node))
				}

				fn target_node(&self) -> $crate::node::NodeId {
					self.0
				}
			}

			impl $name {
				$(
					__theory_accessors!($kind; $field; [<$name Attr>]::$field as usize; $t; $($item)?);
				)*
			}

			__theory_offsets!($name $($flag)?);
		}
	};
}

#[doc(hidden)]
macro_rules! __theory_has_offsets {
	() => {
		false
	};
	(offsets) => {
		true
	};
}

#[doc(hidden)]
macro_rules! __theory_offsets {
	($name:ident) => {};
	($name:ident offsets) => {
		impl $crate::offsets::OffsetTheory for $name {}
	};
}

#[doc(hidden)]
macro_rules! __theory_kind {
	(simple, $t:ty) => {
		$crate::schema::AttrKind::Simple(<$t as $crate::scalar::ScalarValue>::TYPE)
	};
	(text, $t:ty) => {
		$crate::schema::AttrKind::Text
	};
	(reference, $t:ty) => {
		$crate::schema::AttrKind::Reference(<$t as $crate::reference::RefTarget>::CHOICES)
	};
	(reference_list, $t:ty) => {
		$crate::schema::AttrKind::ReferenceList(<$t as $crate::reference::RefTarget>::CHOICES)
	};
	(child, $t:ty) => {
		$crate::schema::AttrKind::Child(<$t as $crate::Theory>::VARIANT)
	};
	(child_list, $t:ty) => {
		$crate::schema::AttrKind::ChildList(<$t as $crate::Theory>::VARIANT)
	};
}

/// Scans constraint idents for one flag.
#[doc(hidden)]
macro_rules! __theory_flag {
	($want:ident;) => {
		false
	};
	(required; required $($rest:ident)*) => {
		true
	};
	(optional; optional $($rest:ident)*) => {
		true
	};
	($want:ident; $other:ident $($rest:ident)*) => {
		__theory_flag!($want; $($rest)*)
	};
}

/// Builds the default-value factory from a `default = expr` constraint.
#[doc(hidden)]
macro_rules! __theory_default {
	($t:ty;) => {
		None
	};
	($t:ty; default = $v:expr $(, $($rest:tt)*)?) => {{
		fn default_value() -> $crate::scalar::Scalar {
			$crate::scalar::ScalarValue::into_scalar(<$t>::from($v))
		}
		Some(default_value as fn() -> $crate::scalar::Scalar)
	}};
	($t:ty; $other:ident $(, $($rest:tt)*)?) => {
		__theory_default!($t; $($($rest)*)?)
	};
}

#[doc(hidden)]
macro_rules! __theory_accessors {
	(simple; $field:ident; $idx:expr; $t:ty;) => {
		paste::paste! {
			#[doc = concat!("Returns `", stringify!($field), "`.")]
			pub fn $field(self, doc: &$crate::Document) -> Option<$t> {
				doc.simple_value::<$t>(self.0, $idx)
			}

			#[doc = concat!("Sets `", stringify!($field), "`.")]
			pub fn [<set_ $field>](self, doc: &mut $crate::Document, value: impl Into<$t>) {
				doc.set_simple(self.0, $idx, $crate::scalar::ScalarValue::into_scalar(value.into()));
			}
		}
	};
	(text; $field:ident; $idx:expr; $t:ty;) => {
		paste::paste! {
			#[doc = concat!("Returns the `", stringify!($field), "` text.")]
			pub fn $field(self, doc: &$crate::Document) -> Option<&str> {
				doc.text(self.0, $idx)
			}

			#[doc = concat!("Sets the `", stringify!($field), "` text.")]
			pub fn [<set_ $field>](self, doc: &mut $crate::Document, value: impl Into<String>) {
				doc.set_text(self.0, $idx, value.into());
			}
		}
	};
	(reference; $field:ident; $idx:expr; $t:ty;) => {
		paste::paste! {
			#[doc = concat!("Resolves `", stringify!($field), "`.")]
			pub fn $field(self, doc: &$crate::Document) -> Option<$crate::Ref<$t>> {
				doc.reference::<$t>(self.0, $idx)
			}

			#[doc = concat!("Points `", stringify!($field), "` at a node of this document.")]
			pub fn [<set_ $field>](self, doc: &mut $crate::Document, target: $t) -> $crate::Result<()> {
				doc.set_reference(self.0, $idx, $crate::reference::RefTarget::target_node(&target))
			}
		}
	};
	(reference_list; $field:ident; $idx:expr; $t:ty;) => {
		paste::paste! {
			#[doc = concat!("Resolves every entry of `", stringify!($field), "`.")]
			pub fn $field(self, doc: &$crate::Document) -> Vec<$crate::Ref<$t>> {
				doc.reference_list::<$t>(self.0, $idx)
			}

			#[doc = concat!("Replaces `", stringify!($field), "`.")]
			pub fn [<set_ $field>](self, doc: &mut $crate::Document, targets: impl IntoIterator<Item = $t>) -> $crate::Result<()> {
				let targets = targets
					.into_iter()
					.map(|t| $crate::reference::RefTarget::target_node(&t))
					.collect();
				doc.set_reference_list(self.0, $idx, targets)
			}

			#[doc = concat!("Appends to `", stringify!($field), "`.")]
			pub fn [<push_ $field>](self, doc: &mut $crate::Document, target: $t) -> $crate::Result<()> {
				doc.push_reference(self.0, $idx, $crate::reference::RefTarget::target_node(&target))
			}
		}
	};
	(child; $field:ident; $idx:expr; $t:ty;) => {
		paste::paste! {
			#[doc = concat!("Returns the owned `", stringify!($field), "`.")]
			pub fn $field(self, doc: &$crate::Document) -> Option<$t> {
				doc.child(self.0, $idx).map(<$t as $crate::Theory>::from_node)
			}

			#[doc = concat!("Builds a fresh `", stringify!($field), "`, discarding the previous one.")]
			pub fn [<construct_ $field>](self, doc: &mut $crate::Document) -> $t {
				let node = doc.construct_child(self.0, $idx, <$t as $crate::Theory>::VARIANT);
				<$t as $crate::Theory>::from_node(node)
			}
		}
	};
	(child_list; $field:ident; $idx:expr; $t:ty; $item:ident) => {
		paste::paste! {
			#[doc = concat!("Returns the owned `", stringify!($field), "` in order.")]
			pub fn $field(self, doc: &$crate::Document) -> $crate::Children<'_, $t> {
				$crate::Children::new(doc.child_list(self.0, $idx))
			}

			#[doc = concat!("Appends a fresh `", stringify!($item), "`.")]
			pub fn [<add_new_ $item>](self, doc: &mut $crate::Document) -> $t {
				let node = doc.add_child(self.0, $idx, <$t as $crate::Theory>::VARIANT);
				<$t as $crate::Theory>::from_node(node)
			}

			#[doc = concat!("Discards every `", stringify!($item), "`.")]
			pub fn [<clear_ $field>](self, doc: &mut $crate::Document) {
				doc.clear_children(self.0, $idx);
			}
		}
	};
}

/// Declares the closed `Variant` enum.
macro_rules! variants {
	($($variant:ident $(=> $handle:ident)?),* $(,)?) => {
		/// Every theory variant.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub enum Variant {
			$(
				#[allow(missing_docs, clippy::upper_case_acronyms)]
				$variant,
			)*
		}

		impl Variant {
			/// All variants in declaration order.
			pub const ALL: &'static [Variant] = &[$(Variant::$variant),*];

			/// Returns the variant name, also its XML element tag.
			pub const fn name(self) -> &'static str {
				match self {
					$(Variant::$variant => stringify!($variant)),*
				}
			}

			/// Looks a variant up by XML element tag.
			pub fn from_tag(tag: &str) -> Option<Self> {
				match tag {
					$(stringify!($variant) => Some(Variant::$variant),)*
					_ => None,
				}
			}

			/// Returns the attribute table of this variant.
			pub fn schema(self) -> &'static $crate::schema::TheorySchema {
				match self {
					$(Variant::$variant => <__theory_handle!($variant $($handle)?) as $crate::Theory>::SCHEMA),*
				}
			}
		}

		impl core::fmt::Display for Variant {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.write_str(self.name())
			}
		}
	};
}

#[doc(hidden)]
macro_rules! __theory_handle {
	($variant:ident) => {
		$variant
	};
	($variant:ident $handle:ident) => {
		$handle
	};
}

/// Declares a tagged reference union.
///
/// Each arm names the union case, the handle type it wraps and the XML
/// attribute that carries it.
macro_rules! ref_union {
	(
		$(#[$meta:meta])*
		pub enum $name:ident {
			$($case:ident($t:ty) = $xml:literal),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum $name {
			$(
				#[allow(missing_docs)]
				$case($t),
			)*
		}

		impl $crate::reference::RefTarget for $name {
			const CHOICES: &'static [$crate::schema::RefChoice] = &[$(
				$crate::schema::RefChoice {
					xml_name: Some($xml),
					variant: <$t as $crate::Theory>::VARIANT,
				}
			),*];

			fn from_parts(variant: $crate::Variant, node: $crate::node::NodeId) -> Option<Self> {
				$(
					if variant == <$t as $crate::Theory>::VARIANT {
						return Some($name::$case(<$t as $crate::Theory>::from_node(node)));
					}
				)*
				None
			}

			fn target_node(&self) -> $crate::node::NodeId {
				match self {
					$($name::$case(h) => $crate::Theory::node(*h)),*
				}
			}
		}

		$(
			impl From<$t> for $name {
				fn from(value: $t) -> Self {
					$name::$case(value)
				}
			}
		)*
	};
}

/// Declares a closed enumeration stored as a string attribute.
macro_rules! xml_enum {
	(
		$(#[$meta:meta])*
		pub enum $name:ident {
			$($case:ident = $xml:literal),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum $name {
			$(
				#[allow(missing_docs)]
				$case,
			)*
		}

		impl $name {
			/// All values in declaration order.
			pub const ALL: &'static [$name] = &[$($name::$case),*];

			/// Returns the XML form.
			pub const fn as_str(self) -> &'static str {
				match self {
					$($name::$case => $xml),*
				}
			}

			/// Parses the XML form.
			pub fn parse(text: &str) -> Option<Self> {
				match text {
					$($xml => Some($name::$case),)*
					_ => None,
				}
			}
		}

		impl core::fmt::Display for $name {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl $crate::scalar::ScalarValue for $name {
			const TYPE: $crate::scalar::ScalarType = $crate::scalar::ScalarType {
				name: stringify!($name),
				parse: |text: &str| $name::parse(text).map(|v| $crate::scalar::Scalar::Str(v.as_str().to_owned())),
			};

			fn into_scalar(self) -> $crate::scalar::Scalar {
				$crate::scalar::Scalar::Str(self.as_str().to_owned())
			}

			fn from_scalar(value: &$crate::scalar::Scalar) -> Option<Self> {
				value.as_str().and_then($name::parse)
			}
		}
	};
}

/// Marks child-list owners as sequence theories.
macro_rules! sequence_theory {
	($($seq:ident => $field:ident : $item:ty),* $(,)?) => {
		paste::paste! {
			$(
				impl $crate::sequence::SequenceTheory for $seq {
					type Item = $item;
					const ITEMS: usize = [<$seq Attr>]::$field as usize;
				}
			)*
		}
	};
}
