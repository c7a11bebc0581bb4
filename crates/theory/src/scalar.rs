//! Scalar attribute values and their declared types.

use std::borrow::Cow;

/// The value of a simple attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	/// String value (also carries closed enumerations by name).
	Str(String),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// Boolean value, written as `TRUE`/`FALSE`.
	Bool(bool),
}

impl Scalar {
	/// Returns the XML attribute form of this value.
	pub fn to_xml(&self) -> Cow<'_, str> {
		match self {
			Scalar::Str(v) => Cow::Borrowed(v),
			Scalar::Int(v) => Cow::Owned(v.to_string()),
			Scalar::Float(v) => Cow::Owned(v.to_string()),
			Scalar::Bool(true) => Cow::Borrowed("TRUE"),
			Scalar::Bool(false) => Cow::Borrowed("FALSE"),
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Scalar::Str(v) => Some(v),
			_ => None,
		}
	}
}

/// Declared type of a simple attribute.
///
/// `parse` turns the XML attribute text into a [`Scalar`], returning `None`
/// when the text is not a valid value of this type.
#[derive(Clone, Copy)]
pub struct ScalarType {
	/// Type name used in diagnostics.
	pub name: &'static str,
	/// Parser for the XML attribute form.
	pub parse: fn(&str) -> Option<Scalar>,
}

impl core::fmt::Debug for ScalarType {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "ScalarType({})", self.name)
	}
}

/// Rust types that can be stored in a simple attribute.
pub trait ScalarValue: Sized {
	/// The declared type used by the schema table.
	const TYPE: ScalarType;

	/// Converts the value into its stored form.
	fn into_scalar(self) -> Scalar;

	/// Extracts the value, returning `None` if the stored variant doesn't match.
	fn from_scalar(value: &Scalar) -> Option<Self>;
}

impl ScalarValue for String {
	const TYPE: ScalarType = ScalarType {
		name: "string",
		parse: |text: &str| Some(Scalar::Str(text.to_owned())),
	};

	fn into_scalar(self) -> Scalar {
		Scalar::Str(self)
	}

	fn from_scalar(value: &Scalar) -> Option<Self> {
		value.as_str().map(str::to_owned)
	}
}

impl ScalarValue for i64 {
	const TYPE: ScalarType = ScalarType {
		name: "int",
		parse: |text: &str| text.parse().ok().map(Scalar::Int),
	};

	fn into_scalar(self) -> Scalar {
		Scalar::Int(self)
	}

	fn from_scalar(value: &Scalar) -> Option<Self> {
		match value {
			Scalar::Int(v) => Some(*v),
			_ => None,
		}
	}
}

impl ScalarValue for f64 {
	const TYPE: ScalarType = ScalarType {
		name: "float",
		parse: |text: &str| text.parse().ok().map(Scalar::Float),
	};

	fn into_scalar(self) -> Scalar {
		Scalar::Float(self)
	}

	fn from_scalar(value: &Scalar) -> Option<Self> {
		match value {
			Scalar::Float(v) => Some(*v),
			_ => None,
		}
	}
}

impl ScalarValue for bool {
	const TYPE: ScalarType = ScalarType {
		name: "bool",
		parse: parse_bool,
	};

	fn into_scalar(self) -> Scalar {
		Scalar::Bool(self)
	}

	fn from_scalar(value: &Scalar) -> Option<Self> {
		match value {
			Scalar::Bool(v) => Some(*v),
			_ => None,
		}
	}
}

fn parse_bool(text: &str) -> Option<Scalar> {
	if text.eq_ignore_ascii_case("true") {
		Some(Scalar::Bool(true))
	} else if text.eq_ignore_ascii_case("false") {
		Some(Scalar::Bool(false))
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bool_forms() {
		assert_eq!((bool::TYPE.parse)("TRUE"), Some(Scalar::Bool(true)));
		assert_eq!((bool::TYPE.parse)("false"), Some(Scalar::Bool(false)));
		assert_eq!((bool::TYPE.parse)("yes"), None);
		assert_eq!(Scalar::Bool(false).to_xml(), "FALSE");
	}

	#[test]
	fn test_float_reencodes_stably() {
		let parsed = (f64::TYPE.parse)("1.50").expect("float");
		let text = parsed.to_xml().into_owned();
		assert_eq!(text, "1.5");
		assert_eq!((f64::TYPE.parse)(&text), Some(parsed));
	}

	#[test]
	fn test_int_rejects_garbage() {
		assert_eq!((i64::TYPE.parse)("12"), Some(Scalar::Int(12)));
		assert_eq!((i64::TYPE.parse)("12x"), None);
	}
}
