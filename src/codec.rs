//! Delimiter codec for ordered sequences of primitives.
//!
//! The backend has no list slot, so a sequence is stored as a single string:
//! the elements' canonical string forms joined by [`DELIMITER`].
//!
//! Two properties of this representation are kept as-is:
//!
//! - An element whose string form contains `"::"` is not escaped. Decoding
//!   such a sequence yields more elements than were stored.
//! - The empty sequence encodes to `""`, and `""` decodes to a single
//!   element parsed from the empty string.
//!
//! # Example
//!
//! ```
//! use typed_store::codec::{decode_list, encode_list};
//!
//! let encoded = encode_list(&[1i32, 2, 3]);
//! assert_eq!(encoded, "1::2::3");
//! assert_eq!(decode_list::<i32>(&encoded).ok(), Some(vec![1, 2, 3]));
//! ```

use std::convert::Infallible;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::logging::trace;

/// Separator placed between encoded elements.
pub const DELIMITER: &str = "::";

/// Errors raised while decoding encoded values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An element of an encoded sequence did not parse as the requested type.
    #[error("invalid {kind} at index {index}: '{element}' ({reason})")]
    InvalidElement {
        kind: &'static str,
        index: usize,
        element: String,
        reason: String,
    },

    /// A single encoded value did not parse as the requested type.
    #[error("invalid {kind}: '{value}' ({reason})")]
    InvalidScalar {
        kind: &'static str,
        value: String,
        reason: String,
    },
}

/// A primitive that can live inside an encoded sequence.
pub trait ListElement: Sized {
    /// Human-readable type name used in error messages.
    const KIND: &'static str;

    /// Parse failure reported by [`decode`](Self::decode).
    type Err: fmt::Display;

    /// Canonical, locale-independent string form.
    fn encode(&self) -> String;

    /// Inverse of [`encode`](Self::encode).
    fn decode(text: &str) -> Result<Self, Self::Err>;
}

impl ListElement for bool {
    const KIND: &'static str = "bool";
    type Err = Infallible;

    fn encode(&self) -> String {
        String::from(if *self { "true" } else { "false" })
    }

    /// Only the exact text `"true"` is true; everything else reads as false.
    fn decode(text: &str) -> Result<Self, Self::Err> {
        Ok(text == "true")
    }
}

impl ListElement for String {
    const KIND: &'static str = "string";
    type Err = Infallible;

    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(text: &str) -> Result<Self, Self::Err> {
        Ok(text.to_string())
    }
}

macro_rules! numeric_element {
    ($ty:ty, $kind:literal, $err:ty) => {
        impl ListElement for $ty {
            const KIND: &'static str = $kind;
            type Err = $err;

            fn encode(&self) -> String {
                self.to_string()
            }

            fn decode(text: &str) -> Result<Self, Self::Err> {
                text.parse()
            }
        }
    };
}

numeric_element!(i32, "i32", ParseIntError);
numeric_element!(i64, "i64", ParseIntError);
numeric_element!(f32, "f32", ParseFloatError);
numeric_element!(f64, "f64", ParseFloatError);

/// Join already-encoded parts with [`DELIMITER`], preserving order.
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push_str(DELIMITER);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Split an encoded sequence into its parts. Never yields zero parts.
pub fn split(encoded: &str) -> impl Iterator<Item = &str> {
    encoded.split(DELIMITER)
}

/// Encode a sequence of primitives into one string.
pub fn encode_list<T: ListElement>(values: &[T]) -> String {
    let encoded = join(values.iter().map(ListElement::encode));
    trace!(kind = T::KIND, elements = values.len(), len = encoded.len(), "encoded list");
    encoded
}

/// Decode a string produced by [`encode_list`].
pub fn decode_list<T: ListElement>(encoded: &str) -> Result<Vec<T>, CodecError> {
    let values = split(encoded)
        .enumerate()
        .map(|(index, element)| {
            T::decode(element).map_err(|e| CodecError::InvalidElement {
                kind: T::KIND,
                index,
                element: element.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<T>, CodecError>>()?;
    trace!(kind = T::KIND, elements = values.len(), "decoded list");
    Ok(values)
}

/// Decode a single value stored in its string form.
pub fn decode_scalar<T: ListElement>(text: &str) -> Result<T, CodecError> {
    T::decode(text).map_err(|e| CodecError::InvalidScalar {
        kind: T::KIND,
        value: text.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_preserves_order() {
        assert_eq!(join(["a", "b", "c"]), "a::b::c");
        assert_eq!(join(["only"]), "only");
        assert_eq!(join(Vec::<String>::new()), "");
    }

    #[test]
    fn test_bool_forms() {
        assert_eq!(encode_list(&[true, false, true]), "true::false::true");
        assert_eq!(
            decode_list::<bool>("true::false::true").unwrap(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_bool_tolerates_garbage() {
        assert_eq!(
            decode_list::<bool>("true::yes::TRUE::1::false").unwrap(),
            vec![true, false, false, false, false]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(encode_list(&[-1i64, 0, i64::MAX]), "-1::0::9223372036854775807");
        assert_eq!(
            decode_list::<i64>("-1::0::9223372036854775807").unwrap(),
            vec![-1, 0, i64::MAX]
        );
        assert_eq!(encode_list(&[1.5f64, -0.25]), "1.5::-0.25");
        assert_eq!(decode_list::<f32>("1.5::2").unwrap(), vec![1.5f32, 2.0]);
    }

    #[test]
    fn test_invalid_number_reports_index() {
        let err = decode_list::<i32>("1::two::3").unwrap_err();
        match err {
            CodecError::InvalidElement {
                kind,
                index,
                element,
                ..
            } => {
                assert_eq!(kind, "i32");
                assert_eq!(index, 1);
                assert_eq!(element, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_sequence_decodes_to_single_empty_element() {
        let encoded = encode_list::<String>(&[]);
        assert_eq!(encoded, "");
        assert_eq!(decode_list::<String>(&encoded).unwrap(), vec![String::new()]);
        assert_eq!(decode_list::<bool>(&encoded).unwrap(), vec![false]);
        assert!(decode_list::<i32>(&encoded).is_err());
    }

    #[test]
    fn test_delimiter_collision_is_not_detected() {
        let values = vec!["a::b".to_string(), "c".to_string()];
        let decoded = decode_list::<String>(&encode_list(&values)).unwrap();
        assert_eq!(decoded, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_empty_elements_survive() {
        let values = vec!["x".to_string(), String::new()];
        assert_eq!(decode_list::<String>(&encode_list(&values)).unwrap(), values);
    }

    #[test]
    fn test_scalar() {
        assert_eq!(decode_scalar::<f64>("3.25").unwrap(), 3.25);
        assert!(decode_scalar::<f64>("NaN").unwrap().is_nan());
        let err = decode_scalar::<f64>("abc").unwrap_err();
        assert!(err.to_string().contains("f64"));
        assert!(err.to_string().contains("abc"));
    }
}
