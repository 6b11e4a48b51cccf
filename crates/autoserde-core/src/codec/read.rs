//! Typed reads over a `TokenReader`.
//!
//! Generated decoders are written against these helpers; the plan
//! interpreter uses the same ones so both paths agree on edge cases.

use crate::{
    error::DecodeError,
    token::{MAX_DEPTH, Token, TokenReader},
};
use std::{collections::BTreeMap, str::FromStr};

/// Consume one complete value of any shape.
///
/// Iterative; nesting past `MAX_DEPTH` fails with `DepthLimitExceeded`.
pub fn skip_value(r: &mut dyn TokenReader) -> Result<(), DecodeError> {
    let mut open: Vec<Container> = Vec::new();

    loop {
        // close finished containers and consume the field name before a value
        match open.last() {
            Some(Container::Object) => match r.expect_token()? {
                Token::FieldName(_) => {}
                Token::EndObject => {
                    open.pop();
                    if open.is_empty() {
                        return Ok(());
                    }
                    continue;
                }
                other => return Err(DecodeError::unexpected("field name or '}'", other)),
            },
            Some(Container::Array) => {
                if matches!(r.peek_token()?, Some(Token::EndArray)) {
                    r.next_token()?;
                    open.pop();
                    if open.is_empty() {
                        return Ok(());
                    }
                    continue;
                }
            }
            None => {}
        }

        let container = match r.expect_token()? {
            Token::StartObject => Container::Object,
            Token::StartArray => Container::Array,
            token if token.is_scalar() => {
                if open.is_empty() {
                    return Ok(());
                }
                continue;
            }
            other => return Err(DecodeError::unexpected("value", other)),
        };

        if open.len() >= MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded { limit: MAX_DEPTH });
        }
        open.push(container);
    }
}

#[derive(Clone, Copy)]
enum Container {
    Object,
    Array,
}

pub fn expect_start_object(r: &mut dyn TokenReader) -> Result<(), DecodeError> {
    match r.expect_token()? {
        Token::StartObject => Ok(()),
        other => Err(DecodeError::unexpected("'{'", other)),
    }
}

/// Next field name of the current object, or `None` at its end.
pub fn next_field(r: &mut dyn TokenReader) -> Result<Option<String>, DecodeError> {
    match r.expect_token()? {
        Token::FieldName(name) => Ok(Some(name)),
        Token::EndObject => Ok(None),
        other => Err(DecodeError::unexpected("field name or '}'", other)),
    }
}

pub fn read_bool(r: &mut dyn TokenReader) -> Result<bool, DecodeError> {
    match r.expect_token()? {
        Token::Bool(b) => Ok(b),
        other => Err(DecodeError::unexpected("boolean", other)),
    }
}

pub fn read_text(r: &mut dyn TokenReader) -> Result<String, DecodeError> {
    match r.expect_token()? {
        Token::Text(s) => Ok(s),
        other => Err(DecodeError::unexpected("string", other)),
    }
}

pub fn read_number<T: FromNumber>(r: &mut dyn TokenReader) -> Result<T, DecodeError> {
    let token = r.expect_token()?;
    if !matches!(token, Token::Int(_) | Token::UInt(_) | Token::Float(_)) {
        return Err(DecodeError::unexpected(T::NAME, token));
    }

    T::from_token(&token).ok_or_else(|| DecodeError::NumberOutOfRange {
        target: T::NAME,
        value: token.to_string(),
    })
}

/// Read an array, decoding each element with `item`.
pub fn read_array<T, F>(r: &mut dyn TokenReader, mut item: F) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&mut dyn TokenReader) -> Result<T, DecodeError>,
{
    match r.expect_token()? {
        Token::StartArray => {}
        other => return Err(DecodeError::unexpected("'['", other)),
    }

    let mut items = Vec::new();
    loop {
        match r.peek_token()? {
            Some(Token::EndArray) => {
                r.next_token()?;
                return Ok(items);
            }
            Some(_) => items.push(item(r)?),
            None => return Err(DecodeError::UnexpectedEnd),
        }
    }
}

/// Read an object as a map; `key` converts each field name.
pub fn read_map<K, V, FK, FV>(
    r: &mut dyn TokenReader,
    mut key: FK,
    mut value: FV,
) -> Result<BTreeMap<K, V>, DecodeError>
where
    K: Ord,
    FK: FnMut(String) -> Result<K, DecodeError>,
    FV: FnMut(&mut dyn TokenReader) -> Result<V, DecodeError>,
{
    expect_start_object(r)?;

    let mut map = BTreeMap::new();
    while let Some(name) = next_field(r)? {
        let k = key(name)?;
        map.insert(k, value(r)?);
    }

    Ok(map)
}

/// `None` for an explicit null, otherwise the value read by `inner`.
pub fn read_optional<T, F>(r: &mut dyn TokenReader, inner: F) -> Result<Option<T>, DecodeError>
where
    F: FnOnce(&mut dyn TokenReader) -> Result<T, DecodeError>,
{
    if matches!(r.peek_token()?, Some(Token::Null)) {
        r.next_token()?;
        return Ok(None);
    }

    inner(r).map(Some)
}

/// Parse a map key from its text form.
pub fn parse_key<T: FromStr>(key: &str, expected: &str) -> Result<T, DecodeError> {
    key.parse().map_err(|_| DecodeError::InvalidMapKey {
        key: key.to_string(),
        expected: expected.to_string(),
    })
}

///
/// FromNumber
/// Checked conversion from a numeric token.
///

pub trait FromNumber: Sized {
    const NAME: &'static str;

    fn from_token(token: &Token) -> Option<Self>;
}

macro_rules! impl_from_number_int {
    ($($t:ty),*) => {
        $(
            impl FromNumber for $t {
                const NAME: &'static str = stringify!($t);

                fn from_token(token: &Token) -> Option<Self> {
                    match token {
                        Token::Int(i) => Self::try_from(*i).ok(),
                        Token::UInt(u) => Self::try_from(*u).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_number_int!(i8, i16, i32, i64, u8, u16, u32, u64);

#[expect(clippy::cast_precision_loss)]
impl FromNumber for f64 {
    const NAME: &'static str = "f64";

    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Int(i) => Some(*i as Self),
            Token::UInt(u) => Some(*u as Self),
            Token::Float(f) => Some(*f),
            _ => None,
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
impl FromNumber for f32 {
    const NAME: &'static str = "f32";

    fn from_token(token: &Token) -> Option<Self> {
        let wide = f64::from_token(token)?;
        if wide.is_finite() && wide.abs() > f64::from(Self::MAX) {
            return None;
        }

        Some(wide as Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::VecTokens;

    fn reader(tokens: Vec<Token>) -> VecTokens {
        VecTokens::new(tokens)
    }

    #[test]
    fn skip_consumes_exactly_one_nested_value() {
        let mut r = reader(vec![
            Token::StartObject,
            Token::FieldName("a".into()),
            Token::StartArray,
            Token::StartObject,
            Token::EndObject,
            Token::Null,
            Token::EndArray,
            Token::EndObject,
            Token::Bool(true),
        ]);

        skip_value(&mut r).unwrap();
        assert_eq!(r.next_token().unwrap(), Some(Token::Bool(true)));
    }

    #[test]
    fn skip_rejects_truncated_input() {
        let mut r = reader(vec![Token::StartArray, Token::UInt(1)]);

        assert_eq!(skip_value(&mut r), Err(DecodeError::UnexpectedEnd));
    }

    #[test]
    fn skip_rejects_misplaced_tokens() {
        let mut r = reader(vec![Token::StartObject, Token::UInt(1)]);
        assert!(matches!(skip_value(&mut r), Err(DecodeError::UnexpectedToken { .. })));

        let mut r = reader(vec![Token::StartArray, Token::FieldName("a".into())]);
        assert!(matches!(skip_value(&mut r), Err(DecodeError::UnexpectedToken { .. })));
    }

    #[test]
    fn skip_stops_at_the_depth_limit() {
        let mut r = reader(vec![Token::StartArray; MAX_DEPTH + 1]);

        assert_eq!(
            skip_value(&mut r),
            Err(DecodeError::DepthLimitExceeded { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn skip_accepts_nesting_up_to_the_limit() {
        let mut tokens = vec![Token::StartArray; MAX_DEPTH];
        tokens.extend(vec![Token::EndArray; MAX_DEPTH]);
        let mut r = reader(tokens);

        skip_value(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn numbers_are_range_checked() {
        let mut r = reader(vec![Token::UInt(300), Token::Int(-1), Token::Text("1".into())]);

        assert!(matches!(
            read_number::<u8>(&mut r),
            Err(DecodeError::NumberOutOfRange { target: "u8", .. })
        ));
        assert_eq!(read_number::<i16>(&mut r), Ok(-1));
        assert!(matches!(
            read_number::<i64>(&mut r),
            Err(DecodeError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn floats_accept_integers() {
        let mut r = reader(vec![Token::UInt(2), Token::Float(0.5)]);

        assert_eq!(read_number::<f64>(&mut r), Ok(2.0));
        assert_eq!(read_number::<f32>(&mut r), Ok(0.5));
    }

    #[test]
    fn containers_read_recursively() {
        let mut r = reader(vec![
            Token::StartObject,
            Token::FieldName("1".into()),
            Token::StartArray,
            Token::Null,
            Token::Text("x".into()),
            Token::EndArray,
            Token::EndObject,
        ]);

        let map = read_map(
            &mut r,
            |k| parse_key::<u32>(&k, "u32"),
            |r| read_array(r, |r| read_optional(r, read_text)),
        )
        .unwrap();

        assert_eq!(map.get(&1), Some(&vec![None, Some("x".to_string())]));
    }

    #[test]
    fn bad_map_keys_are_reported() {
        assert_eq!(
            parse_key::<bool>("yes", "bool"),
            Err(DecodeError::InvalidMapKey {
                key: "yes".into(),
                expected: "bool".into()
            })
        );
    }
}
