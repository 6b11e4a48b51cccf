//! JSON documents as token streams, backed by `serde_json::Value`.

use crate::{
    error::{DecodeError, EncodeError},
    token::{Token, TokenReader, TokenWriter, VecTokens},
};
use serde_json::{Map, Number, Value};

///
/// DocumentWriter
/// Builds a `Value` from tokens; object keys keep insertion order.
///

#[derive(Debug, Default)]
pub struct DocumentWriter {
    stack: Vec<Frame>,
    root: Option<Value>,
}

#[derive(Debug)]
enum Frame {
    Object {
        map: Map<String, Value>,
        pending: Option<String>,
    },
    Array(Vec<Value>),
}

impl DocumentWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// The finished document. Fails if any container is still open.
    pub fn finish(self) -> Result<Value, EncodeError> {
        if !self.stack.is_empty() {
            return Err(EncodeError::Structure("unclosed container".to_string()));
        }

        self.root
            .ok_or_else(|| EncodeError::Structure("no value written".to_string()))
    }

    fn push_value(&mut self, value: Value) -> Result<(), EncodeError> {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { map, pending }) => {
                let key = pending
                    .take()
                    .ok_or_else(|| EncodeError::Structure("value without field name".to_string()))?;
                map.insert(key, value);
            }
            None => {
                if self.root.is_some() {
                    return Err(EncodeError::Structure("more than one root value".to_string()));
                }
                self.root = Some(value);
            }
        }

        Ok(())
    }
}

impl TokenWriter for DocumentWriter {
    fn write(&mut self, token: Token) -> Result<(), EncodeError> {
        match token {
            Token::StartObject => self.stack.push(Frame::Object {
                map: Map::new(),
                pending: None,
            }),
            Token::StartArray => self.stack.push(Frame::Array(Vec::new())),
            Token::EndObject => match self.stack.pop() {
                Some(Frame::Object { map, pending: None }) => self.push_value(Value::Object(map))?,
                _ => return Err(EncodeError::Structure("unbalanced object end".to_string())),
            },
            Token::EndArray => match self.stack.pop() {
                Some(Frame::Array(items)) => self.push_value(Value::Array(items))?,
                _ => return Err(EncodeError::Structure("unbalanced array end".to_string())),
            },
            Token::FieldName(name) => match self.stack.last_mut() {
                Some(Frame::Object { pending, .. }) if pending.is_none() => *pending = Some(name),
                _ => return Err(EncodeError::Structure(format!("misplaced field name '{name}'"))),
            },
            Token::Null => self.push_value(Value::Null)?,
            Token::Bool(b) => self.push_value(Value::Bool(b))?,
            Token::Int(i) => self.push_value(Value::Number(i.into()))?,
            Token::UInt(u) => self.push_value(Value::Number(u.into()))?,
            Token::Float(f) => {
                let number = Number::from_f64(f).ok_or_else(|| EncodeError::NumberOutOfRange {
                    target: "json number",
                    value: f.to_string(),
                })?;
                self.push_value(Value::Number(number))?;
            }
            Token::Text(s) => self.push_value(Value::String(s))?,
        }

        Ok(())
    }
}

///
/// DocumentReader
///

#[derive(Clone, Debug)]
pub struct DocumentReader {
    tokens: VecTokens,
}

impl DocumentReader {
    #[must_use]
    pub fn new(value: &Value) -> Self {
        let mut tokens = Vec::new();
        tokenize(value, &mut tokens);

        Self {
            tokens: VecTokens::new(tokens),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Document(e.to_string()))?;

        Ok(Self::new(&value))
    }
}

impl TokenReader for DocumentReader {
    fn next_token(&mut self) -> Result<Option<Token>, DecodeError> {
        self.tokens.next_token()
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, DecodeError> {
        self.tokens.peek_token()
    }
}

fn tokenize(value: &Value, out: &mut Vec<Token>) {
    match value {
        Value::Null => out.push(Token::Null),
        Value::Bool(b) => out.push(Token::Bool(*b)),
        Value::Number(n) => out.push(number_token(n)),
        Value::String(s) => out.push(Token::Text(s.clone())),
        Value::Array(items) => {
            out.push(Token::StartArray);
            for item in items {
                tokenize(item, out);
            }
            out.push(Token::EndArray);
        }
        Value::Object(map) => {
            out.push(Token::StartObject);
            for (key, item) in map {
                out.push(Token::FieldName(key.clone()));
                tokenize(item, out);
            }
            out.push(Token::EndObject);
        }
    }
}

fn number_token(n: &Number) -> Token {
    if let Some(u) = n.as_u64() {
        Token::UInt(u)
    } else if let Some(i) = n.as_i64() {
        Token::Int(i)
    } else {
        Token::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writer_keeps_field_order() {
        let mut w = DocumentWriter::new();
        for token in [
            Token::StartObject,
            Token::FieldName("z".into()),
            Token::Int(-1),
            Token::FieldName("a".into()),
            Token::StartArray,
            Token::Text("x".into()),
            Token::EndArray,
            Token::EndObject,
        ] {
            w.write(token).unwrap();
        }

        let doc = w.finish().unwrap();
        assert_eq!(doc.to_string(), r#"{"z":-1,"a":["x"]}"#);
    }

    #[test]
    fn writer_rejects_unbalanced_input() {
        let mut w = DocumentWriter::new();
        w.start_object().unwrap();
        assert!(w.end_array().is_err());

        let mut w = DocumentWriter::new();
        w.start_array().unwrap();
        assert!(w.finish().is_err());
    }

    #[test]
    fn reader_walks_nested_values() {
        let mut r = DocumentReader::new(&json!({"a": [1, -2, 1.5], "b": null}));
        let mut seen = Vec::new();
        while let Some(token) = r.next_token().unwrap() {
            seen.push(token);
        }

        assert_eq!(
            seen,
            vec![
                Token::StartObject,
                Token::FieldName("a".into()),
                Token::StartArray,
                Token::UInt(1),
                Token::Int(-2),
                Token::Float(1.5),
                Token::EndArray,
                Token::FieldName("b".into()),
                Token::Null,
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn malformed_json_is_a_document_error() {
        assert!(matches!(
            DocumentReader::from_json("{"),
            Err(DecodeError::Document(_))
        ));
    }
}
