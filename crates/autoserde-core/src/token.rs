//! Streaming document model.
//!
//! Encoders push tokens into a `TokenWriter`; decoders pull them from a
//! `TokenReader`. Object keys always arrive as `FieldName`.

use crate::error::{DecodeError, EncodeError};
use derive_more::Display;
use std::collections::VecDeque;

/// Deepest container nesting any decode entry point accepts.
pub const MAX_DEPTH: usize = 128;

///
/// Token
///

#[derive(Clone, Debug, Display, PartialEq)]
pub enum Token {
    #[display("'{{'")]
    StartObject,

    #[display("'}}'")]
    EndObject,

    #[display("'['")]
    StartArray,

    #[display("']'")]
    EndArray,

    #[display("field '{_0}'")]
    FieldName(String),

    #[display("null")]
    Null,

    #[display("{_0}")]
    Bool(bool),

    #[display("{_0}")]
    Int(i64),

    #[display("{_0}")]
    UInt(u64),

    #[display("{_0}")]
    Float(f64),

    #[display("\"{_0}\"")]
    Text(String),
}

impl Token {
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::UInt(_) | Self::Float(_) | Self::Text(_)
        )
    }
}

///
/// TokenWriter
///

pub trait TokenWriter {
    fn write(&mut self, token: Token) -> Result<(), EncodeError>;

    fn start_object(&mut self) -> Result<(), EncodeError> {
        self.write(Token::StartObject)
    }

    fn end_object(&mut self) -> Result<(), EncodeError> {
        self.write(Token::EndObject)
    }

    fn start_array(&mut self) -> Result<(), EncodeError> {
        self.write(Token::StartArray)
    }

    fn end_array(&mut self) -> Result<(), EncodeError> {
        self.write(Token::EndArray)
    }

    fn field_name(&mut self, name: &str) -> Result<(), EncodeError> {
        self.write(Token::FieldName(name.to_string()))
    }

    fn null(&mut self) -> Result<(), EncodeError> {
        self.write(Token::Null)
    }

    fn bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write(Token::Bool(value))
    }

    fn int(&mut self, value: i64) -> Result<(), EncodeError> {
        self.write(Token::Int(value))
    }

    fn uint(&mut self, value: u64) -> Result<(), EncodeError> {
        self.write(Token::UInt(value))
    }

    fn float(&mut self, value: f64) -> Result<(), EncodeError> {
        self.write(Token::Float(value))
    }

    fn text(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write(Token::Text(value.to_string()))
    }
}

///
/// TokenReader
/// Pull-based reader with one token of lookahead.
///

pub trait TokenReader {
    fn next_token(&mut self) -> Result<Option<Token>, DecodeError>;

    fn peek_token(&mut self) -> Result<Option<&Token>, DecodeError>;

    /// Next token, treating end of input as an error.
    fn expect_token(&mut self) -> Result<Token, DecodeError> {
        self.next_token()?.ok_or(DecodeError::UnexpectedEnd)
    }
}

///
/// TokenRecorder
/// Writer that keeps every token, for inspection.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenRecorder {
    tokens: Vec<Token>,
}

impl TokenRecorder {
    #[must_use]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Replay the recording as a reader.
    #[must_use]
    pub fn into_reader(self) -> VecTokens {
        VecTokens::new(self.tokens)
    }
}

impl TokenWriter for TokenRecorder {
    fn write(&mut self, token: Token) -> Result<(), EncodeError> {
        self.tokens.push(token);
        Ok(())
    }
}

///
/// VecTokens
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VecTokens {
    tokens: VecDeque<Token>,
}

impl VecTokens {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl TokenReader for VecTokens {
    fn next_token(&mut self) -> Result<Option<Token>, DecodeError> {
        Ok(self.tokens.pop_front())
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, DecodeError> {
        Ok(self.tokens.front())
    }
}

///
/// DepthLimit
///
/// Passes tokens through and fails once objects and arrays nest deeper
/// than `limit`. Every public decode entry point reads through one.
///

pub struct DepthLimit<'a> {
    inner: &'a mut dyn TokenReader,
    depth: usize,
    limit: usize,
}

impl<'a> DepthLimit<'a> {
    pub fn new(inner: &'a mut dyn TokenReader, limit: usize) -> Self {
        Self {
            inner,
            depth: 0,
            limit,
        }
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

impl TokenReader for DepthLimit<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, DecodeError> {
        let token = self.inner.next_token()?;

        match token {
            Some(Token::StartObject | Token::StartArray) => {
                if self.depth >= self.limit {
                    return Err(DecodeError::DepthLimitExceeded { limit: self.limit });
                }
                self.depth += 1;
            }
            Some(Token::EndObject | Token::EndArray) => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }

        Ok(token)
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, DecodeError> {
        self.inner.peek_token()
    }
}
