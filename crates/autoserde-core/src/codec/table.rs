//! Typed codecs for generated code.
//!
//! Generated encoder and decoder units implement `Encode` / `Decode` for
//! their type, and the generated registry loads them into a `CodecTable`.

use crate::{
    document::{DocumentReader, DocumentWriter},
    error::{DecodeError, EncodeError},
    token::{DepthLimit, MAX_DEPTH, TokenReader, TokenWriter},
};
use serde_json::Value;
use std::any::{Any, TypeId, type_name};

///
/// Encode
///

pub trait Encode {
    fn encode(&self, w: &mut dyn TokenWriter) -> Result<(), EncodeError>;
}

///
/// Decode
///

pub trait Decode: Sized {
    fn decode(r: &mut dyn TokenReader) -> Result<Self, DecodeError>;
}

pub type EncodeFn<T> = fn(&T, &mut dyn TokenWriter) -> Result<(), EncodeError>;
pub type DecodeFn<T> = fn(&mut dyn TokenReader) -> Result<T, DecodeError>;

type ErasedEncode = Box<dyn Fn(&dyn Any, &mut dyn TokenWriter) -> Result<(), EncodeError> + Send + Sync>;
type ErasedDecode =
    Box<dyn Fn(&mut dyn TokenReader) -> Result<Box<dyn Any>, DecodeError> + Send + Sync>;

struct Entry<F> {
    path: String,
    type_id: TypeId,
    func: F,
}

///
/// CodecTable
///
/// Runtime registry keyed by type. Registration order is kept; a later
/// registration for the same type shadows the earlier one.
///

#[derive(Default)]
pub struct CodecTable {
    encoders: Vec<Entry<ErasedEncode>>,
    decoders: Vec<Entry<ErasedDecode>>,
}

impl CodecTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            encoders: Vec::new(),
            decoders: Vec::new(),
        }
    }

    pub fn add_encoder<T: 'static>(&mut self, path: &str, encode: EncodeFn<T>) {
        let func: ErasedEncode = Box::new(move |value: &dyn Any, w: &mut dyn TokenWriter| {
            let value = value
                .downcast_ref::<T>()
                .ok_or_else(|| EncodeError::TypeMismatch {
                    expected: type_name::<T>().to_string(),
                    found: "another type".to_string(),
                })?;
            encode(value, w)
        });

        self.encoders.push(Entry {
            path: path.to_string(),
            type_id: TypeId::of::<T>(),
            func,
        });
    }

    pub fn add_decoder<T: 'static>(&mut self, path: &str, decode: DecodeFn<T>) {
        let func: ErasedDecode = Box::new(move |r: &mut dyn TokenReader| {
            decode(r).map(|v| Box::new(v) as Box<dyn Any>)
        });

        self.decoders.push(Entry {
            path: path.to_string(),
            type_id: TypeId::of::<T>(),
            func,
        });
    }

    pub fn encode<T: 'static>(&self, value: &T, w: &mut dyn TokenWriter) -> Result<(), EncodeError> {
        let entry = self
            .encoders
            .iter()
            .rev()
            .find(|e| e.type_id == TypeId::of::<T>())
            .ok_or_else(|| EncodeError::MissingCodec(type_name::<T>().to_string()))?;

        (entry.func)(value, w)
    }

    pub fn decode<T: 'static>(&self, r: &mut dyn TokenReader) -> Result<T, DecodeError> {
        let entry = self
            .decoders
            .iter()
            .rev()
            .find(|e| e.type_id == TypeId::of::<T>())
            .ok_or_else(|| DecodeError::MissingCodec(type_name::<T>().to_string()))?;

        let value = (entry.func)(&mut DepthLimit::new(r, MAX_DEPTH))?;
        value
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| DecodeError::MissingCodec(entry.path.clone()))
    }

    pub fn to_value<T: 'static>(&self, value: &T) -> Result<Value, EncodeError> {
        let mut w = DocumentWriter::new();
        self.encode(value, &mut w)?;
        w.finish()
    }

    pub fn from_value<T: 'static>(&self, value: &Value) -> Result<T, DecodeError> {
        self.decode(&mut DocumentReader::new(value))
    }

    /// Type paths with an encoder, in registration order.
    pub fn encoder_paths(&self) -> impl Iterator<Item = &str> {
        self.encoders.iter().map(|e| e.path.as_str())
    }

    /// Type paths with a decoder, in registration order.
    pub fn decoder_paths(&self) -> impl Iterator<Item = &str> {
        self.decoders.iter().map(|e| e.path.as_str())
    }
}

/// Encode any `Encode` value into a JSON document.
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    let mut w = DocumentWriter::new();
    value.encode(&mut w)?;
    w.finish()
}

/// Decode a JSON document into any `Decode` type.
pub fn from_value<T: Decode>(value: &Value) -> Result<T, DecodeError> {
    let mut reader = DocumentReader::new(value);

    T::decode(&mut DepthLimit::new(&mut reader, MAX_DEPTH))
}
