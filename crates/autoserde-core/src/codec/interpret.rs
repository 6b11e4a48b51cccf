//! Plan interpreter.
//!
//! Executes encode and decode plans directly against `Bean` values, with
//! nested types resolved through a `CodecRegistry`.

use crate::{
    codec::{
        Bean, CodecRegistry, Datum, DynamicObject,
        read::{
            expect_start_object, next_field, parse_key, read_array, read_bool, read_number,
            read_optional, read_text, skip_value,
        },
    },
    error::{DecodeError, EncodeError},
    plan::{
        DecodeField, DecodePlan, EncodePlan, EnumTable, EnumWire, FieldAction, Guard, KeyOp,
        ValueOp,
    },
    token::{DepthLimit, MAX_DEPTH, TokenReader, TokenWriter},
};
use autoserde_schema::{node::EnumEncoding, types::NumericKind};

///
/// PlanEncoder
///

#[derive(Clone, Copy, Debug)]
pub struct PlanEncoder<'a> {
    registry: &'a CodecRegistry,
}

impl<'a> PlanEncoder<'a> {
    #[must_use]
    pub const fn new(registry: &'a CodecRegistry) -> Self {
        Self { registry }
    }

    /// Encode using the plan registered for the bean's type.
    pub fn encode(&self, bean: &dyn Bean, w: &mut dyn TokenWriter) -> Result<(), EncodeError> {
        let plan = self
            .registry
            .encoder(bean.type_path())
            .ok_or_else(|| EncodeError::MissingCodec(bean.type_path().to_string()))?;

        self.encode_with(plan, bean, w)
    }

    pub fn encode_with(
        &self,
        plan: &EncodePlan,
        bean: &dyn Bean,
        w: &mut dyn TokenWriter,
    ) -> Result<(), EncodeError> {
        w.start_object()?;

        for step in &plan.steps {
            let value = bean.get(&step.property).unwrap_or(&Datum::Null);

            match step.guard {
                Guard::Unconditional if value.is_null() => {
                    return Err(EncodeError::MissingValue {
                        type_path: plan.type_path.clone(),
                        property: step.property.clone(),
                    });
                }
                Guard::SkipWhenAbsent if value.is_null() => continue,
                _ => {}
            }

            w.field_name(&step.wire_name)?;
            self.write_value(&step.op, value, w)?;
        }

        w.end_object()
    }

    fn write_value(&self, op: &ValueOp, value: &Datum, w: &mut dyn TokenWriter) -> Result<(), EncodeError> {
        match (op, value) {
            (ValueOp::Optional(_), Datum::Null) => w.null(),
            (ValueOp::Optional(inner), value) => self.write_value(inner, value, w),
            (ValueOp::Bool, Datum::Bool(b)) => w.bool(*b),
            (ValueOp::Numeric(kind), value) => write_number(*kind, value, w),
            (ValueOp::Text, Datum::Text(s)) => w.text(s),
            (ValueOp::Enum(table), Datum::Enum(name)) => write_enum(table, name, w),
            (ValueOp::Sequence(item), Datum::List(items)) => {
                w.start_array()?;
                for value in items {
                    self.write_value(item, value, w)?;
                }
                w.end_array()
            }
            (ValueOp::Map { key, value: item }, Datum::Map(entries)) => {
                w.start_object()?;
                for (k, value) in entries {
                    w.field_name(&key_text(key, k)?)?;
                    self.write_value(item, value, w)?;
                }
                w.end_object()
            }
            (ValueOp::Nested(path), Datum::Object(obj)) => {
                let plan = self
                    .registry
                    .encoder(path)
                    .ok_or_else(|| EncodeError::MissingCodec(path.clone()))?;
                self.encode_with(plan, obj, w)
            }
            (op, value) => Err(mismatch(op_name(op), value)),
        }
    }
}

fn mismatch(expected: impl Into<String>, found: &Datum) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: expected.into(),
        found: found.kind().to_string(),
    }
}

fn op_name(op: &ValueOp) -> String {
    match op {
        ValueOp::Bool => "bool".to_string(),
        ValueOp::Numeric(kind) => kind.to_string(),
        ValueOp::Text => "text".to_string(),
        ValueOp::Enum(table) => table.path.clone(),
        ValueOp::Sequence(_) => "list".to_string(),
        ValueOp::Map { .. } => "map".to_string(),
        ValueOp::Nested(path) => path.clone(),
        ValueOp::Optional(inner) => format!("optional {}", op_name(inner)),
    }
}

fn write_enum(table: &EnumTable, name: &str, w: &mut dyn TokenWriter) -> Result<(), EncodeError> {
    match table.encode(name) {
        Some(EnumWire::Text(s)) => w.text(s),
        Some(EnumWire::Index(i)) => w.uint(i),
        None if table.encoding == EnumEncoding::DeclaredName => w.null(),
        None => Err(EncodeError::TypeMismatch {
            expected: table.path.clone(),
            found: name.to_string(),
        }),
    }
}

#[expect(clippy::cast_precision_loss)]
fn write_number(kind: NumericKind, value: &Datum, w: &mut dyn TokenWriter) -> Result<(), EncodeError> {
    let wide = match value {
        Datum::Int(i) => i128::from(*i),
        Datum::UInt(u) => i128::from(*u),
        Datum::Float(f) if kind.is_float() => return w.float(*f),
        other => return Err(mismatch(kind.as_str(), other)),
    };

    if kind.is_float() {
        return w.float(wide as f64);
    }
    if !fits(kind, wide) {
        return Err(EncodeError::NumberOutOfRange {
            target: kind.as_str(),
            value: wide.to_string(),
        });
    }

    match (i64::try_from(wide), u64::try_from(wide)) {
        (Ok(i), _) if kind.is_signed_int() => w.int(i),
        (_, Ok(u)) => w.uint(u),
        _ => Err(EncodeError::NumberOutOfRange {
            target: kind.as_str(),
            value: wide.to_string(),
        }),
    }
}

fn fits(kind: NumericKind, value: i128) -> bool {
    kind.int_bounds()
        .is_none_or(|(min, max)| (min..=max).contains(&value))
}

fn key_text(key: &KeyOp, value: &Datum) -> Result<String, EncodeError> {
    match (key, value) {
        (KeyOp::Text, Datum::Text(s)) => Ok(s.clone()),
        (KeyOp::Bool, Datum::Bool(b)) => Ok(b.to_string()),
        (KeyOp::Numeric(_), Datum::Int(_) | Datum::UInt(_) | Datum::Float(_)) => Ok(value.to_string()),
        (KeyOp::Enum(table), Datum::Enum(name)) => table.key_text(name).ok_or_else(|| {
            EncodeError::TypeMismatch {
                expected: table.path.clone(),
                found: name.clone(),
            }
        }),
        (_, other) => Err(mismatch("map key", other)),
    }
}

///
/// DecodeState
///

#[derive(Clone, Copy, Debug)]
enum DecodeState<'p> {
    ExpectObjectStart,
    ExpectFieldOrEnd,
    ExpectValue(&'p DecodeField),
    Done,
}

///
/// PlanDecoder
///

#[derive(Clone, Copy, Debug)]
pub struct PlanDecoder<'a> {
    registry: &'a CodecRegistry,
}

impl<'a> PlanDecoder<'a> {
    #[must_use]
    pub const fn new(registry: &'a CodecRegistry) -> Self {
        Self { registry }
    }

    /// Decode one instance of `type_path`.
    pub fn decode(&self, type_path: &str, r: &mut dyn TokenReader) -> Result<DynamicObject, DecodeError> {
        let plan = self
            .registry
            .decoder(type_path)
            .ok_or_else(|| DecodeError::MissingCodec(type_path.to_string()))?;

        self.decode_with(plan, r)
    }

    /// Decode with an explicit plan. Nesting is capped at `MAX_DEPTH`.
    pub fn decode_with(&self, plan: &DecodePlan, r: &mut dyn TokenReader) -> Result<DynamicObject, DecodeError> {
        self.decode_plan(plan, &mut DepthLimit::new(r, MAX_DEPTH))
    }

    /// Values are collected first and applied to a fresh instance only once
    /// the whole object has been read, so a failed decode leaves nothing
    /// half-built.
    fn decode_plan(&self, plan: &DecodePlan, r: &mut dyn TokenReader) -> Result<DynamicObject, DecodeError> {
        let mut values: Vec<(&str, Datum)> = Vec::new();
        let mut state = DecodeState::ExpectObjectStart;

        loop {
            state = match state {
                DecodeState::ExpectObjectStart => {
                    expect_start_object(r)?;
                    DecodeState::ExpectFieldOrEnd
                }
                DecodeState::ExpectFieldOrEnd => match next_field(r)? {
                    None => DecodeState::Done,
                    Some(name) => match plan.resolve(&name) {
                        FieldAction::Decode(field) => DecodeState::ExpectValue(field),
                        FieldAction::Skip => {
                            skip_value(r)?;
                            DecodeState::ExpectFieldOrEnd
                        }
                        FieldAction::Unknown => {
                            return Err(DecodeError::unknown_property(&plan.type_path, name));
                        }
                    },
                },
                DecodeState::ExpectValue(field) => {
                    values.push((&field.property, self.read_value(&field.op, r)?));
                    DecodeState::ExpectFieldOrEnd
                }
                DecodeState::Done => break,
            };
        }

        let mut obj = DynamicObject::new(&plan.type_path);
        for (property, value) in values {
            obj.set(property, value);
        }

        Ok(obj)
    }

    fn read_value(&self, op: &ValueOp, r: &mut dyn TokenReader) -> Result<Datum, DecodeError> {
        match op {
            ValueOp::Optional(inner) => {
                read_optional(r, |r| self.read_value(inner, r)).map(Option::unwrap_or_default)
            }
            ValueOp::Bool => read_bool(r).map(Datum::Bool),
            ValueOp::Numeric(kind) => read_numeric(*kind, r),
            ValueOp::Text => read_text(r).map(Datum::Text),
            ValueOp::Enum(table) => read_enum(table, r),
            ValueOp::Sequence(item) => read_array(r, |r| self.read_value(item, r)).map(Datum::List),
            ValueOp::Map { key, value } => {
                expect_start_object(r)?;
                let mut entries = Vec::new();
                while let Some(name) = next_field(r)? {
                    let k = parse_key_datum(key, &name)?;
                    entries.push((k, self.read_value(value, r)?));
                }
                Ok(Datum::Map(entries))
            }
            ValueOp::Nested(path) => {
                let plan = self
                    .registry
                    .decoder(path)
                    .ok_or_else(|| DecodeError::MissingCodec(path.clone()))?;
                self.decode_plan(plan, r).map(Datum::Object)
            }
        }
    }
}

fn read_numeric(kind: NumericKind, r: &mut dyn TokenReader) -> Result<Datum, DecodeError> {
    match kind {
        NumericKind::F32 => read_number::<f32>(r).map(|f| Datum::Float(f64::from(f))),
        NumericKind::F64 => read_number::<f64>(r).map(Datum::Float),
        NumericKind::I8 => read_number::<i8>(r).map(|v| Datum::Int(v.into())),
        NumericKind::I16 => read_number::<i16>(r).map(|v| Datum::Int(v.into())),
        NumericKind::I32 => read_number::<i32>(r).map(|v| Datum::Int(v.into())),
        NumericKind::I64 => read_number::<i64>(r).map(Datum::Int),
        NumericKind::U8 => read_number::<u8>(r).map(|v| Datum::UInt(v.into())),
        NumericKind::U16 => read_number::<u16>(r).map(|v| Datum::UInt(v.into())),
        NumericKind::U32 => read_number::<u32>(r).map(|v| Datum::UInt(v.into())),
        NumericKind::U64 => read_number::<u64>(r).map(Datum::UInt),
    }
}

fn read_enum(table: &EnumTable, r: &mut dyn TokenReader) -> Result<Datum, DecodeError> {
    let entry = if table.is_ordinal() {
        let index = read_number::<u64>(r)?;
        table
            .decode_index(index)
            .ok_or_else(|| DecodeError::unknown_enum(&table.path, index))?
    } else {
        let text = read_text(r)?;
        table
            .decode_text(&text)
            .ok_or_else(|| DecodeError::unknown_enum(&table.path, &text))?
    };

    Ok(Datum::Enum(entry.name.clone()))
}

fn parse_key_datum(key: &KeyOp, name: &str) -> Result<Datum, DecodeError> {
    match key {
        KeyOp::Text => Ok(Datum::Text(name.to_string())),
        KeyOp::Bool => parse_key::<bool>(name, "bool").map(Datum::Bool),
        KeyOp::Numeric(kind) if kind.is_float() => {
            parse_key::<f64>(name, kind.as_str()).map(Datum::Float)
        }
        KeyOp::Numeric(kind) => {
            let wide = parse_key::<i128>(name, kind.as_str())?;
            let invalid = || DecodeError::InvalidMapKey {
                key: name.to_string(),
                expected: kind.as_str().to_string(),
            };
            if !fits(*kind, wide) {
                return Err(invalid());
            }
            if kind.is_signed_int() {
                i64::try_from(wide).map(Datum::Int).map_err(|_| invalid())
            } else {
                u64::try_from(wide).map(Datum::UInt).map_err(|_| invalid())
            }
        }
        KeyOp::Enum(table) => table
            .decode_key(name)
            .map(|e| Datum::Enum(e.name.clone()))
            .ok_or_else(|| DecodeError::unknown_enum(&table.path, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::{DocumentReader, DocumentWriter},
        test_support::{foo_schema, status_enum},
        token::{Token, VecTokens},
    };
    use autoserde_schema::{
        catalog::{Schema, Scope},
        node::{EnumMode, PropertyDescriptor, TypeDescriptor},
        policy::TypePolicy,
        types::{Inclusion, ValueType},
    };
    use serde_json::{Value, json};

    fn registry(schema: &Schema) -> CodecRegistry {
        CodecRegistry::from_catalog(schema, &Scope::All, EnumMode::Name).unwrap()
    }

    fn foo() -> DynamicObject {
        DynamicObject::new("app::Foo")
            .with("name", "x")
            .with("count", 5_i64)
            .with("tags", Datum::List(vec!["a".into(), "b".into()]))
            .with("labels", Datum::Map(vec![("k".into(), "v".into())]))
            .with("status", Datum::constant("ACTIVE"))
    }

    fn encode(registry: &CodecRegistry, bean: &dyn Bean) -> Result<Value, EncodeError> {
        let mut w = DocumentWriter::new();
        PlanEncoder::new(registry).encode(bean, &mut w)?;
        w.finish()
    }

    fn decode(registry: &CodecRegistry, type_path: &str, doc: Value) -> Result<DynamicObject, DecodeError> {
        PlanDecoder::new(registry).decode(type_path, &mut DocumentReader::new(&doc))
    }

    #[test]
    fn foo_encodes_in_declared_order() {
        let registry = registry(&foo_schema());
        let doc = encode(&registry, &foo()).unwrap();

        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"name":"x","count":5,"tags":["a","b"],"labels":{"k":"v"},"status":"Active"}"#
        );
        assert_eq!(decode(&registry, "app::Foo", doc).unwrap(), foo());
    }

    #[test]
    fn missing_required_value_is_reported() {
        let registry = registry(&foo_schema());
        let mut bean = foo();
        bean.unset("count");

        assert_eq!(
            encode(&registry, &bean),
            Err(EncodeError::MissingValue {
                type_path: "app::Foo".into(),
                property: "count".into(),
            })
        );
    }

    #[test]
    fn inclusion_controls_absent_optionals() {
        let mut schema = foo_schema();
        schema.insert_type(
            TypeDescriptor::new("app::Profile")
                .property(
                    PropertyDescriptor::new("nick", ValueType::optional(ValueType::Text))
                        .with_getter("getNick")
                        .with_inclusion(Inclusion::NonNull),
                )
                .property(
                    PropertyDescriptor::new("note", ValueType::optional(ValueType::Text))
                        .with_getter("getNote"),
                ),
        );
        let registry = registry(&schema);

        let empty = DynamicObject::new("app::Profile");
        assert_eq!(encode(&registry, &empty).unwrap(), json!({"note": null}));

        let full = empty.with("nick", "n").with("note", "t");
        assert_eq!(encode(&registry, &full).unwrap(), json!({"nick": "n", "note": "t"}));
    }

    #[test]
    fn unknown_fields_follow_policy() {
        let mut schema = foo_schema();
        let doc = json!({"name": "x", "count": 5, "extra": 123});

        assert_eq!(
            decode(&registry(&schema), "app::Foo", doc.clone()),
            Err(DecodeError::UnknownProperty {
                type_path: "app::Foo".into(),
                name: "extra".into(),
            })
        );

        let lenient = TypeDescriptor {
            policy: TypePolicy {
                ignore_unknown: true,
                ..TypePolicy::default()
            },
            ..crate::test_support::foo_type()
        };
        schema.insert_type(lenient);

        let obj = decode(&registry(&schema), "app::Foo", doc).unwrap();
        assert_eq!(obj.get("name"), Some(&Datum::text("x")));
        assert_eq!(obj.get("count"), Some(&Datum::Int(5)));
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        let registry = registry(&foo_schema());

        assert_eq!(
            decode(&registry, "app::Foo", json!({"status": "Paused"})),
            Err(DecodeError::UnknownEnumConstant {
                enum_path: "app::Status".into(),
                value: "Paused".into(),
            })
        );
    }

    #[test]
    fn nested_types_use_their_own_plans() {
        let mut schema = foo_schema();
        schema.insert_type(
            TypeDescriptor::new("app::Holder").property(
                PropertyDescriptor::new("foo", ValueType::named("app::Foo"))
                    .with_getter("getFoo")
                    .with_setter("setFoo"),
            ),
        );
        let registry = registry(&schema);

        let holder = DynamicObject::new("app::Holder").with("foo", foo());
        let doc = encode(&registry, &holder).unwrap();

        assert_eq!(doc["foo"]["status"], json!("Active"));
        assert_eq!(decode(&registry, "app::Holder", doc).unwrap(), holder);
    }

    #[test]
    fn recursive_types_stop_at_the_depth_limit() {
        let mut schema = Schema::new();
        schema.insert_type(
            TypeDescriptor::new("app::Node").property(
                PropertyDescriptor::new("child", ValueType::optional(ValueType::named("app::Node")))
                    .with_getter("getChild")
                    .with_setter("setChild"),
            ),
        );
        let registry = registry(&schema);

        let levels = MAX_DEPTH + 8;
        let mut tokens = Vec::new();
        for _ in 0..levels {
            tokens.extend([Token::StartObject, Token::FieldName("child".into())]);
        }
        tokens.push(Token::Null);
        tokens.extend(std::iter::repeat_n(Token::EndObject, levels));

        assert_eq!(
            PlanDecoder::new(&registry).decode("app::Node", &mut VecTokens::new(tokens)),
            Err(DecodeError::DepthLimitExceeded { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn ordinal_enums_write_indexes() {
        let mut schema = Schema::new();
        schema.insert_enum(status_enum().with_mode(EnumMode::Index));
        schema.insert_type(
            TypeDescriptor::new("app::Task").property(
                PropertyDescriptor::new("status", ValueType::named("app::Status"))
                    .with_getter("getStatus")
                    .with_setter("setStatus"),
            ),
        );
        let registry = registry(&schema);

        let task = DynamicObject::new("app::Task").with("status", Datum::constant("DONE"));
        let doc = encode(&registry, &task).unwrap();

        assert_eq!(doc, json!({"status": 1}));
        assert_eq!(decode(&registry, "app::Task", doc).unwrap(), task);
        assert!(matches!(
            decode(&registry, "app::Task", json!({"status": 7})),
            Err(DecodeError::UnknownEnumConstant { .. })
        ));
    }

    #[test]
    fn numbers_outside_the_declared_kind_fail() {
        let registry = registry(&foo_schema());

        let bean = foo().with("count", Datum::UInt(u64::MAX));
        assert!(matches!(
            encode(&registry, &bean),
            Err(EncodeError::NumberOutOfRange { target: "i32", .. })
        ));
        assert!(matches!(
            decode(&registry, "app::Foo", json!({"count": 1_u64 << 40})),
            Err(DecodeError::NumberOutOfRange { .. })
        ));
    }
}
