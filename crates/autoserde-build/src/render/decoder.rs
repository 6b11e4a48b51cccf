use super::{ident, numeric_ty, rt, type_path};
use crate::error::RenderError;
use autoserde_core::{
    plan::{DecodePlan, EnumTable, KeyOp, ValueOp},
    registry::ArtifactRef,
};
use autoserde_schema::node::EnumEncoding;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Render a decoder unit.
///
/// The emitted `decode` expects an object start, then loops over field
/// names: known wire names read into a local slot, ignored names and (when
/// the type tolerates them) unknown names are skipped structurally, and
/// anything else fails with `UnknownProperty`. Slots are applied through
/// setters on a default-constructed instance only after the closing brace,
/// so a failed decode never hands back a partial value.
pub fn render_decoder(plan: &DecodePlan, unit: &ArtifactRef) -> Result<TokenStream, RenderError> {
    let name = ident(&unit.name)?;
    let target = type_path(&plan.type_path)?;
    let reader = rt(&["token", "TokenReader"]);
    let decode_error = rt(&["error", "DecodeError"]);
    let decode_trait = rt(&["codec", "Decode"]);
    let expect_start_object = rt(&["codec", "read", "expect_start_object"]);
    let next_field = rt(&["codec", "read", "next_field"]);
    let skip_value = rt(&["codec", "read", "skip_value"]);

    let mut slots = Vec::new();
    let mut arms = Vec::new();
    let mut applies = Vec::new();

    for (i, field) in plan.fields.iter().enumerate() {
        let slot = format_ident!("slot{i}");
        let setter = ident(&field.setter)?;
        let wire = field.wire_name.as_str();
        let read = read_value(&field.op, 0)?;

        slots.push(quote!(let mut #slot = None;));
        arms.push(quote!(#wire => #slot = Some(#read),));
        applies.push(quote! {
            if let Some(v) = #slot {
                obj.#setter(v);
            }
        });
    }

    // ignored names shadowed by a decodable field never reach their arm
    let ignored: Vec<&str> = plan
        .ignored
        .iter()
        .map(String::as_str)
        .filter(|name| plan.field(name).is_none())
        .collect();
    let ignored_arm = (!ignored.is_empty()).then(|| quote!(#(#ignored)|* => #skip_value(r)?,));

    let unknown_arm = if plan.ignore_unknown {
        quote!(_ => #skip_value(r)?,)
    } else {
        let type_path = plan.type_path.as_str();
        quote!(_ => return Err(#decode_error::unknown_property(#type_path, field)),)
    };

    let mutability = (!applies.is_empty()).then(|| quote!(mut));

    Ok(quote! {
        pub struct #name;

        impl #name {
            pub fn decode(r: &mut dyn #reader) -> Result<#target, #decode_error> {
                #expect_start_object(r)?;
                #(#slots)*

                while let Some(field) = #next_field(r)? {
                    match field.as_str() {
                        #(#arms)*
                        #ignored_arm
                        #unknown_arm
                    }
                }

                let #mutability obj = <#target as ::std::default::Default>::default();
                #(#applies)*

                Ok(obj)
            }
        }

        impl #decode_trait for #target {
            fn decode(r: &mut dyn #reader) -> Result<Self, #decode_error> {
                #name::decode(r)
            }
        }
    })
}

/// Expression reading one value from `r`, propagating errors with `?`.
fn read_value(op: &ValueOp, depth: usize) -> Result<TokenStream, RenderError> {
    let read = |f: &str| rt(&["codec", "read", f]);

    let tokens = match op {
        ValueOp::Bool => {
            let f = read("read_bool");
            quote!(#f(r)?)
        }
        ValueOp::Numeric(kind) => {
            let f = read("read_number");
            let ty = numeric_ty(*kind);
            quote!(#f::<#ty>(r)?)
        }
        ValueOp::Text => {
            let f = read("read_text");
            quote!(#f(r)?)
        }
        ValueOp::Enum(table) => read_enum(table)?,
        ValueOp::Sequence(item) => {
            let f = read("read_array");
            let item = read_value(item, depth + 1)?;
            quote!(#f(r, |r| Ok(#item))?)
        }
        ValueOp::Map { key, value } => {
            let f = read("read_map");
            let k = format_ident!("key{depth}");
            let parse = parse_key(key, &k)?;
            let value = read_value(value, depth + 1)?;
            quote!(#f(r, |#k| #parse, |r| Ok(#value))?)
        }
        ValueOp::Nested(path) => {
            let target = type_path(path)?;
            let decode_trait = rt(&["codec", "Decode"]);
            quote!(<#target as #decode_trait>::decode(r)?)
        }
        ValueOp::Optional(inner) => {
            let f = read("read_optional");
            let inner = read_value(inner, depth + 1)?;
            quote!(#f(r, |r| Ok(#inner))?)
        }
    };

    Ok(tokens)
}

fn read_enum(table: &EnumTable) -> Result<TokenStream, RenderError> {
    let target = type_path(&table.path)?;
    let path = table.path.as_str();
    let decode_error = rt(&["error", "DecodeError"]);

    if table.is_ordinal() {
        let read_number = rt(&["codec", "read", "read_number"]);
        let arms = table
            .entries
            .iter()
            .map(|entry| {
                let variant = ident(&entry.name)?;
                let index = entry.ordinal as u64;

                Ok(quote!(#index => #target::#variant,))
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        return Ok(quote! {
            match #read_number::<u64>(r)? {
                #(#arms)*
                other => return Err(#decode_error::unknown_enum(#path, other)),
            }
        });
    }

    let read_text = rt(&["codec", "read", "read_text"]);
    let arms = text_arms(table, &target, |wire, variant| quote!(#wire => #variant,))?;

    Ok(quote! {
        {
            let text = #read_text(r)?;
            match text.as_str() {
                #(#arms)*
                _ => return Err(#decode_error::unknown_enum(#path, &text)),
            }
        }
    })
}

/// One arm per constant in decode priority: overrides first, then the
/// declared names of constants without one.
fn text_arms(
    table: &EnumTable,
    target: &syn::Path,
    arm: impl Fn(&str, TokenStream) -> TokenStream,
) -> Result<Vec<TokenStream>, RenderError> {
    let mut ordered: Vec<_> = table.entries.iter().collect();
    if table.encoding == EnumEncoding::OverrideOrName {
        ordered.sort_by_key(|e| !e.overridden);
    }

    ordered
        .into_iter()
        .map(|entry| {
            let variant = ident(&entry.name)?;
            let wire = if table.encoding == EnumEncoding::OverrideOrName && !entry.overridden {
                entry.name.as_str()
            } else {
                entry.wire.as_str()
            };

            Ok(arm(wire, quote!(#target::#variant)))
        })
        .collect()
}

/// Closure body converting map key `k: String` into the key type.
fn parse_key(key: &KeyOp, k: &proc_macro2::Ident) -> Result<TokenStream, RenderError> {
    let parse = rt(&["codec", "read", "parse_key"]);

    let tokens = match key {
        KeyOp::Text => quote!(Ok(#k)),
        KeyOp::Bool => quote!(#parse::<bool>(&#k, "bool")),
        KeyOp::Numeric(kind) => {
            let ty = numeric_ty(*kind);
            let name = kind.as_str();
            quote!(#parse::<#ty>(&#k, #name))
        }
        KeyOp::Enum(table) => {
            let target = type_path(&table.path)?;
            let path = table.path.as_str();
            let decode_error = rt(&["error", "DecodeError"]);

            let arms = if table.is_ordinal() {
                table
                    .entries
                    .iter()
                    .map(|entry| {
                        let variant = ident(&entry.name)?;
                        let text = entry.ordinal.to_string();

                        Ok(quote!(#text => Ok(#target::#variant),))
                    })
                    .collect::<Result<Vec<_>, RenderError>>()?
            } else {
                text_arms(table, &target, |wire, variant| quote!(#wire => Ok(#variant),))?
            };

            quote! {
                match #k.as_str() {
                    #(#arms)*
                    _ => Err(#decode_error::unknown_enum(#path, &#k)),
                }
            }
        }
    };

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoserde_core::synth::{SynthContext, synthesize_decoder};
    use autoserde_schema::{
        catalog::Schema,
        node::{EnumConstant, EnumDescriptor, EnumMode, PropertyDescriptor, TypeDescriptor},
        policy::TypePolicy,
        types::{NumericKind, ValueType},
    };
    use std::collections::BTreeSet;

    fn render(ty: &TypeDescriptor, schema: &Schema) -> String {
        render_with(ty, &SynthContext::new(schema))
    }

    fn render_with(ty: &TypeDescriptor, ctx: &SynthContext<'_>) -> String {
        let plan = synthesize_decoder(ty, ctx).unwrap();
        let tokens = render_decoder(&plan, &ArtifactRef::decoder_for(ty)).unwrap();

        syn::parse2::<syn::File>(tokens.clone()).expect("decoder is valid Rust");
        tokens.to_string()
    }

    fn status_schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert_enum(
            EnumDescriptor::new("app::Status")
                .constant(EnumConstant::new("PAUSED"))
                .constant(EnumConstant::new("ACTIVE").renamed("Active")),
        );
        schema
    }

    fn task() -> TypeDescriptor {
        TypeDescriptor::new("app::Task")
            .property(PropertyDescriptor::new("title", ValueType::Text).with_setter("set_title"))
            .property(
                PropertyDescriptor::new("status", ValueType::named("app::Status"))
                    .with_setter("set_status"),
            )
    }

    #[test]
    fn strict_types_reject_unknown_names() {
        let code = render(&task(), &status_schema());

        assert!(code.contains("pub struct TaskDecoder"));
        assert!(code.contains("\"title\" => slot0 = Some (:: autoserde :: core :: codec :: read :: read_text (r) ?)"));
        assert!(code.contains("unknown_property (\"app::Task\" , field)"));
        assert!(code.contains("obj . set_title (v)"));
    }

    #[test]
    fn lenient_types_skip_unknown_names() {
        let ty = TypeDescriptor {
            policy: TypePolicy {
                ignore_unknown: true,
                ignored: BTreeSet::from(["legacy".to_string()]),
                ..TypePolicy::default()
            },
            ..task()
        };
        let code = render(&ty, &status_schema());

        assert!(code.contains("\"legacy\" => :: autoserde :: core :: codec :: read :: skip_value (r) ?"));
        assert!(code.contains("_ => :: autoserde :: core :: codec :: read :: skip_value (r) ?"));
        assert!(!code.contains("unknown_property"));
    }

    #[test]
    fn enum_overrides_are_matched_before_names() {
        let code = render(&task(), &status_schema());

        let active = code.find("\"Active\" => crate :: app :: Status :: ACTIVE").unwrap();
        let paused = code.find("\"PAUSED\" => crate :: app :: Status :: PAUSED").unwrap();
        assert!(active < paused);
        assert!(code.contains("unknown_enum (\"app::Status\" , & text)"));
    }

    #[test]
    fn ordinal_enums_match_indexes() {
        let schema = status_schema();
        let ctx = SynthContext::new(&schema).with_enum_mode(EnumMode::Index);
        let code = render_with(&task(), &ctx);

        assert!(code.contains("0u64 => crate :: app :: Status :: PAUSED"));
        assert!(code.contains("other => return Err"));
    }

    #[test]
    fn containers_decode_recursively() {
        let ty = TypeDescriptor::new("app::Scores").property(
            PropertyDescriptor::new(
                "scores",
                ValueType::map(
                    ValueType::Numeric(NumericKind::U32),
                    ValueType::sequence(ValueType::optional(ValueType::Numeric(NumericKind::F64))),
                ),
            )
            .with_setter("set_scores"),
        );
        let code = render(&ty, &Schema::new());

        assert!(code.contains("parse_key :: < u32 > (& key0 , \"u32\")"));
        assert!(code.contains("read_number :: < f64 > (r) ?"));
    }

    #[test]
    fn types_without_fields_still_parse() {
        let ty = TypeDescriptor::new("app::Marker");
        let code = render(&ty, &Schema::new());

        assert!(code.contains("let obj ="));
    }
}
