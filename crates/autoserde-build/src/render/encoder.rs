use super::{ident, rt, type_path};
use crate::error::RenderError;
use autoserde_core::{
    plan::{EncodePlan, EncodeStep, EnumTable, Guard, KeyOp, ValueOp},
    registry::ArtifactRef,
};
use autoserde_schema::node::EnumEncoding;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Render an encoder unit: a unit struct with an `encode` fn plus the
/// `Encode` impl for the target type.
pub fn render_encoder(plan: &EncodePlan, unit: &ArtifactRef) -> Result<TokenStream, RenderError> {
    let name = ident(&unit.name)?;
    let target = type_path(&plan.type_path)?;
    let writer = rt(&["token", "TokenWriter"]);
    let encode_error = rt(&["error", "EncodeError"]);
    let encode_trait = rt(&["codec", "Encode"]);

    let steps = plan
        .steps
        .iter()
        .map(render_step)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        pub struct #name;

        impl #name {
            pub fn encode(value: &#target, w: &mut dyn #writer) -> Result<(), #encode_error> {
                w.start_object()?;
                #(#steps)*
                w.end_object()
            }
        }

        impl #encode_trait for #target {
            fn encode(&self, w: &mut dyn #writer) -> Result<(), #encode_error> {
                #name::encode(self, w)
            }
        }
    })
}

fn render_step(step: &EncodeStep) -> Result<TokenStream, RenderError> {
    let getter = ident(&step.getter)?;
    let wire = step.wire_name.as_str();

    let tokens = match (step.guard, &step.op) {
        (Guard::SkipWhenAbsent, ValueOp::Optional(inner)) => {
            let write = write_value(inner, &quote!(v), 0)?;
            quote! {
                if let Some(v) = &value.#getter() {
                    w.field_name(#wire)?;
                    #write
                }
            }
        }
        (_, op) => {
            let write = write_value(op, &quote!(v), 0)?;
            quote! {
                {
                    let v = &value.#getter();
                    w.field_name(#wire)?;
                    #write
                }
            }
        }
    };

    Ok(tokens)
}

/// Statements writing the value behind the reference expression `v`.
fn write_value(op: &ValueOp, v: &TokenStream, depth: usize) -> Result<TokenStream, RenderError> {
    let tokens = match op {
        ValueOp::Bool => quote!(w.bool(*#v)?;),
        ValueOp::Numeric(kind) if kind.is_float() => quote!(w.float(f64::from(*#v))?;),
        ValueOp::Numeric(kind) if kind.is_signed_int() => quote!(w.int(i64::from(*#v))?;),
        ValueOp::Numeric(_) => quote!(w.uint(u64::from(*#v))?;),
        ValueOp::Text => quote!(w.text(#v)?;),
        ValueOp::Enum(table) => write_enum(table, v)?,
        ValueOp::Sequence(item) => {
            let binding = format_ident!("item{depth}");
            let write = write_value(item, &quote!(#binding), depth + 1)?;
            quote! {
                w.start_array()?;
                for #binding in #v {
                    #write
                }
                w.end_array()?;
            }
        }
        ValueOp::Map { key, value } => {
            let k = format_ident!("key{depth}");
            let binding = format_ident!("entry{depth}");
            let key_text = key_text(key, &k)?;
            let write = write_value(value, &quote!(#binding), depth + 1)?;
            quote! {
                w.start_object()?;
                for (#k, #binding) in #v {
                    w.field_name(#key_text)?;
                    #write
                }
                w.end_object()?;
            }
        }
        ValueOp::Nested(_) => {
            let encode_trait = rt(&["codec", "Encode"]);
            quote!(#encode_trait::encode(#v, w)?;)
        }
        ValueOp::Optional(inner) => {
            let binding = format_ident!("some{depth}");
            let write = write_value(inner, &quote!(#binding), depth + 1)?;
            quote! {
                match #v {
                    Some(#binding) => { #write }
                    None => w.null()?,
                }
            }
        }
    };

    Ok(tokens)
}

fn write_enum(table: &EnumTable, v: &TokenStream) -> Result<TokenStream, RenderError> {
    if table.encoding == EnumEncoding::CustomString {
        return Ok(quote!(w.text(&#v.to_string())?;));
    }

    let target = type_path(&table.path)?;
    let arms = table
        .entries
        .iter()
        .map(|entry| {
            let variant = ident(&entry.name)?;
            let write = if table.is_ordinal() {
                let index = entry.ordinal as u64;
                quote!(w.uint(#index)?)
            } else {
                let wire = entry.wire.as_str();
                quote!(w.text(#wire)?)
            };

            Ok(quote!(#target::#variant => #write,))
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(quote! {
        match #v {
            #(#arms)*
        }
    })
}

/// Expression yielding the `&str` form of map key `k`.
fn key_text(key: &KeyOp, k: &Ident) -> Result<TokenStream, RenderError> {
    let tokens = match key {
        KeyOp::Text => quote!(#k),
        KeyOp::Bool | KeyOp::Numeric(_) => quote!(&#k.to_string()),
        KeyOp::Enum(table) if table.encoding == EnumEncoding::CustomString => {
            quote!(&#k.to_string())
        }
        KeyOp::Enum(table) => {
            let target = type_path(&table.path)?;
            let arms = table
                .entries
                .iter()
                .map(|entry| {
                    let variant = ident(&entry.name)?;
                    let text = table.key_text(&entry.name).unwrap_or_default();

                    Ok(quote!(#target::#variant => #text,))
                })
                .collect::<Result<Vec<_>, RenderError>>()?;

            quote!(match #k { #(#arms)* })
        }
    };

    Ok(tokens)
}
