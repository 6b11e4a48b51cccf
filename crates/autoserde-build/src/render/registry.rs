use super::{ident, rt, type_path, unit_path};
use crate::error::RenderError;
use autoserde_core::registry::RegistryArtifact;
use proc_macro2::TokenStream;
use quote::quote;

/// Render the registry unit: every encoder first, then every decoder, each
/// in input order.
pub fn render_registry(artifact: &RegistryArtifact) -> Result<TokenStream, RenderError> {
    let name = ident(&artifact.name)?;
    let table = rt(&["codec", "CodecTable"]);

    let mut lines = Vec::with_capacity(artifact.encoders.len() + artifact.decoders.len());

    for (type_path_str, unit) in &artifact.encoders {
        let target = type_path(type_path_str)?;
        let encoder = unit_path(unit)?;
        lines.push(quote! {
            table.add_encoder::<#target>(#type_path_str, #encoder::encode);
        });
    }
    for (type_path_str, unit) in &artifact.decoders {
        let target = type_path(type_path_str)?;
        let decoder = unit_path(unit)?;
        lines.push(quote! {
            table.add_decoder::<#target>(#type_path_str, #decoder::decode);
        });
    }

    Ok(quote! {
        pub struct #name;

        impl #name {
            pub fn register(table: &mut #table) {
                #(#lines)*
            }

            #[must_use]
            pub fn table() -> #table {
                let mut table = #table::new();
                Self::register(&mut table);
                table
            }
        }
    })
}
