//! Registry aggregation.
//!
//! Collects every emitted encoder and decoder into one registry artifact.
//! Entry order is input order, so the rendered registry is reproducible.

use autoserde_schema::node::{TypeDescriptor, package_of};
use std::fmt;
use tracing::debug;

///
/// ArtifactRef
/// Name and module of one emitted unit.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ArtifactRef {
    pub module_path: String,
    pub name: String,
}

impl ArtifactRef {
    pub fn new(module_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            name: name.into(),
        }
    }

    /// Encoder unit for a type: the marker's names, else `<Type>Encoder`
    /// in the type's own module.
    #[must_use]
    pub fn encoder_for(ty: &TypeDescriptor) -> Self {
        let marker = ty.marker.as_ref();
        let name = marker
            .and_then(|m| m.encoder_name.clone())
            .unwrap_or_else(|| format!("{}Encoder", ty.ident()));

        Self::new(module_for(ty), name)
    }

    /// Decoder unit for a type: the marker's names, else `<Type>Decoder`.
    #[must_use]
    pub fn decoder_for(ty: &TypeDescriptor) -> Self {
        let marker = ty.marker.as_ref();
        let name = marker
            .and_then(|m| m.decoder_name.clone())
            .unwrap_or_else(|| format!("{}Decoder", ty.ident()));

        Self::new(module_for(ty), name)
    }

    /// Fully qualified path.
    #[must_use]
    pub fn path(&self) -> String {
        if self.module_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.module_path, self.name)
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn module_for(ty: &TypeDescriptor) -> String {
    ty.marker
        .as_ref()
        .and_then(|m| m.module_path.clone())
        .unwrap_or_else(|| package_of(&ty.path).to_string())
}

///
/// RegistryEntry
/// One type and whichever of its units were produced.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryEntry {
    pub type_path: String,
    pub encoder: Option<ArtifactRef>,
    pub decoder: Option<ArtifactRef>,
}

impl RegistryEntry {
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            encoder: None,
            decoder: None,
        }
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: ArtifactRef) -> Self {
        self.encoder = Some(encoder);
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: ArtifactRef) -> Self {
        self.decoder = Some(decoder);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.encoder.is_none() && self.decoder.is_none()
    }
}

///
/// RegistryArtifact
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryArtifact {
    pub name: String,
    pub module_path: String,

    /// (type path, encoder unit), in input order.
    pub encoders: Vec<(String, ArtifactRef)>,

    /// (type path, decoder unit), in input order.
    pub decoders: Vec<(String, ArtifactRef)>,
}

impl RegistryArtifact {
    #[must_use]
    pub fn artifact_ref(&self) -> ArtifactRef {
        ArtifactRef::new(self.module_path.clone(), self.name.clone())
    }
}

/// Build the registry artifact, or `None` when there is nothing to register.
#[must_use]
pub fn aggregate(name: &str, module_path: &str, entries: &[RegistryEntry]) -> Option<RegistryArtifact> {
    if entries.iter().all(RegistryEntry::is_empty) {
        return None;
    }

    let encoders: Vec<_> = entries
        .iter()
        .filter_map(|e| Some((e.type_path.clone(), e.encoder.clone()?)))
        .collect();
    let decoders: Vec<_> = entries
        .iter()
        .filter_map(|e| Some((e.type_path.clone(), e.decoder.clone()?)))
        .collect();

    debug!(
        registry = name,
        encoders = encoders.len(),
        decoders = decoders.len(),
        "registry aggregated"
    );

    Some(RegistryArtifact {
        name: name.to_string(),
        module_path: module_path.to_string(),
        encoders,
        decoders,
    })
}
