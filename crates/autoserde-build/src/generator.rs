//! Generation driver.
//!
//! One batch pass over the catalog. Each type is validated, synthesized and
//! rendered on its own; a failure aborts that type only. Units are emitted
//! in catalog order once every type is done, and the registry is aggregated
//! last from whatever was actually written.

use crate::{
    emit::{CodeEmitter, Unit, UnitKind},
    error::{EmitError, Error, RenderError},
    render::{render_decoder, render_encoder, render_registry},
};
use autoserde_core::{
    error::SynthesisError,
    obs::{Diagnostic, DiagnosticSink},
    registry::{ArtifactRef, RegistryEntry, aggregate},
    synth::{SynthContext, synthesize_decoder, synthesize_encoder},
};
use autoserde_schema::{
    build::DescriptorBuilder,
    catalog::{Schema, Scope, TypeCatalog},
    classify::CodecLookup,
    config::CodecConfig,
    decl::TypeDecl,
    error::{ErrorTree, SchemaError},
    node::{EnumDescriptor, TypeDescriptor},
    types::ValueType,
    validate::naming::{validate_enum, validate_type},
};
use std::{num::NonZeroUsize, thread};
use tracing::{info, warn};

///
/// Failure
///

#[derive(Debug)]
pub enum Failure {
    Validation { type_path: String, errors: ErrorTree },
    Synthesis(SynthesisError),
    Render { unit: String, error: RenderError },
    Write(EmitError),
}

impl Failure {
    fn diagnostics(&self, type_path: &str) -> Vec<Diagnostic> {
        match self {
            Self::Validation { errors, .. } => errors
                .iter()
                .map(|(route, message)| {
                    let d = Diagnostic::error(type_path, message);
                    match route.strip_prefix(type_path).and_then(|r| r.strip_prefix('.')) {
                        Some(property) => d.at(property),
                        None => d,
                    }
                })
                .collect(),
            Self::Synthesis(err) => {
                let d = Diagnostic::error(type_path, err.to_string());
                vec![match err.property() {
                    Some(property) => d.at(property),
                    None => d,
                }]
            }
            Self::Render { error, .. } => vec![Diagnostic::error(type_path, error.to_string())],
            Self::Write(err) => vec![Diagnostic::error(type_path, err.to_string())],
        }
    }
}

///
/// GenerationStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationStatus {
    Success,

    /// Some types or units failed; the rest were written.
    Partial,

    /// Nothing was written and at least one failure was recorded.
    Failed,
}

///
/// GenerationReport
///

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub emitted: Vec<ArtifactRef>,
    pub registry: Option<ArtifactRef>,
    pub failures: Vec<Failure>,
}

impl GenerationReport {
    #[must_use]
    pub fn status(&self) -> GenerationStatus {
        match (self.failures.is_empty(), self.emitted.is_empty()) {
            (true, _) => GenerationStatus::Success,
            (false, false) => GenerationStatus::Partial,
            (false, true) => GenerationStatus::Failed,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status() == GenerationStatus::Success
    }

    /// `Ok` only when every type and unit made it through.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::Incomplete {
                failures: self.failures.len(),
            })
        }
    }
}

///
/// TypeOutcome
/// Result of the per-type stage, before anything is emitted.
///

#[derive(Debug)]
struct TypeOutcome {
    type_path: String,
    units: Vec<Unit>,
    failure: Option<Failure>,
}

///
/// Generator
///

#[derive(Clone, Copy, Debug)]
pub struct Generator<'a> {
    config: &'a CodecConfig,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub const fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Build a schema from declarations, forwarding builder warnings to `sink`.
    pub fn schema_from_decls(
        &self,
        decls: &[TypeDecl],
        enums: Vec<EnumDescriptor>,
        sink: &dyn DiagnosticSink,
    ) -> Result<Schema, SchemaError> {
        let builder = DescriptorBuilder::new(self.config);
        let mut schema = Schema::new();

        for decl in decls {
            let output = builder.build(decl)?;
            for warning in output.warnings {
                sink.record(Diagnostic::warning(&decl.path, warning));
            }
            schema.insert_type(output.descriptor);
        }
        for descriptor in enums {
            schema.insert_enum(descriptor);
        }

        Ok(schema)
    }

    pub fn run<C>(
        &self,
        catalog: &C,
        scope: &Scope,
        emitter: &mut dyn CodeEmitter,
        sink: &dyn DiagnosticSink,
    ) -> GenerationReport
    where
        C: TypeCatalog + Sync,
    {
        let types = catalog.descriptors(scope);
        let outcomes = if self.config.output.parallel && types.len() > 1 {
            self.process_parallel(catalog, &types)
        } else {
            types.iter().map(|ty| self.process(catalog, ty)).collect()
        };

        let mut report = GenerationReport::default();
        let mut entries = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            let mut entry = RegistryEntry::new(&outcome.type_path);

            if let Some(failure) = outcome.failure {
                warn!(ty = %outcome.type_path, "type skipped");
                record_failure(&mut report, sink, &outcome.type_path, failure);
            }

            for unit in outcome.units {
                match emitter.emit(&unit) {
                    Ok(()) => {
                        match unit.kind {
                            UnitKind::Encoder => entry = entry.with_encoder(unit.artifact.clone()),
                            UnitKind::Decoder => entry = entry.with_decoder(unit.artifact.clone()),
                            UnitKind::Registry => {}
                        }
                        report.emitted.push(unit.artifact);
                    }
                    Err(err) => {
                        warn!(unit = %unit.artifact, "unit write failed");
                        record_failure(&mut report, sink, &outcome.type_path, Failure::Write(err));
                    }
                }
            }

            entries.push(entry);
        }

        self.emit_registry(&entries, emitter, sink, &mut report);

        info!(
            types = types.len(),
            emitted = report.emitted.len(),
            failures = report.failures.len(),
            registry = report.registry.is_some(),
            "generation finished"
        );

        report
    }

    // shared nothing: each worker gets one descriptor and builds its own context
    fn process_parallel<C>(&self, catalog: &C, types: &[&TypeDescriptor]) -> Vec<TypeOutcome>
    where
        C: TypeCatalog + Sync,
    {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk = chunk_size(types.len(), workers);

        thread::scope(|s| {
            let handles: Vec<_> = types
                .chunks(chunk)
                .map(|batch| {
                    let handle = s.spawn(move || {
                        batch
                            .iter()
                            .map(|ty| self.process(catalog, ty))
                            .collect::<Vec<_>>()
                    });
                    (handle, batch)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(handle, batch)| {
                    handle.join().unwrap_or_else(|_| {
                        batch
                            .iter()
                            .map(|ty| TypeOutcome {
                                type_path: ty.path.clone(),
                                units: Vec::new(),
                                failure: Some(Failure::Validation {
                                    type_path: ty.path.clone(),
                                    errors: worker_panicked(&ty.path),
                                }),
                            })
                            .collect()
                    })
                })
                .collect()
        })
    }

    fn process(&self, catalog: &dyn CodecLookup, ty: &TypeDescriptor) -> TypeOutcome {
        let abort = |failure| TypeOutcome {
            type_path: ty.path.clone(),
            units: Vec::new(),
            failure: Some(failure),
        };

        if let Err(errors) = validate(ty, catalog) {
            return abort(Failure::Validation {
                type_path: ty.path.clone(),
                errors,
            });
        }

        match self.render_type(catalog, ty) {
            Ok(units) => TypeOutcome {
                type_path: ty.path.clone(),
                units,
                failure: None,
            },
            Err(failure) => abort(failure),
        }
    }

    fn render_type(&self, catalog: &dyn CodecLookup, ty: &TypeDescriptor) -> Result<Vec<Unit>, Failure> {
        let ctx = SynthContext::new(catalog).with_enum_mode(self.config.enums.mode);
        let mode = ty.generate_mode().unwrap_or_default();
        let mut units = Vec::new();

        if mode.wants_encoder() {
            let plan = synthesize_encoder(ty, &ctx).map_err(Failure::Synthesis)?;
            let artifact = ArtifactRef::encoder_for(ty);
            let tokens = render_encoder(&plan, &artifact).map_err(|error| Failure::Render {
                unit: artifact.path(),
                error,
            })?;
            units.push(Unit::new(artifact, UnitKind::Encoder, tokens.to_string()));
        }

        if mode.wants_decoder() {
            let plan = synthesize_decoder(ty, &ctx).map_err(Failure::Synthesis)?;
            let artifact = ArtifactRef::decoder_for(ty);
            let tokens = render_decoder(&plan, &artifact).map_err(|error| Failure::Render {
                unit: artifact.path(),
                error,
            })?;
            units.push(Unit::new(artifact, UnitKind::Decoder, tokens.to_string()));
        }

        Ok(units)
    }

    fn emit_registry(
        &self,
        entries: &[RegistryEntry],
        emitter: &mut dyn CodeEmitter,
        sink: &dyn DiagnosticSink,
        report: &mut GenerationReport,
    ) {
        let output = &self.config.output;
        let Some(artifact) = aggregate(&output.registry_name, &output.registry_module, entries)
        else {
            return;
        };
        let unit_ref = artifact.artifact_ref();

        let tokens = match render_registry(&artifact) {
            Ok(tokens) => tokens,
            Err(error) => {
                let failure = Failure::Render {
                    unit: unit_ref.path(),
                    error,
                };
                record_failure(report, sink, &unit_ref.path(), failure);
                return;
            }
        };

        let unit = Unit::new(unit_ref.clone(), UnitKind::Registry, tokens.to_string());
        match emitter.emit(&unit) {
            Ok(()) => {
                report.emitted.push(unit_ref.clone());
                report.registry = Some(unit_ref);
            }
            Err(err) => {
                warn!(unit = %unit_ref, "registry write failed");
                record_failure(report, sink, &unit_ref.path(), Failure::Write(err));
            }
        }
    }
}

fn record_failure(
    report: &mut GenerationReport,
    sink: &dyn DiagnosticSink,
    type_path: &str,
    failure: Failure,
) {
    for diagnostic in failure.diagnostics(type_path) {
        sink.record(diagnostic);
    }
    report.failures.push(failure);
}

/// Per-type validation, including every enum the type reaches.
fn validate(ty: &TypeDescriptor, catalog: &dyn CodecLookup) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();
    validate_type(ty, &mut errs);

    let mut named = Vec::new();
    for property in &ty.properties {
        named_paths(&property.ty, &mut named);
    }
    named.sort_unstable();
    named.dedup();

    for path in named {
        if let Some(descriptor) = catalog.enum_descriptor(path) {
            validate_enum(descriptor, &mut errs);
        }
    }

    errs.result()
}

fn named_paths<'t>(ty: &'t ValueType, out: &mut Vec<&'t str>) {
    match ty {
        ValueType::Named(path) => out.push(path),
        ValueType::Optional(inner) | ValueType::Sequence(inner) => named_paths(inner, out),
        ValueType::Map { key, value } => {
            named_paths(key, out);
            named_paths(value, out);
        }
        ValueType::Bool | ValueType::Numeric(_) | ValueType::Text => {}
    }
}

/// Types per worker so that at most `workers` threads run.
const fn chunk_size(types: usize, workers: usize) -> usize {
    let workers = if workers == 0 { 1 } else { workers };
    let size = types.div_ceil(workers);

    if size == 0 { 1 } else { size }
}

fn worker_panicked(type_path: &str) -> ErrorTree {
    let mut errs = ErrorTree::new();
    errs.add_at(type_path, "generation worker panicked");
    errs
}
