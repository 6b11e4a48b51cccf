//! Whole generation passes over small schemas.

use autoserde_build::{
    CodeEmitter, EmitError, Failure, GenerationStatus, Generator, MemoryEmitter, Unit, UnitKind,
};
use autoserde_core::{error::SynthesisError, obs::CollectingSink};
use autoserde_schema::{
    catalog::{Schema, Scope},
    config::CodecConfig,
    decl::{MethodDecl, TypeDecl},
    node::{EnumConstant, EnumDescriptor, GenerateMarker},
    types::{GenerateMode, NumericKind, ValueType},
};
use proptest::prelude::*;
use std::io;

fn status() -> EnumDescriptor {
    EnumDescriptor::new("app::Status")
        .constant(EnumConstant::new("ACTIVE").renamed("Active"))
        .constant(EnumConstant::new("DONE").renamed("Done"))
}

fn pair(decl: TypeDecl, name: &str, ty: &ValueType) -> TypeDecl {
    decl.method(MethodDecl::getter(format!("get{name}"), ty.clone()))
        .method(MethodDecl::setter(format!("set{name}"), ty.clone()))
}

fn foo() -> TypeDecl {
    let decl = TypeDecl::new("app::Foo").generate(GenerateMarker::default());
    let decl = pair(decl, "Name", &ValueType::Text);
    let decl = pair(decl, "Count", &ValueType::Numeric(NumericKind::I32));
    let decl = pair(decl, "Tags", &ValueType::sequence(ValueType::Text));
    let decl = pair(decl, "Labels", &ValueType::map(ValueType::Text, ValueType::Text));

    pair(decl, "Status", &ValueType::named("app::Status"))
}

fn schema(config: &CodecConfig, decls: &[TypeDecl]) -> Schema {
    Generator::new(config)
        .schema_from_decls(decls, vec![status()], &CollectingSink::new())
        .unwrap()
}

fn assert_parses(unit: &Unit) {
    syn::parse_file(&unit.source)
        .unwrap_or_else(|e| panic!("{} is not valid Rust: {e}", unit.artifact));
}

///
/// FailingEmitter
/// Refuses units by name, keeps the rest.
///

struct FailingEmitter {
    refuse: &'static str,
    inner: MemoryEmitter,
}

impl CodeEmitter for FailingEmitter {
    fn emit(&mut self, unit: &Unit) -> Result<(), EmitError> {
        if unit.artifact.name == self.refuse {
            return Err(EmitError::write_failure(
                unit.artifact.path(),
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }

        self.inner.emit(unit)
    }
}

#[test]
fn marked_type_yields_encoder_decoder_and_registry() {
    let config = CodecConfig::default();
    let schema = schema(&config, &[foo()]);
    let mut emitter = MemoryEmitter::new();
    let sink = CollectingSink::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &sink);

    assert_eq!(report.status(), GenerationStatus::Success);
    assert!(sink.diagnostics().is_empty());

    let paths: Vec<_> = emitter.units().iter().map(|u| u.artifact.path()).collect();
    assert_eq!(
        paths,
        vec![
            "app::FooEncoder",
            "app::FooDecoder",
            "autoserde_generated::GeneratedRegistry"
        ]
    );
    for unit in emitter.units() {
        assert_parses(unit);
    }

    let encoder = emitter.get("app::FooEncoder").unwrap();
    assert!(encoder.source.contains("w . field_name (\"labels\") ?"));
    assert!(encoder.source.contains("crate :: app :: Status :: ACTIVE => w . text (\"Active\") ?"));

    let registry = emitter.get("autoserde_generated::GeneratedRegistry").unwrap();
    assert_eq!(registry.kind, UnitKind::Registry);
    assert!(registry.source.contains("crate :: app :: FooDecoder :: decode"));
    assert_eq!(
        report.registry.map(|r| r.path()),
        Some("autoserde_generated::GeneratedRegistry".to_string())
    );
}

#[test]
fn unsupported_property_aborts_only_its_type() {
    let config = CodecConfig::default();
    let broken = TypeDecl::new("app::Broken")
        .generate(GenerateMarker::default())
        .method(MethodDecl::getter("getBlob", ValueType::named("ext::Blob")));
    let schema = schema(&config, &[broken, foo()]);
    let mut emitter = MemoryEmitter::new();
    let sink = CollectingSink::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &sink);

    assert_eq!(report.status(), GenerationStatus::Partial);
    assert!(matches!(
        report.failures.as_slice(),
        [Failure::Synthesis(SynthesisError::UnsupportedType { property, .. })] if property == "blob"
    ));

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].type_path, "app::Broken");
    assert_eq!(diagnostics[0].property.as_deref(), Some("blob"));

    assert!(emitter.get("app::BrokenEncoder").is_none());
    assert!(emitter.get("app::FooEncoder").is_some());
    let registry = emitter.get("autoserde_generated::GeneratedRegistry").unwrap();
    assert!(!registry.source.contains("Broken"));
}

#[test]
fn missing_constructor_blocks_decoder_types() {
    let config = CodecConfig::default();
    let schema = schema(&config, &[foo().without_default_constructor()]);
    let mut emitter = MemoryEmitter::new();
    let sink = CollectingSink::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &sink);

    assert_eq!(report.status(), GenerationStatus::Failed);
    assert!(matches!(
        report.failures.as_slice(),
        [Failure::Synthesis(SynthesisError::UnsupportedConstruction { .. })]
    ));
    assert!(emitter.units().is_empty());
    assert!(report.registry.is_none());
}

#[test]
fn encoder_only_marker_skips_the_decoder() {
    let config = CodecConfig::default();
    let decl = foo()
        .without_default_constructor()
        .generate(GenerateMarker::new(GenerateMode::Encoder));
    let schema = schema(&config, &[decl]);
    let mut emitter = MemoryEmitter::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &CollectingSink::new());

    assert!(report.is_success());
    assert!(emitter.get("app::FooDecoder").is_none());
    let registry = emitter.get("autoserde_generated::GeneratedRegistry").unwrap();
    assert!(!registry.source.contains("add_decoder"));
}

#[test]
fn write_failures_are_reported_and_generation_continues() {
    let config = CodecConfig::default();
    let bar = pair(
        TypeDecl::new("app::Bar").generate(GenerateMarker::default()),
        "Flag",
        &ValueType::Bool,
    );
    let schema = schema(&config, &[foo(), bar]);
    let mut emitter = FailingEmitter {
        refuse: "FooDecoder",
        inner: MemoryEmitter::new(),
    };
    let sink = CollectingSink::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &sink);

    assert_eq!(report.status(), GenerationStatus::Partial);
    assert!(matches!(
        report.failures.as_slice(),
        [Failure::Write(EmitError::ArtifactWriteFailure { unit, .. })] if unit == "app::FooDecoder"
    ));
    assert_eq!(sink.error_count(), 1);

    let registry = emitter.inner.get("autoserde_generated::GeneratedRegistry").unwrap();
    assert!(registry.source.contains("FooEncoder"));
    assert!(!registry.source.contains("FooDecoder"));
    assert!(registry.source.contains("BarDecoder"));
}

#[test]
fn nothing_marked_means_no_registry() {
    let config = CodecConfig::default();
    let schema = schema(&config, &[TypeDecl::new("app::Plain")]);
    let mut emitter = MemoryEmitter::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut emitter, &CollectingSink::new());

    assert_eq!(report.status(), GenerationStatus::Success);
    assert!(emitter.units().is_empty());
    assert!(report.registry.is_none());
}

#[test]
fn invalid_enum_aborts_the_types_that_use_it() {
    let config = CodecConfig::default();
    let mut schema = schema(&config, &[foo()]);
    schema.insert_enum(
        EnumDescriptor::new("app::Status")
            .constant(EnumConstant::new("ACTIVE").renamed("same"))
            .constant(EnumConstant::new("DONE").renamed("same")),
    );
    let sink = CollectingSink::new();

    let report = Generator::new(&config).run(&schema, &Scope::Marked, &mut MemoryEmitter::new(), &sink);

    assert!(matches!(report.failures.as_slice(), [Failure::Validation { .. }]));
    assert_eq!(sink.error_count(), 1);
}

#[test]
fn builder_warnings_reach_the_sink() {
    let config = CodecConfig::default();
    let decl = TypeDecl::new("app::Odd")
        .method(MethodDecl::getter("getCount", ValueType::Numeric(NumericKind::I64)))
        .method(MethodDecl::setter("setCount", ValueType::Text));
    let sink = CollectingSink::new();

    Generator::new(&config)
        .schema_from_decls(&[decl], Vec::new(), &sink)
        .unwrap();

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics[0].is_error());
    assert_eq!(diagnostics[0].type_path, "app::Odd");
}

#[test]
fn units_land_on_disk() {
    let config = CodecConfig::default();
    let schema = schema(&config, &[foo()]);
    let out = std::env::temp_dir().join(format!("autoserde-generate-{}", std::process::id()));

    let report = autoserde_build::generate(&schema, &config, &out).unwrap();

    assert_eq!(report.emitted.len(), 3);
    assert!(out.join("app/foo_encoder.rs").is_file());
    assert!(out.join("app/foo_decoder.rs").is_file());
    assert!(out.join("autoserde_generated/generated_registry.rs").is_file());

    std::fs::remove_dir_all(&out).unwrap();
}

fn arb_decls() -> impl Strategy<Value = Vec<TypeDecl>> {
    let field = prop_oneof![
        Just(ValueType::Bool),
        Just(ValueType::Text),
        Just(ValueType::Numeric(NumericKind::U16)),
        Just(ValueType::optional(ValueType::Text)),
        Just(ValueType::sequence(ValueType::named("app::Status"))),
    ];

    prop::collection::vec(prop::collection::vec(field, 0..4), 1..6).prop_map(|types| {
        types
            .into_iter()
            .enumerate()
            .map(|(i, fields)| {
                let decl = TypeDecl::new(format!("app::T{i}")).generate(GenerateMarker::default());
                fields
                    .iter()
                    .enumerate()
                    .fold(decl, |decl, (j, ty)| pair(decl, &format!("F{j}"), ty))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn parallel_output_matches_sequential(decls in arb_decls()) {
        let sequential = CodecConfig::default();
        let mut parallel = CodecConfig::default();
        parallel.output.parallel = true;

        let schema = schema(&sequential, &decls);

        let mut a = MemoryEmitter::new();
        let mut b = MemoryEmitter::new();
        Generator::new(&sequential).run(&schema, &Scope::All, &mut a, &CollectingSink::new());
        Generator::new(&parallel).run(&schema, &Scope::All, &mut b, &CollectingSink::new());

        prop_assert_eq!(a.into_units(), b.into_units());
    }
}
