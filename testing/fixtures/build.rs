use autoserde::design::prelude::*;
use std::error::Error;

fn accessors(decl: TypeDecl, name: &str, ty: &ValueType) -> TypeDecl {
    decl.method(MethodDecl::getter(format!("get{name}"), ty.clone()))
        .method(MethodDecl::setter(format!("set{name}"), ty.clone()))
}

// same shape under two paths: one strict, one tolerant of unknown fields
fn foo(path: &str) -> TypeDecl {
    let decl = TypeDecl::new(path).generate(GenerateMarker::default());
    let decl = accessors(decl, "Name", &ValueType::Text);
    let decl = accessors(decl, "Count", &ValueType::Numeric(NumericKind::I32));
    let decl = accessors(decl, "Tags", &ValueType::sequence(ValueType::Text));
    let decl = accessors(decl, "Labels", &ValueType::map(ValueType::Text, ValueType::Text));
    let decl = accessors(decl, "Status", &ValueType::named("app::Status"));

    decl.method(MethodDecl::getter("getNick", ValueType::optional(ValueType::Text)).non_null())
        .method(MethodDecl::setter("setNick", ValueType::optional(ValueType::Text)))
}

fn report() -> TypeDecl {
    let decl = TypeDecl::new("app::Report")
        .generate(GenerateMarker::default())
        .ignore_unknown(true);
    let decl = accessors(decl, "Owner", &ValueType::named("app::Foo"));
    let decl = accessors(decl, "Entries", &ValueType::sequence(ValueType::named("app::Foo")));
    let decl = accessors(
        decl,
        "Scores",
        &ValueType::map(
            ValueType::named("app::Status"),
            ValueType::sequence(ValueType::optional(ValueType::Numeric(NumericKind::F64))),
        ),
    );
    let decl = accessors(decl, "Note", &ValueType::optional(ValueType::Text));
    let decl = accessors(decl, "Size", &ValueType::Numeric(NumericKind::U64));
    let decl = accessors(decl, "Priority", &ValueType::named("app::Priority"));

    decl.method(MethodDecl::getter("isFlag", ValueType::Bool))
        .method(MethodDecl::setter("setFlag", ValueType::Bool))
}

fn enums() -> Vec<EnumDescriptor> {
    vec![
        EnumDescriptor::new("app::Status")
            .constant(EnumConstant::new("ACTIVE").renamed("Active"))
            .constant(EnumConstant::new("DONE").renamed("Done")),
        EnumDescriptor::new("app::Priority")
            .constant(EnumConstant::new("LOW"))
            .constant(EnumConstant::new("HIGH")),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = CodecConfig::default();
    let decls = [
        foo("app::Foo").ignore_names(["legacy"]),
        foo("app::LooseFoo").ignore_unknown(true),
        report(),
    ];
    let schema = Schema::from_decls(&config, &decls, enums())?;

    autoserde::build!(schema);

    Ok(())
}
