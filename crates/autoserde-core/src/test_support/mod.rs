//! Shared fixtures for unit tests.

use autoserde_schema::{
    catalog::Schema,
    node::{EnumConstant, EnumDescriptor, PropertyDescriptor, TypeDescriptor},
    types::{NumericKind, ValueType},
};

/// `app::Status` with one overridden constant.
pub(crate) fn status_enum() -> EnumDescriptor {
    EnumDescriptor::new("app::Status")
        .constant(EnumConstant::new("ACTIVE").renamed("Active"))
        .constant(EnumConstant::new("DONE").renamed("Done"))
}

fn accessor_pair(name: &str, ty: ValueType) -> PropertyDescriptor {
    let mut upper = name.to_string();
    if let Some(first) = upper.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    PropertyDescriptor::new(name, ty)
        .with_getter(format!("get{upper}"))
        .with_setter(format!("set{upper}"))
}

/// `app::Foo`: one property of each common shape.
pub(crate) fn foo_type() -> TypeDescriptor {
    TypeDescriptor::new("app::Foo")
        .property(accessor_pair("name", ValueType::Text))
        .property(accessor_pair("count", ValueType::Numeric(NumericKind::I32)))
        .property(accessor_pair("tags", ValueType::sequence(ValueType::Text)))
        .property(accessor_pair(
            "labels",
            ValueType::map(ValueType::Text, ValueType::Text),
        ))
        .property(accessor_pair("status", ValueType::named("app::Status")))
}

pub(crate) fn foo_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert_type(foo_type());
    schema.insert_enum(status_enum());
    schema
}
