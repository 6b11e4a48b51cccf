//! Descriptor construction from raw declarations.
//!
//! This is the one place policy gets resolved: thresholds are merged
//! (defaults, then config features, then type overrides) and accessors are
//! detected, filtered and grouped into properties. Descriptors leave here
//! immutable.

use crate::{config::CodecConfig, prelude::*};
use std::collections::BTreeSet;
use tracing::{debug, warn};

///
/// BuildOutput
///

#[derive(Clone, Debug)]
pub struct BuildOutput {
    pub descriptor: TypeDescriptor,
    pub warnings: Vec<String>,
}

///
/// DescriptorBuilder
///

#[derive(Clone, Copy, Debug)]
pub struct DescriptorBuilder<'a> {
    config: &'a CodecConfig,
}

impl<'a> DescriptorBuilder<'a> {
    #[must_use]
    pub const fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, decl: &TypeDecl) -> Result<BuildOutput, SchemaError> {
        if decl.path.is_empty() {
            return Err(SchemaError::EmptyPath);
        }

        let policy = self.policy(decl);
        let mut warnings = Vec::new();
        let mut slots: Vec<Slot> = Vec::new();

        for method in &decl.methods {
            let Some(kind) = detect_accessor(method) else {
                continue;
            };
            let Some(name) = naming::canonical_name(&method.name, kind) else {
                continue;
            };

            let ignored = self.is_ignored(method);
            if !ignored {
                let declaring = method
                    .declaring_package
                    .as_deref()
                    .unwrap_or(&decl.package);
                if !is_visible(kind, method.modifiers, declaring, &decl.package, &policy.visibility)
                {
                    debug!(ty = %decl.path, method = %method.name, "accessor not visible");
                    continue;
                }
            }

            let index = match slots.iter().position(|s| s.name == name) {
                Some(index) => index,
                None => {
                    slots.push(Slot::new(name));
                    slots.len() - 1
                }
            };
            if let Some(warning) = slots[index].attach(kind, method, ignored) {
                warn!(ty = %decl.path, "{warning}");
                warnings.push(warning);
            }
        }

        let properties = slots.into_iter().filter_map(Slot::finish).collect();

        Ok(BuildOutput {
            descriptor: TypeDescriptor {
                path: decl.path.clone(),
                package: decl.package.clone(),
                properties,
                policy,
                constructible: decl.constructible,
                marker: decl.marker.clone(),
            },
            warnings,
        })
    }

    fn policy(&self, decl: &TypeDecl) -> TypePolicy {
        TypePolicy {
            ignored: decl.ignored.iter().cloned().collect::<BTreeSet<_>>(),
            ignore_unknown: decl.ignore_unknown,
            naming: decl.naming.unwrap_or(self.config.naming.strategy),
            visibility: self.config.base_visibility().merge(&decl.visibility),
        }
    }

    fn is_ignored(&self, method: &MethodDecl) -> bool {
        if self.config.features.propagate_transient_marker && method.modifiers.transient {
            return true;
        }

        method.ignore.unwrap_or(false)
    }
}

/// Classify a method as an accessor by name shape and signature.
///
/// `is`-prefixed methods only count when they return a boolean; any other
/// `is*` method is an ordinary method.
#[must_use]
pub fn detect_accessor(method: &MethodDecl) -> Option<AccessorKind> {
    let name = method.name.as_str();

    match (&method.returns, method.params.len()) {
        (Some(_), 0) if name.len() > 3 && name.starts_with("get") => Some(AccessorKind::Getter),
        (Some(ty), 0) if name.len() > 2 && name.starts_with("is") && ty.is_bool_like() => {
            Some(AccessorKind::IsGetter)
        }
        (None, 1) if name.len() > 3 && name.starts_with("set") => Some(AccessorKind::Setter),
        _ => None,
    }
}

// Accessors grouped under one canonical name while scanning.
struct Slot {
    name: String,
    getter: Option<(Accessor, ValueType)>,
    setter: Option<(Accessor, ValueType)>,
    rename: Option<String>,
    inclusion: Option<Inclusion>,
    ignored: bool,
}

impl Slot {
    const fn new(name: String) -> Self {
        Self {
            name,
            getter: None,
            setter: None,
            rename: None,
            inclusion: None,
            ignored: false,
        }
    }

    fn attach(&mut self, kind: AccessorKind, method: &MethodDecl, ignored: bool) -> Option<String> {
        self.ignored |= ignored;
        if self.rename.is_none() {
            self.rename.clone_from(&method.rename);
        }
        if self.inclusion.is_none() {
            self.inclusion = method.inclusion;
        }

        let accessor = Accessor::new(method.name.clone(), kind);
        if kind.is_read() {
            let ty = method.returns.clone()?;
            if self.getter.is_some() {
                return Some(format!(
                    "property '{}' has more than one getter; keeping the first",
                    self.name
                ));
            }
            self.getter = Some((accessor, ty));
        } else {
            let ty = method.params.first().cloned()?;
            if self.setter.is_some() {
                return Some(format!(
                    "property '{}' has more than one setter; keeping the first",
                    self.name
                ));
            }
            self.setter = Some((accessor, ty));
        }

        match (&self.getter, &self.setter) {
            (Some((_, read)), Some((_, write))) if read != write => Some(format!(
                "property '{}' getter type {read} differs from setter type {write}; using the getter type",
                self.name
            )),
            _ => None,
        }
    }

    fn finish(self) -> Option<PropertyDescriptor> {
        let ty = match (&self.getter, &self.setter) {
            (Some((_, ty)), _) | (None, Some((_, ty))) => ty.clone(),
            (None, None) => return None,
        };

        Some(PropertyDescriptor {
            name: self.name,
            ty,
            getter: self.getter.map(|(a, _)| a),
            setter: self.setter.map(|(a, _)| a),
            rename: self.rename,
            inclusion: self.inclusion.unwrap_or_default(),
            ignored: self.ignored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(config: &CodecConfig, decl: &TypeDecl) -> TypeDescriptor {
        DescriptorBuilder::new(config)
            .build(decl)
            .expect("declaration builds")
            .descriptor
    }

    fn foo() -> TypeDecl {
        TypeDecl::new("app::Foo")
            .method(MethodDecl::getter("getBar", ValueType::Text).rename("renamedBar"))
            .method(MethodDecl::setter("setBar", ValueType::Text))
            .method(MethodDecl::getter("isEnabled", ValueType::Bool))
            .method(MethodDecl::setter("setEnabled", ValueType::Bool))
            .method(MethodDecl::getter("isReady", ValueType::Text))
            .method(MethodDecl::getter("getBaz", ValueType::Numeric(NumericKind::I32)))
            .method(MethodDecl::new("reset"))
    }

    #[test]
    fn groups_accessors_in_encounter_order() {
        let ty = build(&CodecConfig::default(), &foo());
        let names: Vec<_> = ty.properties.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["bar", "enabled", "baz"]);

        let bar = ty.get("bar").expect("bar");
        assert_eq!(bar.rename.as_deref(), Some("renamedBar"));
        assert!(bar.is_readable() && bar.is_writable());

        let enabled = ty.get("enabled").expect("enabled");
        assert_eq!(
            enabled.getter.as_ref().map(|a| a.kind),
            Some(AccessorKind::IsGetter)
        );
    }

    #[test]
    fn non_boolean_is_method_is_not_a_property() {
        let ty = build(&CodecConfig::default(), &foo());

        assert!(ty.get("ready").is_none());
    }

    #[test]
    fn invisible_accessors_are_dropped() {
        let decl = TypeDecl::new("app::Foo")
            .method(MethodDecl::getter("getHidden", ValueType::Text).access(AccessLevel::Package))
            .method(MethodDecl::getter("getShown", ValueType::Text));
        let ty = build(&CodecConfig::default(), &decl);

        assert!(ty.get("hidden").is_none());
        assert!(ty.get("shown").is_some());

        let relaxed = decl.visibility(VisibilityOverrides {
            getter: Some(Threshold::NonPrivate),
            ..VisibilityOverrides::default()
        });
        assert!(build(&CodecConfig::default(), &relaxed).get("hidden").is_some());
    }

    #[test]
    fn disabled_feature_hides_setters_unless_overridden() {
        let mut config = CodecConfig::default();
        config.features.auto_detect_setters = false;

        let ty = build(&config, &foo());
        assert!(!ty.get("bar").expect("bar").is_writable());

        let decl = foo().visibility(VisibilityOverrides {
            setter: Some(Threshold::PublicOnly),
            ..VisibilityOverrides::default()
        });
        assert!(build(&config, &decl).get("bar").expect("bar").is_writable());
    }

    #[test]
    fn ignore_markers_flag_the_property() {
        let decl = TypeDecl::new("app::Foo")
            .method(MethodDecl::getter("getSecret", ValueType::Text).ignore(true))
            .method(MethodDecl::setter("setSecret", ValueType::Text))
            .method(MethodDecl::getter("getKept", ValueType::Text).ignore(false))
            .method(MethodDecl::getter("getCache", ValueType::Text).transient());

        let ty = build(&CodecConfig::default(), &decl);
        assert!(ty.get("secret").expect("secret").ignored);
        assert!(!ty.get("kept").expect("kept").ignored);
        assert!(!ty.get("cache").expect("cache").ignored);

        let mut config = CodecConfig::default();
        config.features.propagate_transient_marker = true;
        assert!(build(&config, &decl).get("cache").expect("cache").ignored);
    }

    #[test]
    fn conflicting_types_warn_and_keep_getter() {
        let decl = TypeDecl::new("app::Foo")
            .method(MethodDecl::getter("getCount", ValueType::Numeric(NumericKind::I64)))
            .method(MethodDecl::setter("setCount", ValueType::Text));
        let out = DescriptorBuilder::new(&CodecConfig::default())
            .build(&decl)
            .expect("builds");

        assert_eq!(out.warnings.len(), 1);
        assert_eq!(
            out.descriptor.get("count").map(|p| p.ty.clone()),
            Some(ValueType::Numeric(NumericKind::I64))
        );
    }

    #[test]
    fn type_naming_overrides_config() {
        let mut config = CodecConfig::default();
        config.naming.strategy = NamingStrategy::KebabCase;

        assert_eq!(build(&config, &foo()).policy.naming, NamingStrategy::KebabCase);
        assert_eq!(
            build(&config, &foo().naming(NamingStrategy::SnakeCase)).policy.naming,
            NamingStrategy::SnakeCase
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = DescriptorBuilder::new(&CodecConfig::default())
            .build(&TypeDecl::new(""))
            .expect_err("empty path");

        assert!(matches!(err, SchemaError::EmptyPath));
    }
}
