//! Code emitters: where rendered units end up.

use crate::error::EmitError;
use autoserde_core::registry::ArtifactRef;
use convert_case::{Case, Casing};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

///
/// UnitKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UnitKind {
    Encoder,
    Decoder,
    Registry,
}

///
/// Unit
/// One rendered, loadable piece of source.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unit {
    pub artifact: ArtifactRef,
    pub kind: UnitKind,
    pub source: String,
}

impl Unit {
    #[must_use]
    pub const fn new(artifact: ArtifactRef, kind: UnitKind, source: String) -> Self {
        Self {
            artifact,
            kind,
            source,
        }
    }

    /// Relative file path: module segments as directories, then the unit
    /// name in snake case.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .artifact
            .module_path
            .split("::")
            .filter(|s| !s.is_empty())
            .collect();
        path.push(format!("{}.rs", self.artifact.name.to_case(Case::Snake)));

        path
    }
}

///
/// CodeEmitter
///

pub trait CodeEmitter {
    fn emit(&mut self, unit: &Unit) -> Result<(), EmitError>;
}

///
/// FsEmitter
/// Writes each unit under a root directory.
///

#[derive(Clone, Debug)]
pub struct FsEmitter {
    root: PathBuf,
}

impl FsEmitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CodeEmitter for FsEmitter {
    fn emit(&mut self, unit: &Unit) -> Result<(), EmitError> {
        let path = self.root.join(unit.file_path());
        let fail = |e| EmitError::write_failure(unit.artifact.path(), e);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(fail)?;
        }
        fs::write(&path, &unit.source).map_err(fail)?;

        debug!(unit = %unit.artifact, path = %path.display(), "unit written");

        Ok(())
    }
}

///
/// MemoryEmitter
///

#[derive(Clone, Debug, Default)]
pub struct MemoryEmitter {
    units: Vec<Unit>,
}

impl MemoryEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self { units: Vec::new() }
    }

    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.artifact.path() == path)
    }

    #[must_use]
    pub fn into_units(self) -> Vec<Unit> {
        self.units
    }
}

impl CodeEmitter for MemoryEmitter {
    fn emit(&mut self, unit: &Unit) -> Result<(), EmitError> {
        self.units.push(unit.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(module: &str, name: &str) -> Unit {
        Unit::new(ArtifactRef::new(module, name), UnitKind::Encoder, "pub struct X;".into())
    }

    #[test]
    fn file_paths_follow_module_and_snake_name() {
        assert_eq!(
            unit("app::model", "FooEncoder").file_path(),
            PathBuf::from("app/model/foo_encoder.rs")
        );
        assert_eq!(unit("", "GeneratedRegistry").file_path(), PathBuf::from("generated_registry.rs"));
    }

    #[test]
    fn fs_emitter_writes_and_reports_failures() {
        let root = std::env::temp_dir().join(format!("autoserde-emit-{}", std::process::id()));
        let mut emitter = FsEmitter::new(&root);

        emitter.emit(&unit("app", "FooEncoder")).unwrap();
        let written = fs::read_to_string(root.join("app/foo_encoder.rs")).unwrap();
        assert_eq!(written, "pub struct X;");

        // a file where a directory is needed
        fs::write(root.join("blocked"), "").unwrap();
        let err = emitter.emit(&unit("blocked", "BarEncoder")).unwrap_err();
        assert!(matches!(err, EmitError::ArtifactWriteFailure { ref unit, .. } if unit == "blocked::BarEncoder"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn memory_emitter_keeps_order() {
        let mut emitter = MemoryEmitter::new();
        emitter.emit(&unit("app", "B")).unwrap();
        emitter.emit(&unit("app", "A")).unwrap();

        let names: Vec<_> = emitter.units().iter().map(|u| u.artifact.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(emitter.get("app::A").is_some());
    }
}
