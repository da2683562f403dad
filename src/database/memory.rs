//! In-memory component database.

use super::ComponentDatabase;
use crate::config::load_document;
use crate::deps::{Capability, CapabilitySet, DepClass, PackageComponent};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Serialized form of an installed-component database.
///
/// ```yaml
/// components:
///   - name: foo:lib
///     provides: ["soname: libfoo.so.1(ELF64)"]
///     requires: ["soname: libc.so.6(ELF64)"]
///     paths: [/usr/lib64/libfoo.so.1]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSnapshot {
    pub components: Vec<PackageComponent>,
}

/// Installed components held in memory, indexed for lookup.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    components: BTreeMap<String, PackageComponent>,
    provides: BTreeMap<(DepClass, String), Vec<(BTreeSet<String>, String)>>,
    paths: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from installed components.
    pub fn from_components(components: impl IntoIterator<Item = PackageComponent>) -> Self {
        let mut db = Self::new();
        for component in components {
            db.insert(component);
        }
        db
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` if the file doesn't exist, and
    /// `ConfigParseError` if it is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let snapshot: DatabaseSnapshot = load_document(path)?;
        tracing::debug!(
            path = %path.display(),
            components = snapshot.components.len(),
            "Loaded database snapshot"
        );
        Ok(Self::from_components(snapshot.components))
    }

    /// Add or replace an installed component.
    pub fn insert(&mut self, component: PackageComponent) {
        if self.components.contains_key(&component.name) {
            self.remove(&component.name);
        }

        for capability in component.provides.iter() {
            self.provides
                .entry((capability.class(), capability.name().to_string()))
                .or_default()
                .push((capability.flags().clone(), component.name.clone()));
        }
        for path in &component.paths {
            self.paths
                .entry(path.clone())
                .or_default()
                .insert(component.name.clone());
        }
        self.components.insert(component.name.clone(), component);
    }

    fn remove(&mut self, name: &str) {
        for providers in self.provides.values_mut() {
            providers.retain(|(_, owner)| owner != name);
        }
        for owners in self.paths.values_mut() {
            owners.remove(name);
        }
        self.components.remove(name);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentDatabase for MemoryDatabase {
    fn find_providers(&self, capability: &Capability) -> Result<BTreeSet<String>> {
        let key = (capability.class(), capability.name().to_string());
        Ok(self
            .provides
            .get(&key)
            .into_iter()
            .flatten()
            .filter(|(flags, _)| capability.flags().is_subset(flags))
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn has_component(&self, name: &str) -> Result<bool> {
        Ok(self.components.contains_key(name))
    }

    fn owners_of_path(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self
            .paths
            .get(path)
            .map(|owners| owners.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn requires_of(&self, name: &str) -> Result<CapabilitySet> {
        Ok(self
            .components
            .get(name)
            .map(|c| c.requires.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cap(s: &str) -> Capability {
        s.parse().unwrap()
    }

    #[test]
    fn provider_flags_must_cover_required_flags() {
        let db = MemoryDatabase::from_components(vec![PackageComponent::new("glibc:lib")
            .providing(cap("soname: libc.so.6(ELF64 GLIBC_2.3 x86_64)"))]);

        assert!(db
            .find_providers(&cap("soname: libc.so.6(ELF64 x86_64)"))
            .unwrap()
            .contains("glibc:lib"));
        assert!(db
            .find_providers(&cap("soname: libc.so.6"))
            .unwrap()
            .contains("glibc:lib"));
        assert!(db
            .find_providers(&cap("soname: libc.so.6(ELF32)"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn lists_every_provider() {
        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("bar:runtime").providing(cap("python: bar")),
            PackageComponent::new("bar:extras").providing(cap("python: bar")),
        ]);
        assert_eq!(db.find_providers(&cap("python: bar")).unwrap().len(), 2);
    }

    #[test]
    fn finds_path_owners() {
        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("bison:runtime").owning("/usr/bin/bison")
        ]);
        assert_eq!(
            db.owners_of_path(Path::new("/usr/bin/bison")).unwrap(),
            vec!["bison:runtime"]
        );
        assert!(db.owners_of_path(Path::new("/usr/bin/yacc")).unwrap().is_empty());
    }

    #[test]
    fn reinserting_replaces_indexes() {
        let mut db = MemoryDatabase::new();
        db.insert(PackageComponent::new("foo:lib").providing(cap("soname: libfoo.so.1")));
        db.insert(PackageComponent::new("foo:lib").providing(cap("soname: libfoo.so.2")));
        assert_eq!(db.len(), 1);
        assert!(db.find_providers(&cap("soname: libfoo.so.1")).unwrap().is_empty());
        assert!(!db.find_providers(&cap("soname: libfoo.so.2")).unwrap().is_empty());
    }

    #[test]
    fn unknown_components_require_nothing() {
        let db = MemoryDatabase::new();
        assert!(db.requires_of("nope:lib").unwrap().is_empty());
        assert!(!db.has_component("nope:lib").unwrap());
    }

    #[test]
    fn loads_snapshot_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db.yml");
        fs::write(
            &path,
            r#"
components:
  - name: foo:lib
    provides: ["soname: libfoo.so.1"]
    paths: [/usr/lib/libfoo.so.1]
  - name: foo:devel
"#,
        )
        .unwrap();

        let db = MemoryDatabase::load(&path).unwrap();
        assert_eq!(db.len(), 2);
        assert!(db.has_component("foo:devel").unwrap());
        assert_eq!(
            db.owners_of_path(Path::new("/usr/lib/libfoo.so.1")).unwrap(),
            vec!["foo:lib"]
        );
    }
}
