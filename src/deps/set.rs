//! Capability sets partitioned by dependency class.

use super::capability::{Capability, DepClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An unordered collection of capabilities, partitioned by class.
///
/// A set never holds the same `(class, name, flags)` twice, and an empty
/// class partition is never kept around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet {
    by_class: BTreeMap<DepClass, BTreeSet<Capability>>,
}

impl CapabilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a capability. Returns `false` if it was already present.
    pub fn insert(&mut self, capability: Capability) -> bool {
        self.by_class
            .entry(capability.class())
            .or_default()
            .insert(capability)
    }

    pub fn contains(&self, capability: &Capability) -> bool {
        self.by_class
            .get(&capability.class())
            .is_some_and(|caps| caps.contains(capability))
    }

    /// Add every capability of `other` to this set.
    pub fn union(&mut self, other: &CapabilitySet) {
        for (class, caps) in &other.by_class {
            self.by_class
                .entry(*class)
                .or_default()
                .extend(caps.iter().cloned());
        }
    }

    /// Capabilities in `self` that are not in `other`.
    pub fn difference(&self, other: &CapabilitySet) -> CapabilitySet {
        let by_class = self
            .by_class
            .iter()
            .filter_map(|(class, caps)| {
                let remaining: BTreeSet<Capability> = match other.by_class.get(class) {
                    Some(theirs) => caps.difference(theirs).cloned().collect(),
                    None => caps.clone(),
                };
                (!remaining.is_empty()).then_some((*class, remaining))
            })
            .collect();
        CapabilitySet { by_class }
    }

    /// A new set holding only the capabilities of one class.
    pub fn of_class(&self, class: DepClass) -> CapabilitySet {
        let mut by_class = BTreeMap::new();
        if let Some(caps) = self.by_class.get(&class) {
            by_class.insert(class, caps.clone());
        }
        CapabilitySet { by_class }
    }

    /// Classes with at least one capability.
    pub fn classes(&self) -> impl Iterator<Item = DepClass> + '_ {
        self.by_class.keys().copied()
    }

    /// Iterate every capability, ordered by class then name.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.by_class.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_class.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(caps: Vec<Capability>) -> Self {
        caps.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(set: CapabilitySet) -> Self {
        set.by_class.into_values().flatten().collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::new();
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a Capability;
    type IntoIter = Box<dyn Iterator<Item = &'a Capability> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(caps: &[&str]) -> CapabilitySet {
        caps.iter().map(|c| c.parse::<Capability>().unwrap()).collect()
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut caps = CapabilitySet::new();
        assert!(caps.insert(Capability::soname("libfoo.so.1")));
        assert!(!caps.insert(Capability::soname("libfoo.so.1")));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn difference_removes_provided() {
        let required = set(&["soname: liba.so", "soname: libb.so", "perl: Foo::Bar"]);
        let provided = set(&["soname: libb.so"]);
        let gap = required.difference(&provided);
        assert_eq!(gap, set(&["soname: liba.so", "perl: Foo::Bar"]));
    }

    #[test]
    fn difference_drops_emptied_classes() {
        let required = set(&["soname: liba.so"]);
        let gap = required.difference(&required);
        assert!(gap.is_empty());
        assert_eq!(gap.classes().count(), 0);
    }

    #[test]
    fn union_merges_partitions() {
        let mut a = set(&["soname: liba.so"]);
        a.union(&set(&["soname: libb.so", "python: os"]));
        assert_eq!(a.len(), 3);
        assert_eq!(a.classes().collect::<Vec<_>>(), vec![DepClass::Soname, DepClass::Python]);
    }

    #[test]
    fn of_class_extracts_one_partition() {
        let all = set(&["soname: liba.so", "python: os", "python: sys"]);
        let python = all.of_class(DepClass::Python);
        assert_eq!(python.len(), 2);
        assert!(all.of_class(DepClass::Java).is_empty());
    }

    #[test]
    fn flags_distinguish_members() {
        let caps = set(&["soname: liba.so(ELF32)", "soname: liba.so(ELF64)"]);
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn deserializes_from_list() {
        let caps: CapabilitySet =
            serde_yaml::from_str("- 'soname: liba.so'\n- 'soname: liba.so'\n").unwrap();
        assert_eq!(caps.len(), 1);
    }
}
