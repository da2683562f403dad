//! The installed-component database.
//!
//! Analysis only ever asks a handful of questions of the system's
//! component database, captured by [`ComponentDatabase`]. The crate ships
//! [`MemoryDatabase`], loadable from a YAML/JSON snapshot; anything
//! backed by a real store implements the same trait.
//!
//! A provider satisfies a required capability when class and name are
//! equal and the provider's flags include every required flag.

pub mod memory;

pub use memory::{DatabaseSnapshot, MemoryDatabase};

use crate::deps::{Capability, CapabilitySet};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

/// Capabilities and components reachable from a set of requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidesClosure {
    /// Every reached capability that some installed component provides.
    pub capabilities: CapabilitySet,
    /// Every component providing a reached capability.
    pub components: BTreeSet<String>,
}

/// Queries answered by the system's component database.
pub trait ComponentDatabase {
    /// Names of installed components providing `capability`.
    fn find_providers(&self, capability: &Capability) -> Result<BTreeSet<String>>;

    /// Whether a component with this exact name is installed.
    fn has_component(&self, name: &str) -> Result<bool>;

    /// Installed components owning `path`.
    fn owners_of_path(&self, path: &Path) -> Result<Vec<String>>;

    /// What an installed component requires. Unknown names require
    /// nothing.
    fn requires_of(&self, name: &str) -> Result<CapabilitySet>;

    /// Providers for many capabilities in one call.
    ///
    /// Capabilities nobody provides are absent from the map.
    fn providers_for(
        &self,
        capabilities: &[Capability],
    ) -> Result<BTreeMap<Capability, BTreeSet<String>>> {
        let mut found = BTreeMap::new();
        for capability in capabilities {
            let providers = self.find_providers(capability)?;
            if !providers.is_empty() {
                found.insert(capability.clone(), providers);
            }
        }
        Ok(found)
    }

    /// Follow "required by" to "provided by" chains from `required` until
    /// nothing new is reached.
    ///
    /// The result is a fixed point: feeding its capabilities back in
    /// yields the same closure.
    fn transitive_provides_closure(&self, required: &[CapabilitySet]) -> Result<ProvidesClosure> {
        let mut closure = ProvidesClosure::default();
        let mut seen: BTreeSet<Capability> = BTreeSet::new();
        let mut queue: VecDeque<Capability> = VecDeque::new();

        for capability in required.iter().flat_map(|set| set.iter()) {
            if seen.insert(capability.clone()) {
                queue.push_back(capability.clone());
            }
        }

        while let Some(capability) = queue.pop_front() {
            let providers = self.find_providers(&capability)?;
            if providers.is_empty() {
                continue;
            }
            closure.capabilities.insert(capability);

            for provider in providers {
                if !closure.components.insert(provider.clone()) {
                    continue;
                }
                let requires = self.requires_of(&provider)?;
                for next in requires.iter() {
                    if seen.insert(next.clone()) {
                        queue.push_back(next.clone());
                    }
                }
            }
        }

        tracing::debug!(
            capabilities = closure.capabilities.len(),
            components = closure.components.len(),
            "Computed transitive provides closure"
        );

        Ok(closure)
    }
}
