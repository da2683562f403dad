//! Capabilities a package needs but does not supply itself.

use crate::deps::{CapabilitySet, DepClass, PackageComponent};

/// Capabilities required somewhere in a package and provided nowhere in it.
///
/// Self-satisfaction is package-wide: a capability one component
/// provides is never a gap, whichever component requires it.
#[derive(Debug, Clone, Default)]
pub struct CapabilityGap {
    gap: CapabilitySet,
}

impl CapabilityGap {
    /// Compute the gap over every component of the package.
    pub fn compute<'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = &'a PackageComponent>,
    {
        let mut required = CapabilitySet::new();
        let mut provided = CapabilitySet::new();
        for component in components {
            required.union(&component.requires);
            provided.union(&component.provides);
        }
        let gap = required.difference(&provided);

        tracing::debug!(
            required = required.len(),
            provided = provided.len(),
            gap = gap.len(),
            "Computed capability gap"
        );

        Self { gap }
    }

    /// The gap restricted to one class.
    pub fn for_class(&self, class: DepClass) -> CapabilitySet {
        self.gap.of_class(class)
    }

    /// The whole gap, every class.
    pub fn all(&self) -> &CapabilitySet {
        &self.gap
    }
}
