//! Handing suggestions back to the recipe.

use std::collections::BTreeSet;

/// Receives the components a pass thinks should be added to the build
/// requirements.
///
/// Recipes that cannot take suggestions simply pass no hook.
pub trait MissingRequirementsHook {
    fn report_missing(&mut self, names: &BTreeSet<String>);
}

impl<F> MissingRequirementsHook for F
where
    F: FnMut(&BTreeSet<String>),
{
    fn report_missing(&mut self, names: &BTreeSet<String>) {
        self(names)
    }
}

/// Collects every suggestion it is handed.
#[derive(Debug, Default)]
pub struct CollectingHook {
    pub reported: Vec<BTreeSet<String>>,
}

impl MissingRequirementsHook for CollectingHook {
    fn report_missing(&mut self, names: &BTreeSet<String>) {
        self.reported.push(names.clone());
    }
}
