//! ChangeSet entity - the reviewed plan that apply must consume verbatim

use std::path::{Path, PathBuf};

/// Output of a plan: the saved plan artifact plus how many resources it
/// would change. Apply receives this exact value, never a fresh plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    plan_file: PathBuf,
    resource_change_count: usize,
}

impl ChangeSet {
    pub fn new(plan_file: impl Into<PathBuf>, resource_change_count: usize) -> Self {
        Self {
            plan_file: plan_file.into(),
            resource_change_count,
        }
    }

    pub fn plan_file(&self) -> &Path {
        &self.plan_file
    }

    pub fn resource_change_count(&self) -> usize {
        self.resource_change_count
    }

    pub fn has_changes(&self) -> bool {
        self.resource_change_count > 0
    }
}
