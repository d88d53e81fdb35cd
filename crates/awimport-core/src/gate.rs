//! Decide whether a run has anything to import.

use crate::request::ImporterSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The importer step produced a new pkginfo
    Import,
    /// Nothing new and no forced import
    NothingNew,
    /// Forced import requested without new artifacts
    ForcedWithoutChanges,
}

/// A pkginfo path reported by the preceding step counts as a change.
pub fn something_imported(summary: &ImporterSummary) -> bool {
    summary
        .pkginfo_path
        .as_ref()
        .is_some_and(|path| !path.as_os_str().is_empty())
}

pub fn evaluate(summary: &ImporterSummary, force_import: bool) -> GateDecision {
    match (something_imported(summary), force_import) {
        (true, _) => GateDecision::Import,
        (false, false) => GateDecision::NothingNew,
        (false, true) => GateDecision::ForcedWithoutChanges,
    }
}
