//! The persistent route table merged across build cycles.

use crate::map::LazyRouteMap;
use aot_diagnostics::{Category, Diagnostic, DiagnosticCode};
use std::path::PathBuf;

/// Warning text for a route whose resolved path changed on a rebuild.
pub const CONFLICT_MESSAGE: &str = "Duplicated path in loadChildren detected during a rebuild. \
We will take the latest version detected and override it to save rebuild time. \
You should perform a full build to validate that your routes don't overlap.";

const CONFLICT_CODE: DiagnosticCode = DiagnosticCode {
    category: Category::Build,
    number: 1,
};

/// A route whose resolved path changed between passes. The newer path wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConflict {
    /// The route key.
    pub key: String,
    /// The path recorded before.
    pub previous: PathBuf,
    /// The path discovered now, which replaced it.
    pub current: PathBuf,
}

impl RouteConflict {
    /// The non-fatal warning reported for this conflict.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(CONFLICT_CODE, CONFLICT_MESSAGE).with_note(format!(
            "route '{}' moved from {} to {}",
            self.key,
            self.previous.display(),
            self.current.display()
        ))
    }
}

/// The [`LazyRouteMap`] that survives across cycles.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: LazyRouteMap,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current routes.
    pub fn routes(&self) -> &LazyRouteMap {
        &self.routes
    }

    /// Merges one discovery pass into the table.
    ///
    /// Discovered entries overwrite existing ones. A non-null value replaced
    /// by a different non-null value is reported as a conflict; transitions
    /// to or from `None` are not. Keys absent from `discovered` are left
    /// untouched.
    pub fn merge(&mut self, discovered: LazyRouteMap) -> Vec<RouteConflict> {
        let mut conflicts = Vec::new();
        for (key, current) in discovered {
            let previous = self.routes.insert(key.clone(), current.clone());
            if let (Some(Some(previous)), Some(current)) = (previous, current) {
                if previous != current {
                    tracing::warn!(
                        key = %key,
                        previous = %previous.display(),
                        current = %current.display(),
                        "lazy route changed on rebuild"
                    );
                    conflicts.push(RouteConflict {
                        key,
                        previous,
                        current,
                    });
                }
            }
        }
        conflicts
    }
}
