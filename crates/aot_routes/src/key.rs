//! Route keys: `<module>#<export>` references and their stored form.

use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_EXPORT: &str = "default";

/// A `loadChildren` reference, normalized so the export is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteReference {
    /// Module specifier as written.
    pub module: String,
    /// Export name; `default` when the reference omits it.
    pub export_name: String,
}

impl RouteReference {
    /// Parses `module#export`. A missing or empty export becomes `default`.
    pub fn parse(reference: &str) -> Self {
        let (module, export) = match reference.split_once('#') {
            Some((module, export)) if !export.is_empty() => (module, export),
            Some((module, _)) => (module, DEFAULT_EXPORT),
            None => (reference, DEFAULT_EXPORT),
        };
        Self::new(module, export)
    }

    /// Creates a reference from its parts.
    pub fn new(module: impl Into<String>, export_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            export_name: export_name.into(),
        }
    }

    /// The normalized `<module>#<export>` form.
    pub fn internal_key(&self) -> String {
        format!("{}#{}", self.module, self.export_name)
    }

    /// The key stored in a [`LazyRouteMap`](crate::LazyRouteMap).
    ///
    /// A `#default` tag is stripped; explicit exports are kept.
    pub fn storage_key(&self) -> String {
        let key = self.internal_key();
        match key.strip_suffix("#default") {
            Some(stripped) => stripped.to_string(),
            None => key,
        }
    }
}

impl fmt::Display for RouteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.internal_key())
    }
}
