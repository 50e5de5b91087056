//! The lazy route map.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Route key to deferred-module path, or `None` when the target is known to
/// exist but could not be resolved.
///
/// Keys are unique; iteration is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LazyRouteMap {
    routes: BTreeMap<String, Option<PathBuf>>,
}

impl LazyRouteMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a route, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Option<Option<PathBuf>> {
        self.routes.insert(key.into(), path)
    }

    /// Looks up a route. The outer `None` means the key is unknown.
    pub fn get(&self, key: &str) -> Option<Option<&Path>> {
        self.routes.get(key).map(|p| p.as_deref())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Path>)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterates only the routes with a resolved path.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.routes
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|p| (k.as_str(), p)))
    }
}

impl FromIterator<(String, Option<PathBuf>)> for LazyRouteMap {
    fn from_iter<I: IntoIterator<Item = (String, Option<PathBuf>)>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LazyRouteMap {
    type Item = (String, Option<PathBuf>);
    type IntoIter = btree_map::IntoIter<String, Option<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}
