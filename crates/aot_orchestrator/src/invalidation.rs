//! Change notifications queued between cycles.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paths reported changed by a watcher, held until the next cycle starts.
///
/// Notifications arriving while a cycle is in flight are recorded here and
/// applied to the source cache once, at the start of the following cycle,
/// never mixed into the running one. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct InvalidationQueue {
    pending: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl InvalidationQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one changed path.
    pub fn push(&self, path: impl AsRef<Path>) {
        self.pending.lock().insert(path.as_ref().to_path_buf());
    }

    /// Records several changed paths.
    pub fn extend<P: AsRef<Path>>(&self, paths: impl IntoIterator<Item = P>) {
        let mut pending = self.pending.lock();
        for path in paths {
            pending.insert(path.as_ref().to_path_buf());
        }
    }

    /// Takes every queued path, sorted and deduplicated.
    pub fn drain(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.pending.lock()).into_iter().collect()
    }

    /// Number of queued paths.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
