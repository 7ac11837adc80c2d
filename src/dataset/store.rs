//! Dataset Store
//!
//! Load-once holder for the readings table. Starts empty, accepts exactly one
//! dataset, and hands out shared references to it afterwards. There is no
//! reload path: a process that needs new data restarts.

use super::error::{DatasetError, DatasetResult};
use super::types::Dataset;
use crate::timestamp::canonical_iso;
use std::sync::{Arc, OnceLock};

/// Shared handle to the (possibly not yet loaded) readings table.
///
/// Cloning the handle is cheap; all clones observe the same table.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    inner: Arc<OnceLock<Arc<Dataset>>>,
}

impl DatasetStore {
    /// Create a store in the not-loaded state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `dataset`
    pub fn loaded(dataset: Dataset) -> Self {
        Self {
            inner: Arc::new(OnceLock::from(Arc::new(dataset))),
        }
    }

    /// Install the dataset. Fails if one was already installed.
    pub fn install(&self, dataset: Dataset) -> DatasetResult<Arc<Dataset>> {
        let dataset = Arc::new(dataset);
        self.inner
            .set(Arc::clone(&dataset))
            .map_err(|_| DatasetError::AlreadyLoaded)?;

        match dataset.time_bounds() {
            Some((first, last)) => tracing::info!(
                rows = dataset.len(),
                first = %canonical_iso(&first),
                last = %canonical_iso(&last),
                "Dataset installed"
            ),
            None => tracing::warn!("Dataset installed with no rows"),
        }
        Ok(dataset)
    }

    /// The loaded dataset, or `None` while loading has not finished
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.inner.get().cloned()
    }

    /// Whether a dataset has been installed
    pub fn is_loaded(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Row count of the loaded dataset (0 when not loaded)
    pub fn row_count(&self) -> usize {
        self.inner.get().map(|d| d.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Reading;
    use chrono::Utc;

    #[test]
    fn test_not_loaded_by_default() {
        let store = DatasetStore::new();
        assert!(!store.is_loaded());
        assert!(store.get().is_none());
        assert_eq!(store.row_count(), 0);
    }

    #[test]
    fn test_install_once() {
        let store = DatasetStore::new();
        let dataset = Dataset::from_readings(vec![Reading::new(Utc::now(), "lab", "temp", 1.0)]);

        store.install(dataset).unwrap();
        assert!(store.is_loaded());
        assert_eq!(store.row_count(), 1);

        let err = store.install(Dataset::new()).unwrap_err();
        assert!(matches!(err, DatasetError::AlreadyLoaded));
        // The first dataset is still the one served
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn test_loaded_store_refuses_install() {
        let store = DatasetStore::loaded(Dataset::from_readings(vec![
            Reading::new(Utc::now(), "lab", "temp", 1.0),
            Reading::new(Utc::now(), "lab", "temp", 2.0),
        ]));
        assert!(store.is_loaded());
        assert_eq!(store.row_count(), 2);

        let err = store.install(Dataset::new()).unwrap_err();
        assert!(matches!(err, DatasetError::AlreadyLoaded));
        assert_eq!(store.row_count(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let store = DatasetStore::new();
        let handle = store.clone();

        store.install(Dataset::new()).unwrap();
        assert!(handle.is_loaded());
        assert!(Arc::ptr_eq(&store.get().unwrap(), &handle.get().unwrap()));
    }
}
