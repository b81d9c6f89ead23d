//! Service container for dependency injection
//!
//! Wires settings and I/O implementations together and builds tree views.

use std::path::Path;
use std::sync::Arc;

use crate::application::TreeView;
use crate::config::Settings;
use crate::domain::NodeRecord;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::store;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Builds a view populated from a record file.
    pub fn load_view(&self, path: &Path) -> InfraResult<TreeView> {
        let records = store::load_records(self.fs.as_ref(), path)?;
        Ok(TreeView::with_data((*self.settings).clone(), records))
    }

    pub fn save_tree(&self, path: &Path, records: &[NodeRecord]) -> InfraResult<()> {
        store::save_records(self.fs.as_ref(), path, records)
    }
}
