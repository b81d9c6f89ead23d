//! Reading and writing node record files (JSON)

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::NodeRecord;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// Loads a forest from a JSON file (array of records or a single record).
#[instrument(level = "debug", skip(fs))]
pub fn load_records(fs: &dyn FileSystem, path: &Path) -> InfraResult<Vec<NodeRecord>> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    let records = NodeRecord::parse_forest(&content).map_err(ApplicationError::from)?;
    debug!(roots = records.len(), "loaded records");
    Ok(records)
}

/// Writes a forest as pretty-printed JSON.
#[instrument(level = "debug", skip(fs, records))]
pub fn save_records(fs: &dyn FileSystem, path: &Path, records: &[NodeRecord]) -> InfraResult<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| InfraError::Serialize {
        context: format!("records for {}", path.display()),
        source: e,
    })?;
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
    fs.write(path, &json)
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
}
