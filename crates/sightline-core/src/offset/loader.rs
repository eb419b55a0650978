use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::OffsetTable;
use crate::error::Result;

/// Load an offset table from a JSON file.
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetTable> {
    let content = fs::read_to_string(path)?;
    let table = serde_json::from_str(&content)?;
    Ok(table)
}

/// Load an offset table, degrading to all-zero offsets on any failure.
///
/// A zero table never crashes the overlay: every dereference built on it
/// fails validation and all entities are dropped.
pub fn load_offsets_or_default<P: AsRef<Path>>(path: P) -> OffsetTable {
    let path = path.as_ref();
    match load_offsets(path) {
        Ok(table) => {
            if table.is_complete() {
                info!("Loaded offsets from {}", path.display());
            } else {
                warn!(
                    "Loaded offsets from {} with zero entries: {}",
                    path.display(),
                    table.zero_fields().join(", ")
                );
            }
            table
        }
        Err(e) if e.is_not_found() => {
            warn!("Offset file {} not found, using zero offsets", path.display());
            OffsetTable::default()
        }
        Err(e) => {
            warn!(
                "Failed to load offsets from {}: {}, using zero offsets",
                path.display(),
                e
            );
            OffsetTable::default()
        }
    }
}
