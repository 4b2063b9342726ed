use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use super::{StoreError, StoreSnapshot};

/// Read a snapshot. `Ok(None)` when the file does not exist yet.
pub fn load_snapshot(path: &Path) -> Result<Option<StoreSnapshot>, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::Io(format!("open {:?}: {}", path, e))),
    };
    let snapshot: StoreSnapshot = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| StoreError::Io(format!("parse {:?}: {}", path, e)))?;
    Ok(Some(snapshot))
}

/// Write the snapshot next to `path` and rename it into place.
pub fn write_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|e| StoreError::Io(format!("open {:?}: {}", tmp, e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)
            .map_err(|e| StoreError::Io(format!("serialize snapshot: {}", e)))?;
        writer
            .flush()
            .map_err(|e| StoreError::Io(format!("flush {:?}: {}", tmp, e)))?;
    }
    fs::rename(&tmp, path).map_err(|e| StoreError::Io(format!("rename {:?}: {}", tmp, e)))?;
    log::debug!("Content store snapshot written to {:?}", path);
    Ok(())
}
