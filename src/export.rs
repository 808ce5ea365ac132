//! JSON files for the best timetable and its conflict history.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use thiserror::Error;
use u_timetable::models::Timetable;
use u_timetable::report::{ConflictSnapshot, TimetableSink};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the timetable and the snapshots to two pretty-printed files.
pub struct JsonFileSink {
    timetable_path: PathBuf,
    conflicts_path: PathBuf,
}

impl JsonFileSink {
    pub fn new(timetable_path: impl Into<PathBuf>, conflicts_path: impl Into<PathBuf>) -> Self {
        Self {
            timetable_path: timetable_path.into(),
            conflicts_path: conflicts_path.into(),
        }
    }
}

impl TimetableSink for JsonFileSink {
    type Error = ExportError;

    fn store_timetable(&mut self, timetable: &Timetable) -> Result<(), ExportError> {
        write_json(&self.timetable_path, timetable)?;
        info!(
            "saved timetable ({} lessons) to {}",
            timetable.len(),
            self.timetable_path.display()
        );
        Ok(())
    }

    fn store_snapshots(&mut self, snapshots: &[ConflictSnapshot]) -> Result<(), ExportError> {
        write_json(&self.conflicts_path, snapshots)?;
        info!(
            "saved {} conflict snapshots to {}",
            snapshots.len(),
            self.conflicts_path.display()
        );
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(io_err)
}
