use crate::{Dataset, Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the dataset as pretty-printed UTF-8 JSON, creating parent directories as needed.
pub fn save_dataset<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| Error::Persistence { path: path.to_path_buf(), source };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut out, dataset).map_err(|e| io_err(e.into()))?;
    out.write_all(b"\n").map_err(io_err)?;
    out.flush().map_err(io_err)?;
    Ok(())
}

/// Reads and validates a dataset file.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|source| Error::Persistence { path: path.to_path_buf(), source })?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;
    dataset.validate()?;
    tracing::debug!(path = %path.display(), conditions = dataset.len(), "dataset loaded");
    Ok(dataset)
}
