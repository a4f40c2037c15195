//! Recursive listing of the files within a sample directory.

use std::path::Path;
use std::path::PathBuf;

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::debug;
use tracing::info;
use walkdir::WalkDir;

use crate::errors::Error;
use crate::errors::Result;

/// Ensures the sample directory exists and is a directory.
pub fn validate_dir(root: &Path) -> Result<&Path> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    Ok(root)
}

/// Lists every regular file below `root`, at any depth, sorted by path.
///
/// Directories (and anything else that is not a regular file) are left out.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let root = validate_dir(root)?;
    debug!("  [*] Searching {} for sample files.", root.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::NotFound(root.to_path_buf()),
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    info!(
        "  [*] Discovered {} files in {}.",
        files.len().to_formatted_string(&Locale::en),
        root.display()
    );

    Ok(files)
}
