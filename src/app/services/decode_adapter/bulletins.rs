//! Bulletin collection: glob expansion and decoder input assembly

use std::fs;
use std::path::PathBuf;

use glob::glob;
use tracing::debug;

use super::workdir::UnitWorkDir;
use crate::app::models::SourceType;
use crate::{Error, Result};

/// Find the raw bulletin files for one source and month
///
/// Expands the source's glob with the month key substituted and returns
/// matching files sorted by path, so the decoder input is identical
/// across reruns.
pub fn collect_bulletins(source: &SourceType, month_key: &str) -> Result<Vec<PathBuf>> {
    let pattern = source.bulletin_glob_for(month_key);
    debug!("Scanning bulletins with pattern '{}'", pattern);

    let entries =
        glob(&pattern).map_err(|e| Error::glob_pattern(pattern.clone(), e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                return Err(Error::io(
                    "Failed to read bulletin directory entry",
                    e.into_error(),
                ));
            }
        }
    }

    files.sort();
    debug!("Found {} bulletin files for '{}'", files.len(), pattern);
    Ok(files)
}

/// Concatenate bulletin files into the unit's decoder input file
///
/// Each bulletin's content is appended in order, with a newline inserted
/// between files that do not end in one so bulletins never run together.
pub fn write_bulletin_input(unit: &UnitWorkDir, bulletins: &[PathBuf]) -> Result<u64> {
    let mut combined = Vec::new();
    for path in bulletins {
        let content = fs::read(path).map_err(|e| {
            Error::io(format!("Failed to read bulletin {}", path.display()), e)
        })?;
        let ends_with_newline = content.last() == Some(&b'\n');
        combined.extend_from_slice(&content);
        if !content.is_empty() && !ends_with_newline {
            combined.push(b'\n');
        }
    }

    let input_path = unit.bulletin_file();
    fs::write(&input_path, &combined).map_err(|e| {
        Error::io(
            format!("Failed to write decoder input {}", input_path.display()),
            e,
        )
    })?;

    Ok(combined.len() as u64)
}
