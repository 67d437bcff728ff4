//! Filesystem layout for one batch unit's decoder working directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::models::SourceCode;
use crate::constants::{
    ACCEPTED_TAFS_FILENAME, DECODED_TAFS_FILENAME, DECODER_INPUT_FILENAME,
    DECODER_STDERR_FILENAME, DECODER_STDOUT_FILENAME, REJECTED_TAFS_FILENAME,
};
use crate::{Error, Result};

/// Working directory for one (source, month) unit
///
/// Everything under the root is derived from the raw bulletins and the
/// decoder run, so a unit directory can be deleted and recreated at any
/// time. Layout:
///
/// ```text
/// <work_dir>/<code>/<month>/
///     input/tafs.txt           concatenated bulletins fed to the decoder
///     output/acceptedTafs.csv  decoder output, header rows
///     output/decodedTafs.csv   decoder output, element rows
///     output/rejectedTafs.txt  decoder side file, kept as a diagnostic
///     decoder_stdout.log       captured decoder stdout
///     decoder_stderr.log       captured decoder stderr
/// ```
#[derive(Debug, Clone)]
pub struct UnitWorkDir {
    root: PathBuf,
}

impl UnitWorkDir {
    /// Layout for one unit under the run's work directory
    pub fn new(work_dir: &Path, code: &SourceCode, month_key: &str) -> Self {
        Self {
            root: work_dir.join(code.as_str()).join(month_key),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Concatenated bulletin file the decoder reads
    pub fn bulletin_file(&self) -> PathBuf {
        self.input_dir().join(DECODER_INPUT_FILENAME)
    }

    /// Decoder output holding one row per accepted forecast header
    pub fn accepted_file(&self) -> PathBuf {
        self.output_dir().join(ACCEPTED_TAFS_FILENAME)
    }

    /// Decoder output holding one row per decoded change-group element
    pub fn decoded_file(&self) -> PathBuf {
        self.output_dir().join(DECODED_TAFS_FILENAME)
    }

    /// Decoder side file listing bulletins it could not parse
    pub fn rejected_file(&self) -> PathBuf {
        self.output_dir().join(REJECTED_TAFS_FILENAME)
    }

    pub fn stdout_log(&self) -> PathBuf {
        self.root.join(DECODER_STDOUT_FILENAME)
    }

    pub fn stderr_log(&self) -> PathBuf {
        self.root.join(DECODER_STDERR_FILENAME)
    }

    /// Create the unit layout, discarding any previous decoder output
    ///
    /// The output directory is recreated empty so a failed rerun can
    /// never pick up CSVs left behind by an earlier invocation.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.input_dir())
            .map_err(|e| Error::io("Failed to create unit input directory", e))?;

        let output = self.output_dir();
        if output.exists() {
            fs::remove_dir_all(&output)
                .map_err(|e| Error::io("Failed to clear unit output directory", e))?;
        }
        fs::create_dir_all(&output)
            .map_err(|e| Error::io("Failed to create unit output directory", e))?;
        Ok(())
    }
}
