//! Artifact naming for statistics driver outputs

use std::path::{Path, PathBuf};

use crate::constants::artifact_filename;

/// Output paths for one driver invocation
///
/// All four live under the pair's artifact directory and embed the
/// station and month, so no two invocations ever share a path.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    /// Visibility reliability table (netCDF)
    pub vis: PathBuf,

    /// Cloud-base reliability table (netCDF)
    pub clb: PathBuf,

    /// Visibility uncertainty database
    pub vis_uncertainty: PathBuf,

    /// Cloud-base uncertainty database
    pub clb_uncertainty: PathBuf,
}

impl ArtifactSet {
    /// Artifact paths for one (pair, station, month) invocation
    pub fn new(pair_dir: &Path, icao: &str, month_key: &str) -> Self {
        let file = |kind: &str| pair_dir.join(artifact_filename(icao, month_key, kind));
        Self {
            vis: file("vis"),
            clb: file("clb"),
            vis_uncertainty: file("vis_uncertainty"),
            clb_uncertainty: file("clb_uncertainty"),
        }
    }
}
