//! Two-pass feature pipeline: page-local extraction, then the
//! volume-relative pass, driven per volume.

pub mod page;
pub mod relative;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;

pub use page::{page_features, PageFeatures};
pub use relative::add_relative_features;

use crate::lexicon::Lexicons;
use crate::paginate::paginate;

/// Suffix appended to a cleaned volume id to locate its text blob.
const TEXT_SUFFIX: &str = ".norm.txt";

/// Why a volume contributed no rows. Skips are per-volume and never abort
/// the batch; the orchestrator counts and logs them.
#[derive(Debug, Error)]
pub enum VolumeSkip {
    #[error("text source not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Run the whole per-volume pipeline for one cleaned volume id: locate the
/// text blob under `textroot`, paginate, extract page features, then apply
/// the volume-relative pass. Returns the ordered, tagged page records.
pub fn volume_features(
    htid: &str,
    textroot: &Path,
    lexicons: &Lexicons,
) -> Result<Vec<PageFeatures>, VolumeSkip> {
    let textpath = textroot.join(format!("{htid}{TEXT_SUFFIX}"));
    if !textpath.is_file() {
        return Err(VolumeSkip::MissingSource(textpath));
    }

    let text = fs::read_to_string(&textpath)
        .with_context(|| format!("reading {}", textpath.display()))?;

    let pages = paginate(&text);
    let total = pages.len();
    let mut records: Vec<PageFeatures> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| page_features(page, i, total, lexicons))
        .collect();
    add_relative_features(&mut records, htid);

    Ok(records)
}
