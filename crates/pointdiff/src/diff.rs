use std::fmt;

use tracing::info;

use crate::config::DiffOptions;
use crate::dataset::Dataset;
use crate::progress::ProgressObserver;
use crate::spatial::{BufferRegion, Error, RetentionMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    pub total: usize,
    pub removed: usize,
    pub kept: usize,
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept {} of {} records, removed {}",
            self.kept, self.total, self.removed
        )
    }
}

/// Remove all records of `a` lying within the radius of `options` around
/// any point of `b`.
///
/// `b` must be in a planar reference system. `a` is moved to the reference
/// system of `b`, the relative order of the kept records is unchanged.
pub fn spatial_diff(
    a: Dataset,
    b: &Dataset,
    options: &DiffOptions,
    progress: &dyn ProgressObserver,
) -> Result<(Dataset, DiffSummary), Error> {
    info!("Buffering geometries for {}...", b.label);
    let region = BufferRegion::build(
        b,
        options.radius.length(),
        options.quadrant_segments,
        progress,
    )?;

    info!("Computing diff: {} minus {}...", a.label, b.label);
    let a = a.to_crs(region.crs());
    let mask = RetentionMask::compute(&a, &region, progress);
    let summary = DiffSummary {
        total: mask.len(),
        removed: mask.num_removed(),
        kept: mask.num_kept(),
    };
    Ok((mask.apply(a), summary))
}
