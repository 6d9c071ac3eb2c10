use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::progress::{ProgressObserver, ProgressTracker};
use crate::spatial::BufferRegion;

/// One flag per record of a dataset, `true` when the record is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetentionMask(Vec<bool>);

impl RetentionMask {
    /// Keep every record whose point does not intersect `region`.
    ///
    /// `dataset` must be in the reference system of the region. Records without
    /// a coordinate are always kept.
    pub fn compute(
        dataset: &Dataset,
        region: &BufferRegion,
        progress: &dyn ProgressObserver,
    ) -> Self {
        debug_assert_eq!(dataset.crs, region.crs());
        let tracker = ProgressTracker::new(
            progress,
            format!("Comparing {} -> {}", dataset.label, region.label()),
            dataset.len(),
        );
        Self(
            dataset
                .records
                .par_iter()
                .map(|record| {
                    let keep = record
                        .coord
                        .as_ref()
                        .map_or(true, |coord| !region.intersects(coord));
                    tracker.tick();
                    keep
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn num_kept(&self) -> usize {
        self.0.iter().filter(|keep| **keep).count()
    }

    pub fn num_removed(&self) -> usize {
        self.len() - self.num_kept()
    }

    /// reduce `dataset` to the kept records, preserving their order
    pub fn apply(&self, mut dataset: Dataset) -> Dataset {
        debug_assert_eq!(dataset.len(), self.len());
        let mut keep = self.0.iter();
        dataset
            .records
            .retain(|_| keep.next().copied().unwrap_or(false));
        dataset
    }
}
