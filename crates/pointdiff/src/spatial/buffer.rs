use geo::{BoundingRect, Intersects};
use geo_types::{Coord, Geometry, MultiPolygon, Polygon, Rect};
use geos::Geom;
use geozero::ToGeo;
use rayon::prelude::*;
use tracing::{debug, warn};
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::dataset::Dataset;
use crate::progress::{ProgressObserver, ProgressTracker};
use crate::spatial::{geometry_type_name, Crs, Error};

/// segments used to approximate a quarter circle of a buffer disk
pub const DEFAULT_QUADRANT_SEGMENTS: i32 = 16;

struct Lobe {
    bbox: Rect,
    polygon: Polygon,
}

/// The union of the disks around all points of a dataset.
///
/// Disks are buffered and merged by GEOS, only the merged lobes are
/// converted to `geo` geometries. The region may consist of multiple disjoint lobes. It is immutable once
/// built and may be shared between threads.
pub struct BufferRegion {
    label: String,
    crs: Crs,
    lobes: Vec<Lobe>,
}

impl BufferRegion {
    /// a region nothing intersects with
    pub fn empty(label: impl Into<String>, crs: Crs) -> Self {
        Self::from_polygons(label, crs, std::iter::empty())
    }

    /// build a region from already merged polygons. Empty polygons are dropped.
    pub fn from_polygons<I>(label: impl Into<String>, crs: Crs, polygons: I) -> Self
    where
        I: IntoIterator<Item = Polygon>,
    {
        Self {
            label: label.into(),
            crs,
            lobes: polygons
                .into_iter()
                .filter_map(|polygon| {
                    polygon
                        .bounding_rect()
                        .map(|bbox| Lobe { bbox, polygon })
                })
                .collect(),
        }
    }

    /// Buffer every point of `dataset` by `distance` and merge the disks.
    ///
    /// The dataset must use a planar reference system. Records without a
    /// usable coordinate are skipped.
    pub fn build(
        dataset: &Dataset,
        distance: Length,
        quadrant_segments: i32,
        progress: &dyn ProgressObserver,
    ) -> Result<Self, Error> {
        if !dataset.crs.is_planar() {
            return Err(Error::NotPlanar {
                label: dataset.label.clone(),
                crs: dataset.crs,
            });
        }
        let radius_m = distance.get::<meter>();
        let tracker = ProgressTracker::new(
            progress,
            format!("Buffering {}", dataset.label),
            dataset.len(),
        );

        let disks = dataset
            .records
            .par_iter()
            .enumerate()
            .map(|(i, record)| {
                let disk = match record.coord {
                    Some(coord) if coord.x.is_finite() && coord.y.is_finite() => {
                        point_disk(coord, radius_m, quadrant_segments)
                    }
                    _ => {
                        warn!(
                            "{}: record {} has no usable point geometry, skipping it",
                            dataset.label, i
                        );
                        Ok(None)
                    }
                };
                tracker.tick();
                disk
            })
            .collect::<Result<Vec<_>, Error>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        debug!(
            "merging {} disks of {} m radius around the points of {}",
            disks.len(),
            radius_m,
            dataset.label
        );
        Ok(Self::from_polygons(
            dataset.label.clone(),
            dataset.crs,
            union(disks)?,
        ))
    }

    /// label of the dataset the region was built from
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.lobes.is_empty()
    }

    /// number of disjoint parts
    pub fn num_lobes(&self) -> usize {
        self.lobes.len()
    }

    pub fn to_multi_polygon(&self) -> MultiPolygon {
        MultiPolygon::new(self.lobes.iter().map(|l| l.polygon.clone()).collect())
    }

    /// points on the boundary count as intersecting
    pub fn intersects(&self, coord: &Coord) -> bool {
        self.lobes
            .iter()
            .any(|lobe| lobe.bbox.intersects(coord) && lobe.polygon.intersects(coord))
    }
}

fn point_disk(
    coord: Coord,
    radius_m: f64,
    quadrant_segments: i32,
) -> Result<Option<geos::Geometry<'static>>, Error> {
    let point = geos::CoordSeq::new_from_vec(&[[coord.x, coord.y]])?.create_point()?;
    let disk = point.buffer(radius_m, quadrant_segments)?;
    if disk.is_empty()? {
        // zero radius
        return Ok(None);
    }
    Ok(Some(disk))
}

fn union(disks: Vec<geos::Geometry<'static>>) -> Result<Vec<Polygon>, Error> {
    if disks.is_empty() {
        return Ok(vec![]);
    }
    let merged = geos::Geometry::create_geometry_collection(disks)?.unary_union()?;
    if merged.is_empty()? {
        return Ok(vec![]);
    }
    match merged.to_geo()? {
        Geometry::Polygon(polygon) => Ok(vec![polygon]),
        Geometry::MultiPolygon(multi_polygon) => Ok(multi_polygon.0),
        other => Err(Error::UnexpectedGeometry(geometry_type_name(&other))),
    }
}
