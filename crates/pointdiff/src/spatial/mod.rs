//! geometric operations: reprojection, buffering and the proximity filter
//!
use geo_types::Geometry;

pub use buffer::{BufferRegion, DEFAULT_QUADRANT_SEGMENTS};
pub use crs::Crs;
pub use error::Error;
pub use filter::RetentionMask;

pub mod buffer;
pub mod crs;
pub mod error;
pub mod filter;
pub mod webmercator;

pub(crate) fn geometry_type_name(geom: &Geometry) -> &'static str {
    #[allow(unreachable_patterns)]
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
        _ => "Geometry",
    }
}
