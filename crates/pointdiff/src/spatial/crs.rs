use std::fmt;

use geo_types::Coord;

use crate::spatial::webmercator::{webmercator_to_wgs84, wgs84_to_webmercator};

/// The coordinate reference systems points can be moved between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Crs {
    /// geographic WGS84, EPSG:4326. Coordinates are degrees.
    Wgs84,

    /// spherical mercator, EPSG:3857. Coordinates are meters.
    WebMercator,
}

impl Crs {
    pub const fn epsg(&self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
        }
    }

    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(Self::Wgs84),
            // 900913 and friends are the unofficial codes spherical mercator
            // was published under before 3857 existed
            3857 | 3785 | 102100 | 900913 => Some(Self::WebMercator),
            _ => None,
        }
    }

    /// Parse a CRS name as found in GeoJSON `crs` members.
    ///
    /// Understands `EPSG:<code>`, `urn:ogc:def:crs:EPSG::<code>` and
    /// `urn:ogc:def:crs:OGC:1.3:CRS84`.
    pub fn from_name(name: &str) -> Option<Self> {
        let code = name.rsplit(':').next()?.trim();
        if code.eq_ignore_ascii_case("crs84") {
            return Some(Self::Wgs84);
        }
        code.parse::<u32>().ok().and_then(Self::from_epsg)
    }

    /// OGC URN used when declaring the CRS in written GeoJSON
    pub const fn ogc_urn(&self) -> &'static str {
        match self {
            Self::Wgs84 => "urn:ogc:def:crs:OGC:1.3:CRS84",
            Self::WebMercator => "urn:ogc:def:crs:EPSG::3857",
        }
    }

    /// planar systems use meters, so distances can be measured directly
    pub const fn is_planar(&self) -> bool {
        matches!(self, Self::WebMercator)
    }

    pub fn reproject(&self, coord: Coord, to: Crs) -> Coord {
        match (self, to) {
            (Self::Wgs84, Self::WebMercator) => wgs84_to_webmercator(coord),
            (Self::WebMercator, Self::Wgs84) => webmercator_to_wgs84(coord),
            _ => coord,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}
