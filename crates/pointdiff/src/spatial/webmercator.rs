use geo_types::Coord;
use std::f64::consts::PI;

const EARTH_RADIUS_EQUATOR: f64 = 6378137.0;
const R2D: f64 = 180.0 / PI;

/// Latitudes are limited to the poles. There is no clamping to the square
/// extent of web map tiles: points close to the poles stay distinct and map
/// to the poles exactly, which project to `y = ±inf`.
const MAX_LATITUDE: f64 = 90.0;

pub fn wgs84_to_webmercator(c: Coord) -> Coord {
    let lat = c.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Coord::from((
        EARTH_RADIUS_EQUATOR * c.x.to_radians(),
        EARTH_RADIUS_EQUATOR * lat.sin().atanh(),
    ))
}

pub fn webmercator_to_wgs84(c: Coord) -> Coord {
    Coord::from((
        c.x * R2D / EARTH_RADIUS_EQUATOR,
        ((PI * 0.5) - 2.0 * (-1.0 * c.y / EARTH_RADIUS_EQUATOR).exp().atan()) * R2D,
    ))
}
