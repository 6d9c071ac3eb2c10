//! loading points from GeoJSON
//!
use std::path::Path;

use geo_types::Coord;
use geojson::{Feature, GeoJson, JsonObject, Value};
use tracing::warn;

use crate::dataset::{label_from_path, Dataset, PointRecord};
use crate::io::Error;
use crate::spatial::Crs;

fn value_type_name(value: &Value) -> &'static str {
    #[allow(unreachable_patterns)]
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
        _ => "Geometry",
    }
}

/// The CRS declared by the legacy `crs` member of a GeoJSON document, if any.
fn declared_crs(path: &Path, foreign_members: Option<&JsonObject>) -> Result<Option<Crs>, Error> {
    let crs = match foreign_members.and_then(|fm| fm.get("crs")) {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(crs) => crs,
    };
    crs.pointer("/properties/name")
        .and_then(serde_json::Value::as_str)
        .and_then(Crs::from_name)
        .map(Some)
        .ok_or_else(|| Error::UnsupportedCrs {
            path: path.to_path_buf(),
            crs: crs.to_string(),
        })
}

fn feature_to_record(path: &Path, index: usize, feature: Feature) -> Result<PointRecord, Error> {
    let (coord, extra_ordinates) = match feature.geometry.map(|g| g.value) {
        None => {
            warn!("{}: feature {} has no geometry", path.display(), index);
            (None, vec![])
        }
        Some(Value::Point(position)) if position.len() >= 2 => (
            Some(Coord {
                x: position[0],
                y: position[1],
            }),
            position[2..].to_vec(),
        ),
        Some(Value::Point(_)) => {
            warn!("{}: feature {} has an incomplete position", path.display(), index);
            (None, vec![])
        }
        Some(other) => {
            return Err(Error::UnsupportedGeometry {
                path: path.to_path_buf(),
                geometry_type: value_type_name(&other).to_string(),
            })
        }
    };
    Ok(
        PointRecord::new(coord, feature.properties.unwrap_or_default())
            .with_id(feature.id)
            .with_extra_ordinates(extra_ordinates),
    )
}

/// Read the point features of a GeoJSON document.
///
/// Besides `FeatureCollection`s, single `Feature`s and bare geometries are
/// accepted. Documents without a `crs` member are WGS84.
pub fn read_geojson(path: &Path) -> Result<Dataset, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| Error::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (features, foreign_members) = match geojson {
        GeoJson::FeatureCollection(fc) => (fc.features, fc.foreign_members),
        GeoJson::Feature(feature) => (vec![feature], None),
        GeoJson::Geometry(geometry) => (
            vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            None,
        ),
    };
    let crs = declared_crs(path, foreign_members.as_ref())?.unwrap_or(Crs::Wgs84);

    if features.is_empty() {
        return Err(Error::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    let records = features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| feature_to_record(path, i, feature))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(label_from_path(path), crs, records))
}

#[cfg(test)]
mod tests {
    use geojson::feature::Id;
    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::read_geojson;
    use crate::io::Error;
    use crate::spatial::Crs;

    fn geojson_file(contents: &str) -> NamedTempFile {
        let tmp = NamedTempFile::with_suffix(".geojson").unwrap();
        std::fs::write(tmp.path(), contents).unwrap();
        tmp
    }

    #[test]
    fn read_feature_collection() {
        let tmp = geojson_file(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [13.4, 52.5]},
                 "properties": {"zeta": 1, "alpha": "a"}},
                {"type": "Feature", "geometry": null, "properties": null}
            ]}"#,
        );
        let ds = read_geojson(tmp.path()).unwrap();
        assert_eq!(ds.crs, Crs::Wgs84);
        assert_eq!(ds.len(), 2);
        let c = ds.records[0].coord.unwrap();
        assert_eq!((c.x, c.y), (13.4, 52.5));
        assert_eq!(
            ds.records[0].properties.keys().collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
        assert_eq!(ds.records[0].properties["zeta"], json!(1));
        assert!(ds.records[1].coord.is_none());
        assert!(ds.records[1].properties.is_empty());
    }

    #[test]
    fn read_declared_crs() {
        let tmp = geojson_file(
            r#"{"type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}},
                "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1000.0, 2000.0]}, "properties": {}}
            ]}"#,
        );
        assert_eq!(read_geojson(tmp.path()).unwrap().crs, Crs::WebMercator);
    }

    #[test]
    fn unsupported_crs() {
        let tmp = geojson_file(
            r#"{"type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "EPSG:25832"}},
                "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1000.0, 2000.0]}, "properties": {}}
            ]}"#,
        );
        assert!(matches!(
            read_geojson(tmp.path()),
            Err(Error::UnsupportedCrs { .. })
        ));
    }

    #[test]
    fn bare_geometry() {
        let tmp = geojson_file(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        let ds = read_geojson(tmp.path()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn polygons_are_rejected() {
        let tmp = geojson_file(
            r#"{"type": "Feature", "properties": {},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}"#,
        );
        match read_geojson(tmp.path()) {
            Err(Error::UnsupportedGeometry { geometry_type, .. }) => {
                assert_eq!(geometry_type, "Polygon")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_collection() {
        let tmp = geojson_file(r#"{"type": "FeatureCollection", "features": []}"#);
        assert!(matches!(
            read_geojson(tmp.path()),
            Err(Error::EmptyDataset { .. })
        ));
    }

    #[test]
    fn invalid_document() {
        let tmp = geojson_file("{ this is not json");
        assert!(matches!(
            read_geojson(tmp.path()),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn feature_id_and_elevation_are_kept() {
        let tmp = geojson_file(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": "station-7", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [13.4, 52.5, 34.0]}},
                {"type": "Feature", "id": 12, "properties": {},
                 "geometry": {"type": "Point", "coordinates": [13.5, 52.6]}}
            ]}"#,
        );
        let ds = read_geojson(tmp.path()).unwrap();
        assert_eq!(ds.records[0].id, Some(Id::String("station-7".to_string())));
        assert_eq!(ds.records[0].extra_ordinates, vec![34.0]);
        assert_eq!(ds.records[1].id, Some(Id::Number(12u64.into())));
        assert!(ds.records[1].extra_ordinates.is_empty());
    }
}
