//! writing points as GeoJSON
//!
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::dataset::Dataset;
use crate::io::Error;
use crate::spatial::Crs;

fn to_feature_collection(dataset: Dataset) -> FeatureCollection {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({"type": "name", "properties": {"name": dataset.crs.ogc_urn()}}),
    );
    FeatureCollection {
        bbox: None,
        features: dataset
            .records
            .into_iter()
            .map(|record| Feature {
                bbox: None,
                geometry: record.coord.map(|c| {
                    let mut position = vec![c.x, c.y];
                    position.extend_from_slice(&record.extra_ordinates);
                    Geometry::new(Value::Point(position))
                }),
                id: record.id,
                properties: Some(record.properties),
                foreign_members: None,
            })
            .collect(),
        foreign_members: Some(foreign_members),
    }
}

/// Reproject `dataset` to WGS84 and write it to `path` as a GeoJSON
/// `FeatureCollection`, replacing any existing file.
pub fn write_geojson(dataset: Dataset, path: &Path) -> Result<(), Error> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let collection = to_feature_collection(dataset.to_crs(Crs::Wgs84));

    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    serde_json::to_writer(&mut writer, &collection).map_err(|e| write_error(e.into()))?;
    writer.flush().map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use geo_types::Coord;
    use geojson::feature::Id;
    use geojson::JsonObject;
    use serde_json::json;
    use tempfile::tempdir;

    use super::write_geojson;
    use crate::dataset::{Dataset, PointRecord};
    use crate::io::vector::read_geojson;
    use crate::io::Error;
    use crate::spatial::Crs;

    #[test]
    fn write_reprojects_to_wgs84() {
        let mut properties = JsonObject::new();
        properties.insert("b".to_string(), json!("second"));
        properties.insert("a".to_string(), json!(1));
        let ds = Dataset::new(
            "A",
            Crs::Wgs84,
            vec![
                PointRecord::new(Some(Coord { x: 10.0, y: 10.0 }), properties),
                PointRecord::new(None, JsonObject::new()),
            ],
        )
        .to_crs(Crs::WebMercator);

        let dir = tempdir().unwrap();
        let out = dir.path().join("out.geojson");
        write_geojson(ds, &out).unwrap();

        let written = read_geojson(&out).unwrap();
        assert_eq!(written.crs, Crs::Wgs84);
        assert_eq!(written.len(), 2);
        let c = written.records[0].coord.unwrap();
        assert!(approx_eq!(f64, c.x, 10.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, c.y, 10.0, epsilon = 1e-9));
        assert_eq!(
            written.records[0].properties.keys().collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert!(written.records[1].coord.is_none());
    }

    #[test]
    fn unwritable_path() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("missing").join("out.geojson");
        let ds = Dataset::new("A", Crs::Wgs84, vec![]);
        assert!(matches!(
            write_geojson(ds, &out),
            Err(Error::Write { .. })
        ));
    }

    #[test]
    fn id_and_extra_ordinates_roundtrip() {
        let record = PointRecord::new(Some(Coord { x: 8.5, y: 47.3 }), JsonObject::new())
            .with_id(Some(Id::String("peak".to_string())))
            .with_extra_ordinates(vec![1200.0]);
        let ds = Dataset::new("A", Crs::Wgs84, vec![record]).to_crs(Crs::WebMercator);

        let dir = tempdir().unwrap();
        let out = dir.path().join("out.geojson");
        write_geojson(ds, &out).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let feature = &written["features"][0];
        assert_eq!(feature["id"], json!("peak"));
        let coordinates = feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coordinates.len(), 3);
        assert!(approx_eq!(f64, coordinates[0].as_f64().unwrap(), 8.5, epsilon = 1e-9));
        assert!(approx_eq!(f64, coordinates[1].as_f64().unwrap(), 47.3, epsilon = 1e-9));
        assert_eq!(coordinates[2], json!(1200.0));

        let reread = read_geojson(&out).unwrap();
        assert_eq!(reread.records[0].id, Some(Id::String("peak".to_string())));
        assert_eq!(reread.records[0].extra_ordinates, vec![1200.0]);
    }
}
