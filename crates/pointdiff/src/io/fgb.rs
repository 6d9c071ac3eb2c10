//! loading points from FlatGeobuf
//!
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flatgeobuf::{FallibleStreamingIterator, FgbReader};
use geo_types::{Coord, Geometry};
use geojson::JsonObject;
use geozero::error::GeozeroError;
use geozero::{ColumnValue, FeatureProperties, PropertyProcessor, ToGeo};
use serde_json::Value;
use tracing::warn;

use crate::dataset::{label_from_path, Dataset, PointRecord};
use crate::io::Error;
use crate::spatial::{geometry_type_name, Crs};

/// the first bytes of every FlatGeobuf file, followed by the patch version
pub(crate) const MAGIC_BYTES: &[u8] = b"fgb\x03fgb";

/// collects the properties of a feature in column order
#[derive(Default)]
struct PropertyCollector(JsonObject);

impl PropertyProcessor for PropertyCollector {
    fn property(
        &mut self,
        _idx: usize,
        name: &str,
        value: &ColumnValue,
    ) -> Result<bool, GeozeroError> {
        let value = match value {
            ColumnValue::Byte(v) => Value::from(*v),
            ColumnValue::UByte(v) => Value::from(*v),
            ColumnValue::Bool(v) => Value::from(*v),
            ColumnValue::Short(v) => Value::from(*v),
            ColumnValue::UShort(v) => Value::from(*v),
            ColumnValue::Int(v) => Value::from(*v),
            ColumnValue::UInt(v) => Value::from(*v),
            ColumnValue::Long(v) => Value::from(*v),
            ColumnValue::ULong(v) => Value::from(*v),
            // non-finite values become null
            ColumnValue::Float(v) => Value::from(f64::from(*v)),
            ColumnValue::Double(v) => Value::from(*v),
            ColumnValue::String(v) | ColumnValue::DateTime(v) => Value::from(*v),
            ColumnValue::Json(v) => {
                serde_json::from_str(v).unwrap_or_else(|_| Value::from(*v))
            }
            ColumnValue::Binary(v) => Value::from(v.to_vec()),
        };
        self.0.insert(name.to_string(), value);
        Ok(false)
    }
}

fn format_error(path: &Path, e: impl fmt::Display) -> Error {
    Error::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// map the EPSG code of the header. Codes <= 0 mean no CRS was declared.
fn header_crs(path: &Path, code: Option<i32>) -> Result<Crs, Error> {
    match code {
        None => Ok(Crs::Wgs84),
        Some(code) if code <= 0 => Ok(Crs::Wgs84),
        Some(code) => Crs::from_epsg(code as u32).ok_or_else(|| Error::UnsupportedCrs {
            path: path.to_path_buf(),
            crs: format!("EPSG:{code}"),
        }),
    }
}

/// Read the point features of a FlatGeobuf file.
pub fn read_fgb(path: &Path) -> Result<Dataset, Error> {
    let mut file = BufReader::new(File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?);
    let fgb = FgbReader::open(&mut file).map_err(|e| format_error(path, e))?;
    let crs = header_crs(path, fgb.header().crs().map(|crs| crs.code()))?;
    let mut fgb = fgb.select_all().map_err(|e| format_error(path, e))?;

    let mut records = vec![];
    while let Some(feature) = fgb.next().map_err(|e| format_error(path, e))? {
        let coord = if feature.geometry().is_none() {
            warn!("{}: feature {} has no geometry", path.display(), records.len());
            None
        } else {
            match feature.to_geo().map_err(|e| format_error(path, e))? {
                Geometry::Point(point) => Some(Coord::from(point)),
                other => {
                    return Err(Error::UnsupportedGeometry {
                        path: path.to_path_buf(),
                        geometry_type: geometry_type_name(&other).to_string(),
                    })
                }
            }
        };

        let mut properties = PropertyCollector::default();
        feature
            .process_properties(&mut properties)
            .map_err(|e| format_error(path, e))?;
        records.push(PointRecord::new(coord, properties.0));
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    Ok(Dataset::new(label_from_path(path), crs, records))
}
