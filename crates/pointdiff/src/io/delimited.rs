//! loading points from delimited text
//!
use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use geo_types::Coord;
use geojson::JsonObject;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::dataset::{label_from_path, Dataset, PointRecord};
use crate::io::Error;
use crate::spatial::Crs;

/// `(latitude, longitude)` column name pairs, in order of preference
pub const COORDINATE_COLUMN_CANDIDATES: [(&str, &str); 3] = [
    ("latitude", "longitude"),
    ("lat", "lon"),
    ("lat", "lng"),
];

/// positions of the coordinate columns within a header
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CoordinateColumns {
    pub latitude: usize,
    pub longitude: usize,
}

/// Find the coordinate columns in a header.
///
/// The pairs of [`COORDINATE_COLUMN_CANDIDATES`] are checked in order, comparing
/// names case-insensitively. The first pair with both columns present wins.
pub fn detect_coordinate_columns<S: AsRef<str>>(header: &[S]) -> Option<CoordinateColumns> {
    let lowercase = header
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect::<Vec<_>>();
    let position = |wanted: &str| lowercase.iter().position(|name| name == wanted);

    COORDINATE_COLUMN_CANDIDATES
        .iter()
        .find_map(|&(lat, lon)| {
            Some(CoordinateColumns {
                latitude: position(lat)?,
                longitude: position(lon)?,
            })
        })
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    fn of_cell(cell: &str) -> Self {
        if cell.parse::<i64>().is_ok() {
            Self::Integer
        } else if cell.parse::<f64>().is_ok() {
            Self::Float
        } else if parse_bool(cell).is_some() {
            Self::Boolean
        } else {
            Self::Text
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Text,
        }
    }

    /// Infer the type of a column from all its values. Empty cells are
    /// ignored; a column without any values is treated as float.
    fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut column_type = None;
        for cell in cells.into_iter().map(str::trim).filter(|c| !c.is_empty()) {
            let merged = match column_type {
                None => Self::of_cell(cell),
                Some(ct) => Self::merge(ct, Self::of_cell(cell)),
            };
            if merged == Self::Text {
                return merged;
            }
            column_type = Some(merged);
        }
        column_type.unwrap_or(Self::Float)
    }

    fn to_value(self, cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            Self::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            Self::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean => parse_bool(trimmed).map(Value::Bool).unwrap_or(Value::Null),
            Self::Text => Value::String(cell.to_string()),
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Column names made unique by suffixing repeated names with `.1`, `.2`, ...
/// Unnamed columns are called `Unnamed: <position>`.
fn column_names(header: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(pos, name)| {
            let name = if name.is_empty() {
                format!("Unnamed: {pos}")
            } else {
                name.to_string()
            };
            let mut unique = name.clone();
            let mut n = 1;
            while seen.contains(&unique) {
                unique = format!("{name}.{n}");
                n += 1;
            }
            seen.insert(unique.clone());
            unique
        })
        .collect()
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => Error::Read {
            path: path.to_path_buf(),
            source,
        },
        _ => Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason,
        },
    }
}

fn parse_coordinate(
    path: &Path,
    row: &StringRecord,
    index: usize,
    column: &str,
) -> Result<Option<f64>, Error> {
    let cell = row.get(index).unwrap_or("").trim();
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(Error::InvalidCoordinate {
            path: path.to_path_buf(),
            line: row.position().map(|p| p.line()).unwrap_or_default(),
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}

/// Read a delimited text file with a header row into a WGS84 [`Dataset`].
///
/// All columns, the coordinate columns included, become attributes.
pub fn read_csv(path: &Path) -> Result<Dataset, Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let names = column_names(reader.headers().map_err(|e| csv_error(path, e))?);
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| csv_error(path, e))?;

    if rows.is_empty() {
        return Err(Error::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() > names.len()) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!(
                "line {} has {} fields, the header only {}",
                row.position().map(|p| p.line()).unwrap_or_default(),
                row.len(),
                names.len()
            ),
        });
    }

    let columns = detect_coordinate_columns(&names).ok_or_else(|| {
        Error::MissingCoordinateColumns {
            path: path.to_path_buf(),
        }
    })?;
    debug!(
        "{}: using columns {} and {} as coordinates",
        path.display(),
        names[columns.latitude],
        names[columns.longitude]
    );

    let column_types = (0..names.len())
        .map(|i| ColumnType::infer(rows.iter().map(|row| row.get(i).unwrap_or(""))))
        .collect::<Vec<_>>();

    let mut records = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let lat = parse_coordinate(path, row, columns.latitude, &names[columns.latitude])?;
        let lon = parse_coordinate(path, row, columns.longitude, &names[columns.longitude])?;
        let coord = match (lon, lat) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => {
                warn!(
                    "{}: line {} lacks a coordinate",
                    path.display(),
                    row.position().map(|p| p.line()).unwrap_or_default()
                );
                None
            }
        };

        let mut properties = JsonObject::with_capacity(names.len());
        for (i, (name, column_type)) in names.iter().zip(column_types.iter()).enumerate() {
            properties.insert(name.clone(), column_type.to_value(row.get(i).unwrap_or("")));
        }
        records.push(PointRecord::new(coord, properties));
    }

    Ok(Dataset::new(label_from_path(path), Crs::Wgs84, records))
}
