use std::path::PathBuf;

use crate::io::delimited::COORDINATE_COLUMN_CANDIDATES;

fn candidate_list() -> String {
    COORDINATE_COLUMN_CANDIDATES
        .iter()
        .map(|(lat, lon)| format!("{lat} & {lon}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{}: missing coordinate columns, expected one of: {}", .path.display(), candidate_list())]
    MissingCoordinateColumns { path: PathBuf },

    #[error("{}: dataset is empty", .path.display())]
    EmptyDataset { path: PathBuf },

    #[error("{}: unsupported format: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("{}: invalid coordinate '{value}' in column {column} on line {line}", .path.display())]
    InvalidCoordinate {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{}: unsupported coordinate reference system {crs}", .path.display())]
    UnsupportedCrs { path: PathBuf, crs: String },

    #[error("{}: unsupported geometry type {geometry_type}, only points are supported", .path.display())]
    UnsupportedGeometry {
        path: PathBuf,
        geometry_type: String,
    },

    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
