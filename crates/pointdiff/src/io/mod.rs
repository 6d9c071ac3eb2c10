use std::path::Path;

use tracing::info;

pub use error::Error;
pub use format::FileFormat;
pub use writer::write_geojson;

use crate::dataset::Dataset;
use crate::spatial::Crs;

pub mod delimited;
pub mod error;
pub mod fgb;
pub mod format;
pub mod vector;
pub mod writer;

/// load a point dataset in the reference system of its source
pub fn load(path: &Path) -> Result<Dataset, Error> {
    match FileFormat::detect(path)? {
        FileFormat::Csv => delimited::read_csv(path),
        FileFormat::GeoJson => vector::read_geojson(path),
        FileFormat::FlatGeobuf => fgb::read_fgb(path),
    }
}

/// load a point dataset and reproject it to spherical mercator
pub fn load_and_project(path: &Path) -> Result<Dataset, Error> {
    let dataset = load(path)?;
    info!(
        "Loaded {} records from {} ({})",
        dataset.len(),
        path.display(),
        dataset.crs
    );
    Ok(dataset.to_crs(Crs::WebMercator))
}
