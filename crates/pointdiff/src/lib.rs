//! Removes the points of one dataset which lie within a radius around
//! any point of a second dataset.
//!
//! Datasets are loaded from CSV, GeoJSON or FlatGeobuf, moved to spherical
//! mercator for the distance based operations and written back as WGS84
//! GeoJSON.
pub use error::Error;

pub mod config;
pub mod dataset;
pub mod diff;
pub mod error;
pub mod io;
pub mod progress;
pub mod spatial;
