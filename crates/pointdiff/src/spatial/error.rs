use crate::spatial::Crs;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geos(#[from] geos::Error),

    #[error(transparent)]
    Geozero(#[from] geozero::error::GeozeroError),

    #[error("dataset {label} is in {crs}, buffering requires a planar reference system")]
    NotPlanar { label: String, crs: Crs },

    #[error("buffering returned an unexpected {0} geometry")]
    UnexpectedGeometry(&'static str),
}
