#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] crate::io::Error),

    #[error(transparent)]
    Spatial(#[from] crate::spatial::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
