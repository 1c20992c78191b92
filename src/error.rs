use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown corner id {0:?}")]
    InvalidCornerId(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Mixer error: {0}")]
    Mixer(String),

    #[error("Volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f64),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("No pointer backend available; rebuild with `--features desktop`")]
    NoPointerBackend,
}
