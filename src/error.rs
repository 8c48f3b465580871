//! Error types for NetraRig

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// NetraRig error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rig constructed without any camera sensors
    #[error("Camera sensor list should have at least one camera to render")]
    EmptyRig,

    /// Configuration value out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    ConfigParse(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
