//! Error types shared by the detector crates.

/// Result type for detector operations
pub type RfResult<T> = Result<T, RfError>;

/// Errors that can occur while scanning, persisting or rendering results
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    #[error("Invalid band: {0}. Use 2.4G, 5G, or all")]
    InvalidBand(String),

    #[error("Invalid channel: {0} is not a 2.4G or 5G WiFi channel")]
    InvalidChannel(u32),

    #[error("Rendering unavailable: {0}")]
    RenderingUnavailable(String),

    #[error("Plot rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
