use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Search pattern is empty")]
    EmptyPattern,

    #[error("Length mismatch: search is {search} bytes, replacement is {replace}")]
    LengthMismatch { search: usize, replace: usize },

    #[error("Target unavailable: {0}")]
    TargetUnavailable(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(&'static str),

    #[error("Failed to read region at address {address:#x}: {message}")]
    RegionReadFailed { address: u64, message: String },

    #[error("Failed to write {size} bytes at address {address:#x}: {message}")]
    RegionWriteFailed {
        address: u64,
        size: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is isolated to a single region rather than the
    /// whole operation
    pub fn is_region_local(&self) -> bool {
        matches!(
            self,
            Error::RegionReadFailed { .. } | Error::RegionWriteFailed { .. }
        )
    }
}
