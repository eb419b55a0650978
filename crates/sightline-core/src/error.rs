use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Module {module} not found in process {pid}")]
    ModuleNotFound { module: String, pid: u32 },

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Null pointer read at address {address:#x}")]
    NullPointer { address: u64 },

    #[error("Unsupported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Whether this error came from locating the target process or its module.
    ///
    /// These are fatal for a run but worth one retry, since the target may
    /// still be starting up.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            Error::ProcessNotFound(_) | Error::ModuleNotFound { .. } | Error::ProcessOpenFailed(_)
        )
    }
}
