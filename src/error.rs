use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("No reachable hosts with open SSH port found")]
    NoReachableHosts,

    #[error("Tooling failure: {0}")]
    Tooling(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ScanError {
    /// Exit status for the process when this error terminates the run.
    ///
    /// Missing tooling and unusable/unreachable inputs get a distinct fatal
    /// status so callers can tell "the run could not happen" apart from
    /// "the run happened and no credentials worked" (which exits 1).
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Config(_)
            | ScanError::Settings(_)
            | ScanError::NoReachableHosts
            | ScanError::Tooling(_) => 2,
            _ => 1,
        }
    }

    /// True when the error must abort the whole run instead of being
    /// absorbed as a single failed attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::Config(_)
                | ScanError::Settings(_)
                | ScanError::NoReachableHosts
                | ScanError::Tooling(_)
        )
    }
}
