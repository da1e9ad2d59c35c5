use thiserror::Error;

/// Unified error type for the Tether crate
#[derive(Error, Debug)]
pub enum TetherError {
    // Dial errors
    #[error("Invalid dial address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Dial timed out")]
    Timeout,

    // Proxy errors
    #[error("Proxy connection failed: {0}")]
    ProxyConnectionFailed(String),

    #[error("Unsupported proxy protocol: {0}")]
    UnsupportedProtocol(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tether operations
pub type Result<T> = std::result::Result<T, TetherError>;

impl TetherError {
    /// Check if this error was produced by an elapsed dial deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, TetherError::Timeout)
    }

    /// Check if this error originated on the proxy path
    pub fn is_proxy_error(&self) -> bool {
        matches!(
            self,
            TetherError::ProxyConnectionFailed(_) | TetherError::UnsupportedProtocol(_)
        )
    }

    /// Check if this error was caused by an invalid dial target or
    /// proxy configuration rather than a network condition
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TetherError::InvalidAddress(_)
                | TetherError::UnsupportedNetwork(_)
                | TetherError::InvalidConfig(_)
        )
    }
}
