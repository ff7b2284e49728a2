use thiserror::Error;

/// Errors raised while assembling the core from host capabilities
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value was rejected by [`CoreConfig::validate`](crate::config::CoreConfig::validate)
    #[error("Invalid core configuration: {0}")]
    Config(String),

    /// A required bridge was not injected
    #[error("Missing {capability} bridge: {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
