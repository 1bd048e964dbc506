/// Error types for configuration and color parsing
use thiserror::Error;

/// Errors produced while parsing a CSS-style color string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color syntax: {0:?}")]
    Syntax(String),

    #[error("color channel out of range in {0:?}")]
    OutOfRange(String),
}

/// Errors produced while loading or validating a scene configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Invalid(String),
}
