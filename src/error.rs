#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cache size exponent must be between 0 and 20, got: {exp}")]
    ExponentOutOfRange { exp: i32 },

    #[error("unsupported sampler dimensions: {dimensions} (expected 2 or 3)")]
    UnsupportedDimensions { dimensions: u8 },

    #[error("invalid cache template: {0}")]
    InvalidTemplate(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidTemplate(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
