#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration error: {msg}")]
    ConfigurationError { msg: String },

    #[error("Invalid subscription tier {value}, expected 1..=5")]
    InvalidTier { value: i64 },

    #[error("Unknown subscriber status \"{value}\"")]
    InvalidStatus { value: String },

    #[error("Unknown content type \"{value}\"")]
    InvalidContentType { value: String },
}
