use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudkeepError {
    #[error("Unknown kind: {0}")]
    UnknownKind(String),
    #[error("Malformed field '{field}' in record '{record}': no colon separator")]
    MalformedField { record: String, field: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, CloudkeepError>;

// Helper conversions
impl From<::config::ConfigError> for CloudkeepError {
    fn from(e: ::config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for CloudkeepError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}
impl From<std::io::Error> for CloudkeepError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
