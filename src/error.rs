use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlapboardError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("JSON non valido: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("JSON senza items[]")]
    MissingItems,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Audio error: {0}")]
    AudioError(String),
}

impl From<serde_yaml::Error> for FlapboardError {
    fn from(error: serde_yaml::Error) -> Self {
        FlapboardError::ConfigError(error.to_string())
    }
}

impl From<&str> for FlapboardError {
    fn from(error: &str) -> Self {
        FlapboardError::AudioError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlapboardError>;
