use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmOpsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown farm type: {0}")]
    UnknownFarmType(String),

    #[error("Registry conflict: {0}")]
    RegistryConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FarmOpsError>;
