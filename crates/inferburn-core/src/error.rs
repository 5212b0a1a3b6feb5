use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferBurnError {
    #[error("Unknown executor type: {0}")]
    UnknownExecutor(String),

    #[error("Unknown inference framework: {0}")]
    UnknownFramework(String),

    #[error("Inference time length != num_tokens length ({times} != {tokens})")]
    LengthMismatch { times: usize, tokens: usize },

    #[error("Sample {index} reports zero generated tokens")]
    InvalidTokens { index: usize },

    #[error("Invalid test descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InferBurnError>;
