use inferburn_core::InferBurnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error(transparent)]
    Core(#[from] InferBurnError),
    #[error("Failed to launch {program}: {reason}")]
    Launch { program: String, reason: String },
    #[error("Unexpected test output: {0}")]
    OutputParse(String),
    #[error("Test was not executed")]
    NotExecuted,
    #[error("{0} requires the path to the C++ benchmark app")]
    MissingBenchmarkApp(String),
    #[error("Invalid CSV delimiter: {0:?}")]
    InvalidDelimiter(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
