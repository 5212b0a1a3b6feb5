// Domain modules
pub mod config;
pub mod descriptor;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod stats;
pub mod status;

pub use config::{ExecutorConfig, TestConfig};
pub use descriptor::{ModelSpec, TestDescriptor};
pub use error::{InferBurnError, Result};
pub use metrics::{MetricsRecord, METRIC_NAMES};
pub use mode::ExecutionMode;
pub use status::{ExitCode, RunStatus};
