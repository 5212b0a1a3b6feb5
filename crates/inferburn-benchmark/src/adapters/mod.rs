//! Framework adapters: turn a test descriptor into a runnable test process.

mod cpp_benchmark;
mod script;

pub use cpp_benchmark::{parse_benchmark_app_output, CppBenchmarkAdapter, CPP_BENCHMARK_FRAMEWORK};
pub use script::ScriptAdapter;

use std::path::PathBuf;

use inferburn_core::{ExecutorConfig, TestDescriptor};

use crate::executor::ExecutorKind;
use crate::process::TestProcess;
use crate::Result;

/// Run-wide options handed to every adapter.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Replaces each descriptor's minimum valid inference time when set.
    pub min_time_override: Option<f64>,
    pub cpp_benchmark_path: Option<PathBuf>,
    pub python: String,
    pub scripts_dir: PathBuf,
}

impl ProcessOptions {
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self {
            python: config.python.clone(),
            ..Default::default()
        }
    }

    pub fn min_time_for(&self, descriptor: &TestDescriptor) -> f64 {
        self.min_time_override.unwrap_or(descriptor.min_inference_time)
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            min_time_override: None,
            cpp_benchmark_path: None,
            python: ExecutorConfig::default().python,
            scripts_dir: PathBuf::from("inference"),
        }
    }
}

pub trait FrameworkAdapter: Send + Sync {
    /// Framework identifier as written in test descriptors.
    fn name(&self) -> &str;

    fn create_process(
        &self,
        descriptor: &TestDescriptor,
        executor: ExecutorKind,
        options: &ProcessOptions,
    ) -> Result<TestProcess>;
}
