use std::sync::OnceLock;

use inferburn_core::{ExecutionMode, InferBurnError, TestDescriptor};
use regex::Regex;

use crate::executor::{ExecutorKind, TestCommand};
use crate::process::{Measurements, TestProcess};
use crate::{BenchmarkError, Result};

use super::{FrameworkAdapter, ProcessOptions};

pub const CPP_BENCHMARK_FRAMEWORK: &str = "OpenVINO C++ benchmark";

/// Drives the pre-built OpenVINO C++ benchmark app in throughput mode.
pub struct CppBenchmarkAdapter;

impl CppBenchmarkAdapter {
    fn command(&self, descriptor: &TestDescriptor, options: &ProcessOptions) -> Result<TestCommand> {
        let app = options
            .cpp_benchmark_path
            .as_ref()
            .ok_or_else(|| BenchmarkError::MissingBenchmarkApp(self.name().to_string()))?;

        let mut command = TestCommand::new(app.to_string_lossy())
            .args(["-m", descriptor.model.path.as_str()])
            .args(["-b".to_string(), descriptor.batch_size.to_string()])
            .args(["-niter".to_string(), descriptor.iterations.to_string()])
            .args(["-d", descriptor.device.as_str()])
            .args(["-api", "async"]);

        if let Some(nireq) = descriptor.parameter("nireq") {
            command = command.args(["-nireq", nireq]);
        }
        if let Some(nstreams) = descriptor.parameter("nstreams") {
            command = command.args(["-nstreams", nstreams]);
        }
        Ok(command)
    }
}

impl FrameworkAdapter for CppBenchmarkAdapter {
    fn name(&self) -> &str {
        CPP_BENCHMARK_FRAMEWORK
    }

    fn create_process(
        &self,
        descriptor: &TestDescriptor,
        _executor: ExecutorKind,
        options: &ProcessOptions,
    ) -> Result<TestProcess> {
        if descriptor.mode != ExecutionMode::Async {
            return Err(InferBurnError::InvalidDescriptor(format!(
                "{} supports async mode only",
                self.name()
            ))
            .into());
        }

        Ok(TestProcess::new(
            descriptor.clone(),
            self.command(descriptor, options)?,
            options.min_time_for(descriptor),
            parse_benchmark_app_output,
        ))
    }
}

/// Read the `Count:` and `Duration:` summary lines of the benchmark app.
pub fn parse_benchmark_app_output(stdout: &str, mode: ExecutionMode) -> Result<Measurements> {
    static COUNT_RE: OnceLock<Regex> = OnceLock::new();
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();

    if mode != ExecutionMode::Async {
        return Err(BenchmarkError::OutputParse(format!(
            "benchmark app reports no {} measurements",
            mode
        )));
    }

    let count_re = COUNT_RE.get_or_init(|| Regex::new(r"Count:\s+(\d+)\s+iterations").unwrap());
    let duration_re =
        DURATION_RE.get_or_init(|| Regex::new(r"Duration:\s+([0-9]*\.?[0-9]+)\s+ms").unwrap());

    let iterations = count_re
        .captures(stdout)
        .and_then(|c| c[1].parse::<u64>().ok())
        .ok_or_else(|| BenchmarkError::OutputParse("missing iteration count".to_string()))?;
    let duration_ms = duration_re
        .captures(stdout)
        .and_then(|c| c[1].parse::<f64>().ok())
        .ok_or_else(|| BenchmarkError::OutputParse("missing duration".to_string()))?;

    Ok(Measurements::Async {
        total_time: duration_ms / 1000.0,
        iterations,
    })
}
