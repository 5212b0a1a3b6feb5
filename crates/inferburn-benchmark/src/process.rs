//! A single benchmark test process and the measurements it reports.

use inferburn_core::stats::{compute_async, compute_sync, log_performance_metrics};
use inferburn_core::{ExecutionMode, ExitCode, MetricsRecord, TestDescriptor};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::executor::{Executor, TestCommand};
use crate::{BenchmarkError, Result};

/// Raw timing data reported by a test process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Measurements {
    /// Per-request durations in seconds, optionally with generated token counts.
    Sync {
        times: Vec<f64>,
        #[serde(default)]
        tokens: Option<Vec<u64>>,
    },
    /// Elapsed seconds for the whole overlapped run and the request count.
    Async { total_time: f64, iterations: u64 },
}

impl Measurements {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Measurements::Sync { .. } => ExecutionMode::Sync,
            Measurements::Async { .. } => ExecutionMode::Async,
        }
    }
}

/// Turns a process' stdout into measurements for the given mode.
pub type OutputParser = fn(&str, ExecutionMode) -> Result<Measurements>;

/// Parse the last JSON report line a script adapter prints.
pub fn parse_json_report(stdout: &str, mode: ExecutionMode) -> Result<Measurements> {
    let measurements = stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<Measurements>(line).ok())
        .ok_or_else(|| BenchmarkError::OutputParse("no measurement report found".to_string()))?;

    if measurements.mode() != mode {
        return Err(BenchmarkError::OutputParse(format!(
            "expected {} measurements, got {}",
            mode,
            measurements.mode()
        )));
    }
    Ok(measurements)
}

/// Final status and metrics of one test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub status: ExitCode,
    pub metrics: MetricsRecord,
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            status: ExitCode::FAILURE,
            metrics: MetricsRecord::default(),
            error: Some(error.to_string()),
        }
    }
}

pub struct TestProcess {
    descriptor: TestDescriptor,
    command: TestCommand,
    min_time: f64,
    parser: OutputParser,
    status: Option<ExitCode>,
    measurements: Option<Measurements>,
    error: Option<String>,
}

impl TestProcess {
    pub fn new(
        descriptor: TestDescriptor,
        command: TestCommand,
        min_time: f64,
        parser: OutputParser,
    ) -> Self {
        Self {
            descriptor,
            command,
            min_time,
            parser,
            status: None,
            measurements: None,
            error: None,
        }
    }

    pub fn command(&self) -> &TestCommand {
        &self.command
    }

    pub fn min_time(&self) -> f64 {
        self.min_time
    }

    pub async fn execute(&mut self, executor: &dyn Executor) {
        info!("Running: {}", self.command);

        let output = match executor.run(&self.command).await {
            Ok(output) => output,
            Err(e) => {
                error!("Test process failed to run: {}", e);
                self.fail(ExitCode::FAILURE, e.to_string());
                return;
            }
        };

        if !output.status.is_success() {
            warn!("Test process exited with {}: {}", output.status, output.stderr.trim());
            self.fail(output.status, format!("exit status {}", output.status));
            // A failed process may still have reported partial measurements
            self.measurements = (self.parser)(&output.stdout, self.descriptor.mode).ok();
            return;
        }

        match (self.parser)(&output.stdout, self.descriptor.mode) {
            Ok(measurements) => {
                self.status = Some(ExitCode::SUCCESS);
                self.measurements = Some(measurements);
            }
            Err(e) => {
                error!("Failed to read test output: {}", e);
                self.fail(ExitCode::FAILURE, e.to_string());
            }
        }
    }

    /// Exit status after `execute`; a process that never ran counts as failed.
    pub fn status(&self) -> ExitCode {
        self.status.unwrap_or(ExitCode::FAILURE)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn measurements(&self) -> Option<&Measurements> {
        self.measurements.as_ref()
    }

    pub fn metrics(&self) -> Result<MetricsRecord> {
        let measurements = self.measurements.as_ref().ok_or(BenchmarkError::NotExecuted)?;
        let batch_size = self.descriptor.batch_size;

        let record = match measurements {
            Measurements::Sync { times, tokens } => {
                compute_sync(batch_size, times, self.min_time, tokens.as_deref())?
            }
            Measurements::Async { total_time, iterations } => {
                compute_async(*total_time, batch_size, *iterations)
            }
        };
        log_performance_metrics(measurements.mode(), &record);
        Ok(record)
    }

    /// Consume the process into the outcome recorded for the test.
    pub fn into_outcome(self) -> TestOutcome {
        let status = self.status();
        let error = self.error.clone();

        if self.measurements.is_none() {
            return TestOutcome {
                status,
                metrics: MetricsRecord::default(),
                error: error.or_else(|| Some(BenchmarkError::NotExecuted.to_string())),
            };
        }

        match self.metrics() {
            Ok(metrics) => TestOutcome {
                status,
                metrics,
                error,
            },
            Err(e) => {
                error!("Failed to compute metrics: {}", e);
                let status = if status.is_success() { ExitCode::FAILURE } else { status };
                TestOutcome {
                    status,
                    metrics: MetricsRecord::default(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn fail(&mut self, status: ExitCode, reason: String) {
        self.status = Some(status);
        self.error = Some(reason);
    }
}
