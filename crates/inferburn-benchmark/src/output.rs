//! Result tables: one row per executed test.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use inferburn_core::{TestDescriptor, METRIC_NAMES};
use tracing::info;

use crate::executor::ExecutorInfo;
use crate::process::TestOutcome;
use crate::{BenchmarkError, Result};

const DESCRIPTOR_COLUMNS: &[&str] = &[
    "status",
    "error",
    "executor",
    "host",
    "os",
    "framework",
    "model",
    "precision",
    "device",
    "mode",
    "batch_size",
    "iterations",
    "min_inference_time",
];

pub trait ResultSink {
    /// Prepare the table. Calling it more than once has no further effect.
    fn create_table(&mut self) -> Result<()>;

    fn add_row(
        &mut self,
        executor: &ExecutorInfo,
        test: &TestDescriptor,
        outcome: &TestOutcome,
    ) -> Result<()>;
}

pub fn header() -> Vec<&'static str> {
    DESCRIPTOR_COLUMNS
        .iter()
        .chain(METRIC_NAMES.iter())
        .copied()
        .collect()
}

/// Flatten a test result into table cells; missing values become empty cells.
pub fn row(executor: &ExecutorInfo, test: &TestDescriptor, outcome: &TestOutcome) -> Vec<String> {
    let mut cells = vec![
        outcome.status.to_string(),
        outcome.error.clone().unwrap_or_default(),
        executor.kind.to_string(),
        executor.host.clone(),
        executor.os.clone(),
        test.framework.clone(),
        test.model.name.clone(),
        test.model.precision.clone().unwrap_or_default(),
        test.device.clone(),
        test.mode.to_string(),
        test.batch_size.to_string(),
        test.iterations.to_string(),
        test.min_inference_time.to_string(),
    ];
    cells.extend(
        outcome
            .metrics
            .values()
            .into_iter()
            .map(|(_, value)| value.map(|v| v.to_string()).unwrap_or_default()),
    );
    cells
}

/// Delimited-text table, appended to and flushed after every row.
pub struct CsvTableSink {
    path: PathBuf,
    delimiter: u8,
    created: bool,
}

impl CsvTableSink {
    pub fn new(path: impl Into<PathBuf>, delimiter: &str) -> Result<Self> {
        let delimiter = match delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => return Err(BenchmarkError::InvalidDelimiter(delimiter.to_string())),
        };
        Ok(Self {
            path: path.into(),
            delimiter,
            created: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self, truncate: bool) -> Result<csv::Writer<std::fs::File>> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(truncate)
            .append(!truncate)
            .open(&self.path)?;

        Ok(csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(file))
    }
}

impl ResultSink for CsvTableSink {
    fn create_table(&mut self) -> Result<()> {
        if self.created {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut wtr = self.writer(true)?;
        wtr.write_record(header())?;
        wtr.flush()?;

        self.created = true;
        info!("Result table created at {:?}", self.path);
        Ok(())
    }

    fn add_row(
        &mut self,
        executor: &ExecutorInfo,
        test: &TestDescriptor,
        outcome: &TestOutcome,
    ) -> Result<()> {
        self.create_table()?;

        let mut wtr = self.writer(false)?;
        wtr.write_record(row(executor, test, outcome))?;
        wtr.flush()?;
        Ok(())
    }
}
