pub mod adapters;
pub mod driver;
pub mod error;
pub mod executor;
pub mod output;
pub mod process;
pub mod registry;

pub use adapters::{FrameworkAdapter, ProcessOptions};
pub use driver::BenchmarkDriver;
pub use error::{BenchmarkError, Result};
pub use executor::{
    resolve_executor, DockerExecutor, Executor, ExecutorInfo, ExecutorKind, HostExecutor,
    ProcessOutput, TestCommand,
};
pub use output::{CsvTableSink, ResultSink};
pub use process::{Measurements, TestOutcome, TestProcess};
pub use registry::FrameworkRegistry;
