use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use inferburn_benchmark::{BenchmarkDriver, CsvTableSink, FrameworkRegistry, ProcessOptions, ResultSink};
use inferburn_core::{ExecutorConfig, TestConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inferburn")]
#[command(about = "InferBurn - inference performance benchmark runner", long_about = None)]
struct Cli {
    /// Path to the test configuration file
    #[arg(short, long = "config")]
    config_path: PathBuf,

    /// Full name of the resulting file
    #[arg(short, long = "result")]
    result_file: PathBuf,

    /// Delimiter to use in the resulting file
    #[arg(long, value_name = "CHARACTER", default_value = ";")]
    csv_delimiter: String,

    /// Environment to execute tests in (host_machine, docker_container)
    #[arg(long, default_value = "host_machine", value_parser = ["host_machine", "docker_container"])]
    executor_type: String,

    /// Path to the pre-built C++ benchmark app
    #[arg(short = 'b', long)]
    cpp_benchmark_path: Option<PathBuf>,

    /// Override the minimum valid inference time (seconds) of every test
    #[arg(long)]
    min_inference_time: Option<f64>,

    /// Container used by the docker_container executor
    #[arg(long, env = "INFERBURN_DOCKER_CONTAINER")]
    container: Option<String>,

    /// Python interpreter for script-based frameworks
    #[arg(long, env = "INFERBURN_PYTHON")]
    python: Option<String>,

    /// Directory holding the framework inference scripts
    #[arg(long, default_value = "inference")]
    scripts_dir: PathBuf,
}

impl Cli {
    fn executor_config(&self) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            docker_container: self.container.clone().unwrap_or(defaults.docker_container),
            python: self.python.clone().unwrap_or(defaults.python),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = TestConfig::load(&cli.config_path)?;

    info!("Create result table with name: {}", cli.result_file.display());
    let mut sink = CsvTableSink::new(&cli.result_file, &cli.csv_delimiter)?;
    sink.create_table()?;

    let executor_config = cli.executor_config();
    let options = ProcessOptions {
        min_time_override: cli.min_inference_time,
        cpp_benchmark_path: cli.cpp_benchmark_path.clone(),
        scripts_dir: cli.scripts_dir.clone(),
        ..ProcessOptions::from_config(&executor_config)
    };

    let driver = BenchmarkDriver::new(FrameworkRegistry::global(), executor_config, options);
    let status = driver.run(&cli.executor_type, &config.tests, &mut sink).await;

    if status.is_success() {
        info!("Inference tests completed");
    } else {
        error!("Inference tests failed");
    }
    std::process::exit(status.code());
}
