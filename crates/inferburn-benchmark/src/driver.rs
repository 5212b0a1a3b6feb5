//! Runs a list of benchmark tests one after another.

use inferburn_core::{ExecutorConfig, ExitCode, RunStatus, TestDescriptor};
use tracing::{error, info, instrument};

use crate::adapters::ProcessOptions;
use crate::executor::{resolve_executor, Executor};
use crate::output::ResultSink;
use crate::process::TestOutcome;
use crate::registry::FrameworkRegistry;

pub struct BenchmarkDriver<'a> {
    registry: &'a FrameworkRegistry,
    executor_config: ExecutorConfig,
    options: ProcessOptions,
}

impl<'a> BenchmarkDriver<'a> {
    pub fn new(
        registry: &'a FrameworkRegistry,
        executor_config: ExecutorConfig,
        options: ProcessOptions,
    ) -> Self {
        Self {
            registry,
            executor_config,
            options,
        }
    }

    /// Resolve the executor and run every test. An unknown executor fails
    /// the run before any test starts.
    pub async fn run(
        &self,
        executor_kind: &str,
        tests: &[TestDescriptor],
        sink: &mut dyn ResultSink,
    ) -> ExitCode {
        let executor = match resolve_executor(executor_kind, &self.executor_config) {
            Ok(executor) => executor,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        self.run_with_executor(executor.as_ref(), tests, sink).await
    }

    /// Run every test in order; returns the status of the last failing test,
    /// or success if none failed.
    pub async fn run_with_executor(
        &self,
        executor: &dyn Executor,
        tests: &[TestDescriptor],
        sink: &mut dyn ResultSink,
    ) -> ExitCode {
        let info = executor.info();
        let mut status = RunStatus::new();

        info!("Start {} inference tests on {}", tests.len(), info.kind);

        for (i, test) in tests.iter().enumerate() {
            info!("Test {}/{}: {} / {}", i + 1, tests.len(), test.framework, test.model.name);

            let outcome = self.run_test(executor, test).await;

            info!("Saving test result in table");
            if let Err(e) = sink.add_row(&info, test, &outcome) {
                error!("Failed to save test result: {}", e);
                status.record(ExitCode::FAILURE);
            }

            if !outcome.status.is_success() {
                error!("Test finished with non-zero code: {}", outcome.status);
            }
            status.record(outcome.status);
        }

        status.exit_code()
    }

    #[instrument(skip(self, executor, test), fields(framework = %test.framework, model = %test.model.name))]
    async fn run_test(&self, executor: &dyn Executor, test: &TestDescriptor) -> TestOutcome {
        if let Err(e) = test.validate() {
            error!("{}", e);
            return TestOutcome::failed(e);
        }

        let adapter = match self.registry.get(&test.framework) {
            Ok(adapter) => adapter,
            Err(e) => {
                error!("{} (known: {})", e, self.registry.frameworks().join(", "));
                return TestOutcome::failed(e);
            }
        };

        let mut process = match adapter.create_process(test, executor.kind(), &self.options) {
            Ok(process) => process,
            Err(e) => {
                error!("Failed to create test process: {}", e);
                return TestOutcome::failed(e);
            }
        };

        process.execute(executor).await;
        process.into_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FrameworkAdapter;
    use crate::executor::{ExecutorInfo, ExecutorKind, ProcessOutput, TestCommand};
    use crate::process::{parse_json_report, TestProcess};
    use crate::{BenchmarkError, Result};
    use async_trait::async_trait;
    use inferburn_core::{ExecutionMode, ModelSpec};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    /// Replies with a canned output per model path and remembers the order.
    #[derive(Default)]
    struct ScriptedExecutor {
        outputs: HashMap<String, ProcessOutput>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedExecutor {
        fn reply(mut self, model: &str, status: i32, stdout: &str) -> Self {
            self.outputs.insert(
                model.to_string(),
                ProcessOutput {
                    status: ExitCode(status),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl Executor for ScriptedExecutor {
        fn kind(&self) -> ExecutorKind {
            ExecutorKind::HostMachine
        }

        fn info(&self) -> ExecutorInfo {
            ExecutorInfo {
                kind: ExecutorKind::HostMachine,
                host: "test-host".to_string(),
                os: "test".to_string(),
            }
        }

        async fn run(&self, command: &TestCommand) -> Result<ProcessOutput> {
            let model = command.args[0].clone();
            self.calls.lock().unwrap().push(model.clone());
            Ok(self.outputs.get(&model).cloned().unwrap_or_default())
        }
    }

    struct EchoAdapter;

    impl FrameworkAdapter for EchoAdapter {
        fn name(&self) -> &str {
            "Echo"
        }

        fn create_process(
            &self,
            descriptor: &TestDescriptor,
            _executor: ExecutorKind,
            options: &ProcessOptions,
        ) -> Result<TestProcess> {
            Ok(TestProcess::new(
                descriptor.clone(),
                TestCommand::new("echo").arg(descriptor.model.path.as_str()),
                options.min_time_for(descriptor),
                parse_json_report,
            ))
        }
    }

    #[derive(Default)]
    struct MemorySink {
        rows: Vec<(String, TestOutcome)>,
        read_only: bool,
    }

    impl ResultSink for MemorySink {
        fn create_table(&mut self) -> Result<()> {
            Ok(())
        }

        fn add_row(
            &mut self,
            _executor: &ExecutorInfo,
            test: &TestDescriptor,
            outcome: &TestOutcome,
        ) -> Result<()> {
            if self.read_only {
                return Err(BenchmarkError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "table is read-only",
                )));
            }
            self.rows.push((test.model.name.clone(), outcome.clone()));
            Ok(())
        }
    }

    fn registry() -> FrameworkRegistry {
        let mut registry = FrameworkRegistry::new();
        registry.register(EchoAdapter);
        registry
    }

    fn case(framework: &str, model: &str, mode: ExecutionMode) -> TestDescriptor {
        TestDescriptor {
            framework: framework.to_string(),
            model: ModelSpec {
                name: model.to_string(),
                path: model.to_string(),
                precision: None,
            },
            batch_size: 4,
            mode,
            iterations: 5,
            min_inference_time: 0.0,
            device: "CPU".to_string(),
            parameters: BTreeMap::new(),
        }
    }

    fn driver(registry: &FrameworkRegistry) -> BenchmarkDriver<'_> {
        BenchmarkDriver::new(registry, ExecutorConfig::default(), ProcessOptions::default())
    }

    #[tokio::test]
    async fn test_unknown_executor_runs_nothing() {
        let registry = registry();
        let mut sink = MemorySink::default();
        let tests = vec![case("Echo", "a", ExecutionMode::Sync)];

        let status = driver(&registry).run("quantum_annealer", &tests, &mut sink).await;

        assert_eq!(status, ExitCode::FAILURE);
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_framework_still_records_row() {
        let registry = registry();
        let executor = ScriptedExecutor::default();
        let mut sink = MemorySink::default();
        let tests = vec![case("Theano", "a", ExecutionMode::Sync)];

        let status = driver(&registry)
            .run_with_executor(&executor, &tests, &mut sink)
            .await;

        assert!(!status.is_success());
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.rows[0].1.status, ExitCode::FAILURE);
        assert!(sink.rows[0].1.metrics.is_empty());
        assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_successful() {
        let registry = registry();
        let executor = ScriptedExecutor::default()
            .reply("a", 0, "{\"times\": [1.0, 1.0, 1.0]}")
            .reply("b", 0, "{\"total_time\": 10.0, \"iterations\": 5}");
        let mut sink = MemorySink::default();
        let tests = vec![
            case("Echo", "a", ExecutionMode::Sync),
            case("Echo", "b", ExecutionMode::Async),
        ];

        let status = driver(&registry)
            .run_with_executor(&executor, &tests, &mut sink)
            .await;

        assert_eq!(status, ExitCode::SUCCESS);
        assert_eq!(*executor.calls.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(sink.rows[0].1.metrics.latency_median, Some(1.0));
        assert_eq!(sink.rows[0].1.metrics.batch_throughput, Some(4.0));
        assert_eq!(sink.rows[1].1.metrics.latency_avg, Some(2.0));
        assert_eq!(sink.rows[1].1.metrics.throughput, Some(2.0));
    }

    #[tokio::test]
    async fn test_last_failure_wins() {
        let registry = registry();
        let executor = ScriptedExecutor::default()
            .reply("a", 3, "")
            .reply("b", 0, "{\"times\": [0.5]}")
            .reply("c", 2, "")
            .reply("d", 0, "{\"times\": [0.5]}");
        let mut sink = MemorySink::default();
        let tests: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|m| case("Echo", m, ExecutionMode::Sync))
            .collect();

        let status = driver(&registry)
            .run_with_executor(&executor, &tests, &mut sink)
            .await;

        assert_eq!(status, ExitCode(2));
        assert_eq!(sink.rows.len(), 4);
        let statuses: Vec<_> = sink.rows.iter().map(|(_, o)| o.status).collect();
        assert_eq!(statuses, vec![ExitCode(3), ExitCode::SUCCESS, ExitCode(2), ExitCode::SUCCESS]);
    }

    #[tokio::test]
    async fn test_malformed_descriptor_does_not_stop_run() {
        let registry = registry();
        let executor = ScriptedExecutor::default().reply("b", 0, "{\"times\": [0.5]}");
        let mut sink = MemorySink::default();
        let mut broken = case("Echo", "a", ExecutionMode::Sync);
        broken.batch_size = 0;
        let tests = vec![broken, case("Echo", "b", ExecutionMode::Sync)];

        let status = driver(&registry)
            .run_with_executor(&executor, &tests, &mut sink)
            .await;

        assert_eq!(status, ExitCode::FAILURE);
        assert_eq!(sink.rows.len(), 2);
        assert_eq!(sink.rows[1].1.status, ExitCode::SUCCESS);
        assert_eq!(*executor.calls.lock().unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_sink_failure_fails_run() {
        let registry = registry();
        let executor = ScriptedExecutor::default()
            .reply("a", 0, "{\"times\": [0.5]}")
            .reply("b", 0, "{\"times\": [0.5]}");
        let mut sink = MemorySink {
            read_only: true,
            ..Default::default()
        };
        let tests = vec![
            case("Echo", "a", ExecutionMode::Sync),
            case("Echo", "b", ExecutionMode::Sync),
        ];

        let status = driver(&registry)
            .run_with_executor(&executor, &tests, &mut sink)
            .await;

        assert_eq!(status, ExitCode::FAILURE);
        assert!(sink.rows.is_empty());
        // a failed write does not stop the remaining tests
        assert_eq!(*executor.calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_min_time_override_applies() {
        let registry = registry();
        let executor = ScriptedExecutor::default().reply("a", 0, "{\"times\": [0.01, 0.5, 0.5]}");
        let mut sink = MemorySink::default();
        let options = ProcessOptions {
            min_time_override: Some(0.1),
            ..Default::default()
        };
        let driver = BenchmarkDriver::new(&registry, ExecutorConfig::default(), options);

        driver
            .run_with_executor(&executor, &[case("Echo", "a", ExecutionMode::Sync)], &mut sink)
            .await;

        let metrics = &sink.rows[0].1.metrics;
        assert_eq!(metrics.latency_min, Some(0.5));
        assert_eq!(metrics.first_inference_time, Some(0.01));
    }
}
