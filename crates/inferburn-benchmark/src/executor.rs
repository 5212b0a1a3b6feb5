//! Execution environments a test process can run in.

use std::process::Stdio;
use std::str::FromStr;

use async_trait::async_trait;
use inferburn_core::{ExecutorConfig, ExitCode, InferBurnError};
use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::{BenchmarkError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    HostMachine,
    DockerContainer,
}

impl ExecutorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExecutorKind::HostMachine => "host_machine",
            ExecutorKind::DockerContainer => "docker_container",
        }
    }

    pub fn all() -> &'static [ExecutorKind] {
        &[ExecutorKind::HostMachine, ExecutorKind::DockerContainer]
    }
}

impl FromStr for ExecutorKind {
    type Err = InferBurnError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExecutorKind::all()
            .iter()
            .copied()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| InferBurnError::UnknownExecutor(s.to_string()))
    }
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Environment metadata recorded next to every result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutorInfo {
    pub kind: ExecutorKind,
    pub host: String,
    pub os: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl TestCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Display for TestCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub status: ExitCode,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait Executor: Send + Sync {
    fn kind(&self) -> ExecutorKind;

    fn info(&self) -> ExecutorInfo;

    /// Run the command to completion and capture its output.
    async fn run(&self, command: &TestCommand) -> Result<ProcessOutput>;
}

/// Resolve an executor by its configuration name.
pub fn resolve_executor(name: &str, config: &ExecutorConfig) -> Result<Box<dyn Executor>> {
    let executor: Box<dyn Executor> = match name.parse::<ExecutorKind>()? {
        ExecutorKind::HostMachine => Box::new(HostExecutor::new()),
        ExecutorKind::DockerContainer => {
            Box::new(DockerExecutor::new(config.docker_container.clone()))
        }
    };
    Ok(executor)
}

pub struct HostExecutor {
    host: String,
}

impl HostExecutor {
    pub fn new() -> Self {
        Self { host: host_name() }
    }
}

impl Default for HostExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for HostExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::HostMachine
    }

    fn info(&self) -> ExecutorInfo {
        ExecutorInfo {
            kind: self.kind(),
            host: self.host.clone(),
            os: os_label(),
        }
    }

    async fn run(&self, command: &TestCommand) -> Result<ProcessOutput> {
        execute_command(&command.program, &command.args).await
    }
}

/// Runs test commands inside an already running container.
pub struct DockerExecutor {
    container: String,
}

impl DockerExecutor {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    fn wrap(&self, command: &TestCommand) -> Vec<String> {
        let mut args = vec!["exec".to_string(), self.container.clone(), command.program.clone()];
        args.extend(command.args.iter().cloned());
        args
    }
}

#[async_trait]
impl Executor for DockerExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::DockerContainer
    }

    fn info(&self) -> ExecutorInfo {
        ExecutorInfo {
            kind: self.kind(),
            host: self.container.clone(),
            os: os_label(),
        }
    }

    async fn run(&self, command: &TestCommand) -> Result<ProcessOutput> {
        execute_command("docker", &self.wrap(command)).await
    }
}

async fn execute_command(program: &str, args: &[String]) -> Result<ProcessOutput> {
    debug!("Executing: {} {}", program, args.join(" "));

    let child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BenchmarkError::Launch {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let output = child.wait_with_output().await?;

    // Killed by a signal: no exit code to report
    let status = output
        .status
        .code()
        .map(ExitCode)
        .unwrap_or(ExitCode::FAILURE);

    Ok(ProcessOutput {
        status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn host_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn os_label() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
