use crate::error::ExecutionError;
use std::fs::File;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub exit_code: Option<i32>,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Where the child's standard output goes.
#[derive(Debug, Default)]
pub enum OutputSink {
    #[default]
    Capture,
    /// Stream stdout straight into an already opened file (large dumps).
    File(File),
}

/// A single external command: argument vector plus execution context.
#[derive(Debug, Default)]
pub struct Invocation {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
    pub stdout: OutputSink,
}

impl Invocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn stdout_to(mut self, file: File) -> Self {
        self.stdout = OutputSink::File(file);
        self
    }

    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments as they may appear in logs: inline `-p<secret>` values are masked.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                if arg.len() > 2 && arg.starts_with("-p") && !arg.starts_with("--") {
                    "-p******".to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: Invocation) -> Result<ProcessResult, ExecutionError>;
}

/// Runs commands on the host through `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: Invocation) -> Result<ProcessResult, ExecutionError> {
        debug!(
            "<run> {:?} for {:?}",
            invocation.display_args(),
            invocation.cwd
        );

        let program = invocation.program().to_string();
        let outcome = execute(invocation).await;
        if let Err(e) = &outcome {
            debug!("<run> error: [{}] - {}", program, e);
        }
        outcome
    }
}

async fn execute(invocation: Invocation) -> Result<ProcessResult, ExecutionError> {
    let program = invocation.program().to_string();
    let mut cmd = Command::new(&program);
    cmd.args(invocation.args.iter().skip(1))
        .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stderr(Stdio::piped());

    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    match invocation.stdout {
        OutputSink::Capture => cmd.stdout(Stdio::piped()),
        OutputSink::File(file) => cmd.stdout(Stdio::from(file)),
    };

    let child = cmd.spawn().map_err(|source| ExecutionError::Spawn {
        program: program.clone(),
        source,
    })?;

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| ExecutionError::Wait {
            program: program.clone(),
            source,
        })?;

    let result = ProcessResult {
        stdout: normalize(&output.stdout),
        stderr: normalize(&output.stderr),
        exit_code: output.status.code(),
    };

    if result.success() {
        Ok(result)
    } else {
        Err(ExecutionError::Failed { program, result })
    }
}

fn normalize(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
