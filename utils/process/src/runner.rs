use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::BufReader;
use tokio::process::Command;
use tokio::task::AbortHandle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::ProcessError;

/// Exit code reported when the child was terminated by a signal and the OS
/// therefore has no exit code for it.
const SIGNALED_EXIT_CODE: i32 = -1;

const REDACTED_ARG: &str = "<redacted>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecRequest {
    /// Executable name or path. Bare names are resolved through `PATH`.
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child. `None` keeps the caller's.
    pub cwd: Option<PathBuf>,
    /// Added on top of the inherited environment.
    pub env: HashMap<String, String>,
    /// Indices into `args` that must never reach the logs.
    pub redacted: Vec<usize>,
}

impl ExecRequest {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, env: &HashMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(key, value)| (key.clone(), value.clone())));
        self
    }

    /// Marks the argument at `index` as secret.
    pub fn redact_arg(mut self, index: usize) -> Self {
        self.redacted.push(index);
        self
    }

    /// Arguments as they may be logged.
    pub fn loggable_args(&self) -> Vec<&str> {
        self.args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                if self.redacted.contains(&index) {
                    REDACTED_ARG
                } else {
                    arg.as_str()
                }
            })
            .collect()
    }
}

/// Result of one finished process. Each stream holds the lines it produced,
/// in arrival order, each terminated by `\n` regardless of the platform line
/// ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the request to completion. Returns once the child has exited and
    /// both of its output streams have been fully drained.
    async fn execute(&self, request: ExecRequest) -> Result<CliOutput, ProcessError>;
}

#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    cancellation: CancellationToken,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancelling `cancellation` interrupts any in-flight `execute` (the child
    /// is killed) and makes later calls fail without spawning. Both report
    /// `ProcessError::Interrupted`.
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn execute(&self, request: ExecRequest) -> Result<CliOutput, ProcessError> {
        if self.cancellation.is_cancelled() {
            debug!("not starting {}: already interrupted", request.program);
            return Err(ProcessError::Interrupted {
                program: request.program,
            });
        }

        trace!(
            "execute: {:?} {:?} {:?}",
            request.program,
            request.loggable_args(),
            request.cwd
        );
        let ExecRequest {
            program,
            args,
            cwd,
            env,
            ..
        } = request;

        let mut command = Command::new(&program);
        command.args(&args);
        if let Some(cwd) = &cwd {
            command.current_dir(cwd);
        }
        command.envs(&env);
        // No stdin: a child waiting on input would otherwise hang forever.
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = command
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Both pipes have bounded OS buffers, so each one gets its own reader
        // for the whole lifetime of the child.
        let stdout_handle = child.stdout.take().map(|stdout| tokio::spawn(drain_lines(stdout)));
        let stderr_handle = child.stderr.take().map(|stderr| tokio::spawn(drain_lines(stderr)));
        let readers: Vec<AbortHandle> = [&stdout_handle, &stderr_handle]
            .into_iter()
            .flatten()
            .map(JoinHandle::abort_handle)
            .collect();

        let waited = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => None,
            status = child.wait() => Some(status),
        };

        let status = match waited {
            Some(Ok(status)) => status,
            Some(Err(source)) => {
                abort_readers(&readers);
                return Err(ProcessError::Wait { program, source });
            }
            None => {
                warn!("interrupted while waiting for {program}; killing child");
                if let Err(err) = child.start_kill() {
                    warn!("failed to kill {program}: {err}");
                }
                if let Err(err) = child.wait().await {
                    warn!("failed to reap {program}: {err}");
                }
                abort_readers(&readers);
                return Err(ProcessError::Interrupted { program });
            }
        };

        // Grandchildren may keep the pipes open after the child exits.
        let drained = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => None,
            output = async {
                tokio::join!(join_drain(stdout_handle), join_drain(stderr_handle))
            } => Some(output),
        };
        let Some((stdout, stderr)) = drained else {
            warn!("interrupted while reading output of {program}");
            abort_readers(&readers);
            return Err(ProcessError::Interrupted { program });
        };

        let exit_code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        debug!("{program} exited with {exit_code}");
        Ok(CliOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

fn abort_readers(readers: &[AbortHandle]) {
    for reader in readers {
        reader.abort();
    }
}

async fn drain_lines<R>(reader: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut collected = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if line.last() == Some(&b'\n') {
                    line.pop();
                }
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                collected.push_str(&String::from_utf8_lossy(&line));
                collected.push('\n');
            }
            Err(err) => {
                warn!("failed to read process output: {err}");
                break;
            }
        }
    }
    collected
}

async fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    match handle.await {
        Ok(output) => output,
        Err(err) => {
            debug!("output reader did not finish: {err}");
            String::new()
        }
    }
}
