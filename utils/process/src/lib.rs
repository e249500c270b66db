mod error;
mod runner;

/// Failure to launch, wait on, or finish waiting on a child process.
pub use error::ProcessError;
/// Exit code plus the captured stdout/stderr of one finished process.
pub use runner::CliOutput;
/// Program, arguments, working directory and extra environment for one invocation.
pub use runner::ExecRequest;
/// Seam used by callers that need to run external executables.
pub use runner::ProcessRunner;
/// `ProcessRunner` backed by `tokio::process` with concurrent pipe draining.
pub use runner::TokioProcessRunner;
