use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use gitpolicy_utils_process::CliOutput;
use gitpolicy_utils_process::ExecRequest;
use gitpolicy_utils_process::ProcessError;
use gitpolicy_utils_process::ProcessRunner;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::GitProperty;
use crate::LiveConfigSnapshot;

pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Thin wrapper over the `git` executable for the handful of commands the
/// reconciler needs.
#[derive(Clone)]
pub struct GitCli {
    runner: Arc<dyn ProcessRunner>,
    program: String,
    cwd: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl GitCli {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            program: DEFAULT_GIT_PROGRAM.to_string(),
            cwd: None,
            env: HashMap::new(),
        }
    }

    /// Overrides the executable, e.g. an absolute path to a bundled git.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Adds an environment variable to every git invocation. Setting
    /// `GIT_CONFIG_GLOBAL` redirects all global reads and writes to another file.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program
    }

    pub async fn git<I, S>(&self, args: I) -> Result<CliOutput, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.execute(self.request(args)).await
    }

    fn request<I, S>(&self, args: I) -> ExecRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExecRequest::new(self.program.clone())
            .args(args)
            .cwd(self.cwd.clone())
            .envs(&self.env)
    }

    pub async fn version(&self) -> Result<CliOutput, ProcessError> {
        self.git(["--version"]).await
    }

    /// Whether `git --version` launches and exits with 0.
    ///
    /// Launch failures count as "not executable"; only an interruption is
    /// returned as an error.
    pub async fn is_executable(&self) -> Result<bool, ProcessError> {
        match self.version().await {
            Ok(output) if output.success() => {
                info!("Git version: {}", output.stdout.trim_end());
                Ok(true)
            }
            Ok(output) => {
                info!(
                    "{} --version failed. exit code: {}, stdout: {}, stderr: {}",
                    self.program, output.exit_code, output.stdout, output.stderr
                );
                Ok(false)
            }
            Err(err) if err.is_interrupted() => Err(err),
            Err(err) => {
                warn!("{err}");
                Ok(false)
            }
        }
    }

    /// Whether `path` is inside a git work tree (or git dir), as git sees it.
    pub async fn is_git_repo(&self, path: &Path) -> Result<bool, ProcessError> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let path = path.to_string_lossy().into_owned();
        match self.git(["-C".to_string(), path, "rev-parse".to_string()]).await {
            Ok(output) if output.success() => Ok(true),
            Ok(output) => {
                debug!("git output: {}", output.stdout);
                debug!("git error output: {}", output.stderr);
                Ok(false)
            }
            Err(err) if err.is_interrupted() => Err(err),
            Err(err) => {
                warn!("{err}");
                Ok(false)
            }
        }
    }

    /// Lists the global configuration. A non-zero exit (for example a
    /// missing `~/.gitconfig` on a fresh install) is logged and treated as an
    /// empty configuration.
    pub async fn list_global(&self) -> Result<LiveConfigSnapshot, ProcessError> {
        let output = self.git(["config", "--global", "-l"]).await?;
        if !output.success() {
            info!(
                "git config exited with status: {}, stdout: {}, stderr: {}",
                output.exit_code, output.stdout, output.stderr
            );
            return Ok(LiveConfigSnapshot::new());
        }
        Ok(LiveConfigSnapshot::parse(&output.stdout))
    }

    /// Writes one global value. A non-zero exit is returned to the caller,
    /// not turned into an error.
    pub async fn set_global(&self, property: &GitProperty) -> Result<CliOutput, ProcessError> {
        info!("setting global git config {}", property.key());
        // Values may be client secrets.
        let request = self
            .request(["config", "--global", property.key(), property.value()])
            .redact_arg(3);
        let output = self.runner.execute(request).await?;
        if !output.success() {
            warn!(
                "failed to set {} (exit code {}): {}",
                property.key(),
                output.exit_code,
                output.stderr.trim_end()
            );
        }
        Ok(output)
    }
}
