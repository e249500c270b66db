use gitpolicy_utils_process::ProcessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// `git --version` could not be run or did not exit cleanly. Nothing was
    /// read or written.
    #[error("Git CLI tools unavailable or `{program}` not in PATH!")]
    GitUnavailable { program: String },

    #[error(transparent)]
    Process(#[from] ProcessError),

    /// A hosted server declared without a `URL` element was reached. Writes
    /// made earlier in the run stay applied.
    #[error("hosted server #{index} in the policy has no URL")]
    MissingServerUrl { index: usize },
}
