use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started (not found, permission denied, ...).
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for `{program}` to exit: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The runner's cancellation token fired before the child exited. The
    /// child has been killed by the time this is returned.
    #[error("interrupted while waiting for `{program}` to exit")]
    Interrupted { program: String },
}

impl ProcessError {
    pub fn program(&self) -> &str {
        match self {
            ProcessError::Spawn { program, .. }
            | ProcessError::Wait { program, .. }
            | ProcessError::Interrupted { program } => program,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, ProcessError::Interrupted { .. })
    }
}
