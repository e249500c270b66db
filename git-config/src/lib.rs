//! Read and write git's global configuration by shelling out to the `git`
//! executable.

mod cli;
mod property;
mod snapshot;

pub use cli::DEFAULT_GIT_PROGRAM;
pub use cli::GitCli;
pub use property::GitProperty;
pub use snapshot::LiveConfigSnapshot;
