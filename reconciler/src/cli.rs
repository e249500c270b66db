use std::path::PathBuf;

use clap::Parser;
use gitpolicy_git_config::DEFAULT_GIT_PROGRAM;

/// Ensure the global git configuration carries the credential and TLS
/// settings described by a policy file, without touching values an operator
/// has opted out of.
#[derive(Parser, Debug)]
#[command(name = "gitpolicy", version)]
pub struct Cli {
    /// Policy document (XML) describing the desired configuration.
    #[arg(long = "policy", short = 'p', value_name = "FILE")]
    pub policy: PathBuf,

    /// git executable to invoke.
    #[arg(
        long = "git",
        value_name = "PROGRAM",
        env = "GITPOLICY_GIT",
        default_value = DEFAULT_GIT_PROGRAM
    )]
    pub git: String,

    /// Working directory for git invocations.
    #[arg(long = "cd", short = 'C', value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print the reconciliation report as JSON on stdout.
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Pretty-print the JSON report.
    #[arg(long = "pretty", default_value_t = false, requires = "json")]
    pub pretty: bool,
}
