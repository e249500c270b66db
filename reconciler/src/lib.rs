mod cli;
mod error;
mod reconciler;
mod report;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
pub use cli::Cli;
pub use error::ReconcileError;
use gitpolicy_git_config::GitCli;
use gitpolicy_policy::GitPolicy;
use gitpolicy_utils_process::TokioProcessRunner;
pub use reconciler::Reconciler;
pub use report::ReconcileReport;
pub use report::format_report_json;
use supports_color::Stream;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Reads and parses a policy document from disk.
pub fn load_policy_file(path: &Path) -> anyhow::Result<GitPolicy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy at {}", path.display()))?;
    GitPolicy::from_xml_str(&content)
        .with_context(|| format!("failed to parse policy at {}", path.display()))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(supports_color::on_cached(Stream::Stderr).is_some())
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        policy,
        git,
        cwd,
        json,
        pretty,
    } = cli;

    init_tracing();

    let policy = load_policy_file(&policy)?;

    let cancellation = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupted, stopping git");
                cancellation.cancel();
            }
        }
    });

    let runner = Arc::new(TokioProcessRunner::with_cancellation(cancellation));
    let mut git_cli = GitCli::new(runner).program(git);
    if let Some(cwd) = cwd {
        git_cli = git_cli.cwd(cwd);
    }

    let result = Reconciler::new(git_cli, policy).run().await;
    ctrl_c.abort();
    let report = result?;

    if json {
        println!("{}", format_report_json(&report, pretty)?);
    }
    Ok(())
}
