use clap::Parser;
use gitpolicy_reconciler::Cli;
use gitpolicy_reconciler::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli).await
}
