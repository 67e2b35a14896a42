use anyhow::Result;
use clap::Parser;
use ledger_sim::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    cli.run().await
}
