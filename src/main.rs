use anyhow::Result;
use clap::Parser;

use pl_transpile::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.execute().await
}
