use clap::Parser;
use humor_pipeline::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Candidates(args) => cli::candidates::run(args).await,
    }
}
