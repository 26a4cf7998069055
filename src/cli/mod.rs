//! CLI module for the humor pipeline service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `candidates`: print the configured model candidate order

pub mod candidates;
pub mod serve;

use clap::{Parser, Subcommand};

/// Humor Pipeline - multi-step caption generation over LLM providers
#[derive(Parser)]
#[command(name = "humor-pipeline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline API server
    Serve,

    /// Print the models tried, in order, for a step
    Candidates(candidates::CandidatesArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates_flag() {
        let cli = Cli::try_parse_from(["humor-pipeline", "candidates", "--image"]).unwrap();
        match cli.command {
            Command::Candidates(args) => assert!(args.image),
            Command::Serve => panic!("expected candidates"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["humor-pipeline", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }
}
