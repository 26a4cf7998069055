//! Candidates command - prints the fallback order a step would use

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{CandidateStrategy, ModelCandidateResolver};

#[derive(Args, Debug)]
pub struct CandidatesArgs {
    /// Resolve for an image-and-text step
    #[arg(long)]
    pub image: bool,

    /// Catalog model used by the direct strategy
    #[arg(long, default_value = "gemini-2.0-flash")]
    pub model: String,
}

/// Print the candidate list for the configured strategy
pub async fn run(args: CandidatesArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let resolver = config.llm.candidate_resolver()?;

    for line in render(&resolver, &args) {
        println!("{}", line);
    }

    Ok(())
}

fn render(resolver: &ModelCandidateResolver, args: &CandidatesArgs) -> Vec<String> {
    let strategy = match resolver.strategy() {
        CandidateStrategy::Table(_) => "table",
        CandidateStrategy::Direct => "direct",
    };
    let modality = if args.image { "imageAndText" } else { "textOnly" };

    let mut lines = vec![format!("strategy: {}, modality: {}", strategy, modality)];
    lines.extend(
        resolver
            .resolve(args.image, &args.model)
            .iter()
            .enumerate()
            .map(|(i, id)| format!("{}. {}", i + 1, id)),
    );
    lines
}
