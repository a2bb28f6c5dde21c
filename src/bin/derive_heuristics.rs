//! Offline tool: symmetrize the interaction table and write the derived
//! knowledge base (base + max influence per bias) as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scorelytic_bias::bias::interactions::{
    derive_heuristics, load_base_table, load_interactions, parse_base_table, parse_interactions,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "derive-heuristics")]
#[command(about = "Derive the runtime bias knowledge base from base + interaction tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Base heuristic table (defaults to the compiled-in table)
    #[arg(long)]
    base: Option<PathBuf>,

    /// Pairwise interaction table (defaults to the compiled-in table)
    #[arg(long)]
    interactions: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let base = match &cli.base {
        Some(p) => load_base_table(p)?,
        None => parse_base_table(include_str!("../../data/bias_heuristics.json"))?,
    };
    let mut interactions = match &cli.interactions {
        Some(p) => load_interactions(p)?,
        None => parse_interactions(include_str!("../../data/bias_interactions.json"))?,
    };

    let before = interactions.len();
    let derived = derive_heuristics(&base, &mut interactions);
    info!(
        biases = derived.len(),
        pairs_in = before,
        pairs_symmetrized = interactions.len(),
        "derived bias heuristics"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&derived)?
    } else {
        serde_json::to_string(&derived)?
    };

    match &cli.out {
        Some(p) => {
            fs::write(p, json + "\n").with_context(|| format!("writing {}", p.display()))?;
            info!(path = %p.display(), "wrote derived table");
        }
        None => println!("{json}"),
    }
    Ok(())
}
