use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use tactics_core::{analyze_tactics, board_from_fen, AnalysisConfig, TacticalMotifs};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Positions to analyze, given as FEN strings
    fens: Vec<String>,

    /// File with one FEN per line, analyzed after any positional arguments
    #[arg(short, long)]
    input: Option<String>,

    /// Skip the cross-referencing pass that links motifs sharing squares
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_chains: bool,

    /// Geometry-only run: skip trapped pieces, mate threats, overloads and
    /// capturable defenders
    #[arg(long, action = clap::ArgAction::SetTrue)]
    basic: bool,

    /// Pretty-print the JSON output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    fen: String,
    motifs: TacticalMotifs,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut fens = args.fens.clone();
    if let Some(path) = &args.input {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading positions from {path}"))?;
        fens.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }
    anyhow::ensure!(!fens.is_empty(), "no positions given; pass FENs or --input");

    let config = AnalysisConfig {
        enable_chaining: !args.no_chains,
        enable_tier2: !args.basic,
    };

    log::info!("analyzing {} positions", fens.len());
    let reports = fens
        .into_par_iter()
        .map(|fen| {
            let board = board_from_fen(&fen)?;
            let motifs = analyze_tactics(&board, &config);
            Ok(Report { fen, motifs })
        })
        .collect::<Result<Vec<_>>>()?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{json}");
    Ok(())
}
