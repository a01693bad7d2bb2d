use anyhow::Result;
use clap::Parser;

use lrc_card::config;

mod cli;
mod pipeline;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lrc-card starting");

    match args.command {
        cli::Command::Parse(cmd) => pipeline::run_parse(cmd, &cfg),
        cli::Command::Lookup(cmd) => pipeline::run_lookup(cmd, &cfg),
        cli::Command::Play(cmd) => pipeline::run_play(cmd, &cfg),
        cli::Command::Catalog(cmd) => pipeline::run_catalog(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
