#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::{commands::normalize_short_flags, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("detector_trainer=info".parse()?),
        )
        .init();

    let cli = Cli::parse_from(normalize_short_flags(std::env::args_os()));
    cli.run()
}
