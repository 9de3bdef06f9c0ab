mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{kmeans, moran, neighbors, regionalize, run_all};

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Neighbors(args) => neighbors::run(&cli, args),
        Commands::Moran(args) => moran::run(&cli, args),
        Commands::Kmeans(args) => kmeans::run(&cli, args),
        Commands::Regionalize(args) => regionalize::run(&cli, args),
        Commands::Run(args) => run_all::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
