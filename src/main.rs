use clap::Parser;
use miette::Result;
use stipple::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => stipple::cli::render::run(args)?,
        Commands::Stops(args) => stipple::cli::stops::run(args)?,
        Commands::Completions(args) => stipple::cli::completions::run(args)?,
    }

    Ok(())
}
