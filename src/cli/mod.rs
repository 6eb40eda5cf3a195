pub mod completions;
pub mod render;
pub mod stops;

use clap::{Parser, Subcommand};

/// stipple - Raster to drawable-record pipeline
#[derive(Parser, Debug)]
#[command(name = "stipple")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample an image and emit drawable records as JSON
    Render(render::RenderArgs),

    /// Inspect a stops file
    Stops(stops::StopsArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
