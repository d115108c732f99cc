//! MoreData CLI
//!
//! Command-line demos for MoreData live result sets

use clap::{Parser, Subcommand};

mod commands;
mod generator;
mod models;

#[derive(Debug, Parser)]
#[command(name = "moredata")]
#[command(about = "MoreData - live query demos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Watch a stream of generated gossip through a live result set
    Drama(commands::drama::DramaArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drama(args) => commands::drama::execute(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
