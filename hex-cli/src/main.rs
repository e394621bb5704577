//! Hex CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the game server
//! - review: Compare a recorded game with an engine's choices

mod engine;
mod review;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hex")]
#[command(about = "Hex rules engine, game server and game review")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game server
    Serve(server::ServerArgs),
    /// Review a recorded game with an external engine
    Review(review::ReviewArgs),
}

fn main() -> anyhow::Result<()> {
    // Stdout carries reports; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Review(args) => review::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_review_moves_conflict() {
        let result = Cli::try_parse_from([
            "hex", "review", "--moves", "a1", "--moves-file", "game.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["hex", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8002);
                assert_eq!(args.max_board_size, 19);
            }
            Commands::Review(_) => panic!("expected serve"),
        }
    }
}
