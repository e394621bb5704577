//! Server command - start the game server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to hex-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use hex_server::{run_server, ServerConfig, DEFAULT_MAX_BOARD_SIZE};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// Directory containing the web client
    #[arg(long, default_value = "public")]
    pub static_dir: PathBuf,

    /// Largest board size a game may be created with
    #[arg(long, default_value_t = DEFAULT_MAX_BOARD_SIZE)]
    pub max_board_size: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!(
        "Starting Hex server on port {} (boards up to {}x{})",
        config.port,
        config.max_board_size,
        config.max_board_size
    );

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    if args.max_board_size == 0 {
        anyhow::bail!("--max-board-size must be at least 1");
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        max_board_size: args.max_board_size,
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(static_dir: &str, max_board_size: usize) -> ServerArgs {
        ServerArgs {
            port: 8002,
            static_dir: PathBuf::from(static_dir),
            max_board_size,
        }
    }

    #[test]
    fn test_configure_server_defaults() {
        let config = configure_server(&args("test_static", 19)).unwrap();
        assert_eq!(config.port, 8002);
        assert_eq!(config.static_dir, "test_static");
        assert_eq!(config.max_board_size, 19);
    }

    #[test]
    fn test_configure_server_rejects_zero_limit() {
        assert!(configure_server(&args("test_static", 0)).is_err());
    }

    #[test]
    fn test_validate_static_dir_nonexistent() {
        // Should not error, just warn
        assert!(validate_static_dir(Path::new("/nonexistent/path")).is_ok());
    }

    #[test]
    fn test_validate_static_dir_is_file() {
        let file = std::env::temp_dir().join(format!("hex-static-{}", std::process::id()));
        std::fs::write(&file, "not a directory").unwrap();

        let result = validate_static_dir(&file);
        std::fs::remove_file(&file).unwrap();
        assert!(result.is_err());
    }
}
