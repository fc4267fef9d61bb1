//! CLI interface for Parrot
//!
//! Configuration lives in the environment; the CLI only offers a few
//! overrides for local runs.

use clap::Parser;
use std::path::PathBuf;

/// Parrot Telegram AI relay bot
///
/// Receives Telegram messages, forwards them with a short rolling history
/// to an LLM over OpenRouter, and relays the reply back to the chat.
#[derive(Parser, Debug)]
#[command(name = "parrot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Override the health server port
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Path to the known-users file
    #[arg(long, value_name = "PATH")]
    pub users_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_parses() {
        let cli = Cli::parse_from(["parrot"]);
        assert!(cli.log.is_none());
        assert!(cli.port.is_none());
        assert!(cli.users_file.is_none());
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::parse_from([
            "parrot",
            "--log",
            "debug",
            "--port",
            "9090",
            "--users-file",
            "/tmp/users.json",
        ]);
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert_eq!(cli.port, Some(9090));
        assert_eq!(cli.users_file, Some(PathBuf::from("/tmp/users.json")));
    }
}
