//! Command-line arguments for the `coderelay` binary.
//!
//! Every server setting can also come from the environment, so the binary
//! runs unchanged under a process manager that only sets `PORT`.

use std::path::PathBuf;

use clap::{Args, Parser};

/// HTTP backend relaying chats to hosted code models.
#[derive(Debug, Parser)]
#[command(name = "coderelay", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Detailed output (-v for debug, -vv for trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,
}

/// Settings for the HTTP server and its backing services.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite database file, created if missing.
    #[arg(long, env = "CODERELAY_DATABASE", default_value = "coderelay.db")]
    pub database: PathBuf,

    /// Directory of static assets; `index.html` here replaces the built-in landing page.
    #[arg(long, env = "CODERELAY_WEB_DIR", default_value = "static")]
    pub web_dir: PathBuf,

    /// Optional TOML tuning file.
    #[arg(long, env = "CODERELAY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::parse_from([
            "coderelay",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--database",
            "/tmp/chats.db",
            "--config",
            "tuning.toml",
            "-vv",
            "--otel",
        ]);
        assert_eq!(cli.serve.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cli.serve.database, PathBuf::from("/tmp/chats.db"));
        assert_eq!(cli.serve.config, Some(PathBuf::from("tuning.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.otel);
        assert!(!cli.log_json);
    }
}
