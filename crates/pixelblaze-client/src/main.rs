//! `pixelblaze`: terminal remote for a Pixelblaze LED controller.
//!
//! # Usage
//!
//! ```text
//! pixelblaze [OPTIONS] [COMMAND]
//!
//! Commands:
//!   patterns            Print the stored patterns, sorted by name
//!   select <ID>         Activate a pattern (and make it the startup pattern)
//!   brightness <VALUE>  Set brightness, 0.0 to 1.0
//!   interactive         Menu-driven shell (default)
//!
//! Options:
//!   --host <HOST>       Device hostname or IP; remembered for next time
//!   --config <PATH>     Settings file [default: platform config dir]
//!   --timeout <SECS>    Response timeout [default: from settings, 5]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable             | Option      |
//! |----------------------|-------------|
//! | `PIXELBLAZE_HOST`    | `--host`    |
//! | `PIXELBLAZE_CONFIG`  | `--config`  |
//! | `PIXELBLAZE_TIMEOUT` | `--timeout` |
//! | `RUST_LOG`           | log filter; falls back to `log_level` in the settings file |
//!
//! # Startup
//!
//! ```text
//! main()
//!  └─ load settings file       -- FileConfigStore
//!  └─ init tracing             -- RUST_LOG or [general] log_level
//!  └─ resolve device URL       -- --host, stored URL, or ask the user
//!  └─ PixelblazeClient::new()  -- nothing is opened yet
//!  └─ run command or Shell     -- first device call connects
//!  └─ client.close()
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixelblaze_client::application::shell::{ensure_device_url, parse_brightness, Shell};
use pixelblaze_client::application::store::ConfigStore;
use pixelblaze_client::application::PixelblazeClient;
use pixelblaze_client::domain::config::{device_url, ClientConfig, DEVICE_URL_KEY};
use pixelblaze_client::infrastructure::network::WsConnector;
use pixelblaze_client::infrastructure::storage::config::GeneralConfig;
use pixelblaze_client::infrastructure::storage::FileConfigStore;
use pixelblaze_client::infrastructure::terminal::TerminalUi;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Terminal remote for a Pixelblaze LED controller.
#[derive(Debug, Parser)]
#[command(
    name = "pixelblaze",
    about = "List, activate and dim patterns on a Pixelblaze LED controller",
    version
)]
struct Cli {
    /// Device hostname or IP address (or a full ws:// URL).
    ///
    /// The resulting URL is stored in the settings file and reused when the
    /// option is omitted.
    #[arg(long, env = "PIXELBLAZE_HOST")]
    host: Option<String>,

    /// Path of the settings file.
    #[arg(long, env = "PIXELBLAZE_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds to wait for the device to answer.
    #[arg(long, env = "PIXELBLAZE_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
enum CliCommand {
    /// Print the stored patterns as `<id>\t<name>`, sorted by name.
    Patterns,
    /// Activate the pattern with this id.
    Select { id: String },
    /// Set the global brightness.
    Brightness {
        #[arg(value_parser = parse_brightness)]
        value: f64,
    },
    /// Menu-driven shell.
    Interactive,
}

impl Cli {
    /// Read timeout from `--timeout`, falling back to the settings file.
    fn read_timeout(&self, general: &GeneralConfig) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(general.read_timeout_secs))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Settings ──────────────────────────────────────────────────────────────
    let mut store = match &cli.config {
        Some(path) => FileConfigStore::open(path),
        None => FileConfigStore::open_default(),
    }
    .context("failed to load settings")?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the level stored in the settings file.
    let log_level = store.config().general.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    info!("settings loaded from {}", store.path().display());

    // ── Device URL ────────────────────────────────────────────────────────────
    let mut ui = TerminalUi::stdio();
    let url = match &cli.host {
        Some(host) => {
            let url = device_url(host);
            store
                .set(DEVICE_URL_KEY, &url)
                .context("failed to remember device URL")?;
            url
        }
        None => match ensure_device_url(&mut store, &mut ui)
            .await
            .context("failed to remember device URL")?
        {
            Some(url) => url,
            None => {
                info!("no device configured; exiting");
                return Ok(());
            }
        },
    };

    let config = ClientConfig {
        read_timeout: cli.read_timeout(&store.config().general),
        ..ClientConfig::new(url)
    };
    info!("using device {}", config.url);
    let mut client = PixelblazeClient::new(&config, Arc::new(WsConnector));

    // ── Command ───────────────────────────────────────────────────────────────
    match cli.command.clone().unwrap_or(CliCommand::Interactive) {
        CliCommand::Interactive => {
            let mut shell = Shell::new(client, ui);
            tokio::select! {
                () = shell.run() => {}
                _ = tokio::signal::ctrl_c() => info!("interrupted"),
            }
            shell.close().await;
        }
        command => {
            let result = run_command(&mut client, command).await;
            client.close().await;
            result?;
        }
    }

    Ok(())
}

/// Runs a one-shot subcommand against the device.
async fn run_command(client: &mut PixelblazeClient, command: CliCommand) -> anyhow::Result<()> {
    match command {
        CliCommand::Patterns => {
            let catalog = client.list_patterns().await.context("listing patterns")?;
            for pattern in &catalog {
                println!("{}\t{}", pattern.id, pattern.name);
            }
        }
        CliCommand::Select { id } => {
            client
                .set_pattern(&id)
                .await
                .with_context(|| format!("activating pattern {id}"))?;
        }
        CliCommand::Brightness { value } => {
            client
                .set_brightness(value)
                .await
                .context("setting brightness")?;
        }
        CliCommand::Interactive => {}
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["pixelblaze"]);

        // Assert
        assert_eq!(cli.host, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_cli_host_and_timeout_override() {
        let cli = Cli::parse_from(["pixelblaze", "--host", "10.0.0.5", "--timeout", "9"]);
        assert_eq!(cli.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.timeout, Some(9));
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["pixelblaze", "--config", "/tmp/pb.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pb.toml")));
    }

    #[test]
    fn test_cli_select_subcommand() {
        let cli = Cli::parse_from(["pixelblaze", "select", "abc123"]);
        assert_eq!(
            cli.command,
            Some(CliCommand::Select {
                id: "abc123".to_string()
            })
        );
    }

    #[test]
    fn test_cli_patterns_and_interactive_subcommands() {
        let cli = Cli::parse_from(["pixelblaze", "patterns"]);
        assert_eq!(cli.command, Some(CliCommand::Patterns));

        let cli = Cli::parse_from(["pixelblaze", "interactive"]);
        assert_eq!(cli.command, Some(CliCommand::Interactive));
    }

    #[test]
    fn test_cli_brightness_in_range() {
        let cli = Cli::parse_from(["pixelblaze", "brightness", "0.4"]);
        assert_eq!(cli.command, Some(CliCommand::Brightness { value: 0.4 }));
    }

    #[test]
    fn test_cli_brightness_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["pixelblaze", "brightness", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["pixelblaze", "brightness", "dim"]).is_err());
    }

    #[test]
    fn test_cli_zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["pixelblaze", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["pixelblaze", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn test_read_timeout_prefers_cli() {
        let general = GeneralConfig {
            read_timeout_secs: 7,
            ..GeneralConfig::default()
        };

        let from_cli = Cli::parse_from(["pixelblaze", "--timeout", "2"]).read_timeout(&general);
        let from_file = Cli::parse_from(["pixelblaze"]).read_timeout(&general);

        assert_eq!(from_cli, Duration::from_secs(2));
        assert_eq!(from_file, Duration::from_secs(7));
    }
}
