mod config;
mod error;
mod guard;

use std::path::PathBuf;

use bodhi_common::api::{AppStatus, Role};
use bodhi_common::client::BodhiClient;
use bodhi_common::flags::FlagStore;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use guard::{AppInitializer, GuardOptions};

#[derive(Debug, Parser)]
#[command(name = "app-guard", version, about = "Decide where a Bodhi page load should land")]
struct Cli {
    /// Bodhi server base URL.
    #[arg(long, env = "BODHI_URL")]
    url: Option<String>,

    /// Setup flags file.
    #[arg(long, env = "BODHI_FLAGS_PATH")]
    flags_path: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the guard for one page and print the resulting state as JSON.
    Check {
        /// Status the page renders in: setup, resource-admin or ready.
        #[arg(long)]
        allowed_status: Option<AppStatus>,
        /// The page needs a logged-in user.
        #[arg(long)]
        authenticated: bool,
        /// Lowest role allowed on the page.
        #[arg(long, requires = "authenticated")]
        min_role: Option<Role>,
    },
    /// Record that the download-models page has been shown.
    MarkModelsShown,
    /// Clear all persisted setup flags.
    ResetFlags,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.url.as_deref(), cli.flags_path);
    info!(
        base_url = %config.client.base_url,
        flags_path = %config.flags_path.display(),
        "configuration loaded"
    );
    let store = FlagStore::new(config.flags_path.clone());

    match cli.command {
        Command::Check {
            allowed_status,
            authenticated,
            min_role,
        } => {
            let flags = store.load().await;
            let client = BodhiClient::new(config.client)?;
            let options = GuardOptions {
                allowed_status,
                authenticated,
                min_role,
            };
            let mut initializer = AppInitializer::new(client, options, flags);
            let state = initializer.run().await;
            let json = if cli.pretty {
                serde_json::to_string_pretty(state)?
            } else {
                serde_json::to_string(state)?
            };
            println!("{json}");
        }
        Command::MarkModelsShown => {
            let flags = store.mark_models_page_shown().await?;
            info!(models_page_shown = flags.models_page_shown, "flags updated");
        }
        Command::ResetFlags => {
            store.reset().await?;
            info!("flags reset");
        }
    }
    Ok(())
}
