mod cache;
mod config;
mod docs;
mod error;
mod frontmatter;
mod model;
mod nav;
mod render;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::RenderCache;
use config::Config;

#[derive(Debug, Parser)]
#[command(name = "bodhi-docs", version, about = "Build the Bodhi docs sidebar and pages")]
struct Cli {
    /// Root of the markdown docs tree.
    #[arg(long, env = "BODHI_DOCS_DIR")]
    docs_dir: PathBuf,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the navigation tree as JSON.
    Nav,
    /// Print document details grouped by folder.
    List {
        /// Only list documents under this folder.
        #[arg(long)]
        slug: Option<String>,
    },
    /// Print the sort order of a document or folder.
    Order { slug: String },
    /// Render a document to HTML.
    Render {
        slug: String,
        /// Emit the page details alongside the HTML as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli.docs_dir)?;
    info!(docs_dir = %config.docs_dir().display(), "configuration loaded");

    let root = config.docs_dir();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Nav => {
            let tree = nav::build_nav_tree(root);
            write_json(&mut out, &tree, cli.pretty)?;
        }
        Command::List { slug } => {
            let groups = docs::get_docs_for_slug(root, slug.as_deref());
            info!(groups = groups.len(), "documents listed");
            write_json(&mut out, &groups, cli.pretty)?;
        }
        Command::Order { slug } => {
            writeln!(out, "{}", docs::get_path_order(root, &slug))?;
        }
        Command::Render { slug, json } => {
            let cache = RenderCache::new();
            let page = render::render_doc(root, &slug, &cache)?;
            if json {
                write_json(&mut out, &page, cli.pretty)?;
            } else {
                write!(out, "{}", page.html)?;
            }
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(
    out: &mut impl Write,
    value: &T,
    pretty: bool,
) -> Result<(), error::AppError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out).map_err(|source| error::AppError::Io {
        path: "<stdout>".to_string(),
        source,
    })?;
    Ok(())
}
