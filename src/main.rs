use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use initai::{api, config::Config};
use initai_core::{PackageError, PackageLibrary, PackageNode};

#[derive(Parser)]
#[command(name = "initai")]
#[command(about = "Catalog and archive server for LLM framework initialization packages")]
struct Cli {
    /// Package tree root (overrides INITAI_PACKAGES_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<std::net::IpAddr>,
    },
    /// Print the package catalog as JSON
    Catalog {
        /// Tenant to list (defaults to the configured tenant)
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Build a package archive and write it to disk
    Pack {
        framework: String,
        scope: String,
        /// LLM variant; the universal package when omitted
        llm: Option<String>,

        /// Output file (defaults to the archive's download filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for data-printing commands) or stdout,
/// then record which package tree this process serves.
fn init_tracing(use_stderr: bool, config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "initai=debug,initai_core=debug,tower_http=debug".into()),
    );

    let fmt_layer = tracing_subscriber::fmt::layer();
    if use_stderr {
        // Keep stdout clean for JSON output and archive paths
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }

    tracing::debug!("{}", config.summary());
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Serving packages for tenant '{}' from {}",
        config.tenant,
        config.packages_root.display()
    );
    if !config.packages_root.is_dir() {
        tracing::warn!(
            "Package root {} does not exist; the catalog will be empty",
            config.packages_root.display()
        );
    }

    let app = api::create_router(api::AppState::from_config(&config));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("initai server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn library(config: &Config) -> PackageLibrary {
    PackageLibrary::open(config.packages_root.clone()).with_tenant(config.tenant.clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(
        cli.command,
        Some(Commands::Catalog { .. }) | Some(Commands::Pack { .. })
    );
    let mut config = Config::from_env()?;
    if let Some(root) = cli.root {
        config.packages_root = root;
    }
    init_tracing(use_stderr, &config);

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await?;
        }
        Some(Commands::Catalog { tenant }) => {
            let tenant = tenant.unwrap_or_else(|| config.tenant.clone());
            let catalog = library(&config).build_catalog(&tenant)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Some(Commands::Pack {
            framework,
            scope,
            llm,
            output,
        }) => {
            let node = PackageNode::from_request(config.tenant.clone(), framework, scope, llm);
            let archive = library(&config).download(&node).map_err(|e| match e {
                PackageError::NotFound(_) | PackageError::Empty(_) => {
                    anyhow::anyhow!("{} (package root: {})", e, config.packages_root.display())
                }
                other => other.into(),
            })?;

            let output = output.unwrap_or_else(|| PathBuf::from(&archive.filename));
            std::fs::write(&output, &archive.bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} ({} bytes)", output.display(), archive.bytes.len());
        }
        None => serve(config).await?,
    }

    Ok(())
}
