//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version = "0.1.0")]
#[command(about = "Content store and markdown renderer for a portfolio site", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Call a query or mutation, e.g. `projects:getAll`
    Call {
        /// Function path
        path: String,

        /// Arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,

        /// Call through the mutation entry point
        #[arg(short, long)]
        mutation: bool,
    },

    /// List the documents of a content module
    List {
        /// Module name (projects, neonProjects, photography, pixelGallery, blog, testingData)
        #[arg(default_value = "projects")]
        module: String,
    },

    /// Render a markdown file to HTML
    Render {
        /// Markdown file
        file: PathBuf,
    },

    /// Insert sample projects into an empty store
    Seed,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());
            let port = port.unwrap_or(folio.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(folio, &ip, port).await?;
        }

        Commands::Call {
            path,
            args,
            mutation,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let value = folio_rs::commands::call::run(&folio, &path, args.as_deref(), mutation)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::List { module } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &module)?;
        }

        Commands::Render { file } => {
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            println!("{}", folio_rs::commands::render::run(&file)?);
        }

        Commands::Seed => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let count = folio_rs::commands::seed::run(&folio)?;
            println!("Seeded {} projects", count);
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
