use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cushions::api::{self, AppState};
use cushions::layout::sidecar_path;
use cushions::models::UploadEvent;
use cushions::settings::{Settings, LAST_DIR_UPLOAD};
use cushions::trello::{Credentials, TrelloClient};
use cushions::upload::{Pacing, UploadPipeline, UploadRequest};
use cushions::workspace::Workspace;

const DEFAULT_PORT: u16 = 17020;
const PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "cushions")]
#[command(about = "Warm sketchbook for markdown notes, with kanban publishing")]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the studio server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Split a document into nodes and show where they sit
    Load { path: PathBuf },
    /// Publish a document as cards on a Trello board
    Publish {
        path: PathBuf,

        /// Board name
        #[arg(long)]
        board: Option<String>,

        /// List name
        #[arg(long)]
        list: Option<String>,
    },
    /// Check the stored Trello credentials
    Verify,
    /// Store Trello credentials
    Credentials { key: String, token: String },
}

/// Log filter: `RUST_LOG` wins, otherwise `COZY_DEBUG` picks between debug
/// (`1`, the default) and info (anything else).
fn init_tracing() {
    let debug = std::env::var("COZY_DEBUG")
        .map(|v| v.trim() == "1")
        .unwrap_or(true);
    let default_filter = if debug {
        "cushions=debug,tower_http=debug"
    } else {
        "cushions=info,tower_http=info"
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_settings(path: Option<PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Ok(Settings::open(path)),
        None => Settings::open_default(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = open_settings(cli.settings)?;
    tracing::debug!("Using settings at {}", settings.path().display());

    match cli.command.unwrap_or(Commands::Serve { port: DEFAULT_PORT }) {
        Commands::Serve { port } => serve(settings, port).await?,
        Commands::Load { path } => load(&path)?,
        Commands::Publish { path, board, list } => publish(&settings, path, board, list).await?,
        Commands::Verify => verify(&settings).await?,
        Commands::Credentials { key, token } => {
            settings.set_credentials(&Credentials::new(key, token))?;
            println!("Credentials saved to {}", settings.path().display());
        }
    }

    Ok(())
}

async fn serve(settings: Settings, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Cushions studio on port {}", port);

    let mut workspace = Workspace::new();
    if !workspace.restore_last_opened(&settings) {
        tracing::info!("No document to reopen, showing the welcome node");
    }

    let app = api::create_router(AppState::new(workspace, settings));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Cushions studio listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<()> {
    let mut workspace = Workspace::new();
    let nodes = workspace
        .open(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    for node in nodes {
        println!(
            "#{:<3} ({:>8.1}, {:>8.1})  {}",
            node.id,
            node.position.x,
            node.position.y,
            node.preview(PREVIEW_CHARS)
        );
    }
    println!();
    println!("{} nodes, layout: {}", nodes.len(), sidecar_path(path).display());
    Ok(())
}

async fn publish(
    settings: &Settings,
    path: PathBuf,
    board: Option<String>,
    list: Option<String>,
) -> anyhow::Result<()> {
    let mut request = UploadRequest::new(path.clone());
    if let Some(board) = board {
        request = request.with_board(board);
    }
    if let Some(list) = list {
        request = request.with_list(list);
    }

    let client = TrelloClient::new(settings.credentials());
    let (pipeline, mut events) = UploadPipeline::new(client, Pacing::default());
    let run = tokio::spawn(pipeline.run(request));

    while let Some(event) = events.recv().await {
        match event {
            UploadEvent::Progress { current, total } => println!("[{}/{}]", current, total),
            UploadEvent::Status { message } => println!("  {}", message),
            UploadEvent::Failed { message } => eprintln!("Upload failed: {}", message),
            _ => {}
        }
    }

    let summary = run.await.context("Upload task aborted")??;
    if let Err(e) = settings.set_directory_of(LAST_DIR_UPLOAD, &path) {
        tracing::warn!("Failed to record upload directory: {:#}", e);
    }

    println!(
        "Created {} cards, skipped {} duplicates",
        summary.created, summary.skipped
    );
    if !summary.board_url.is_empty() {
        println!("Board: {}", summary.board_url);
    }
    Ok(())
}

async fn verify(settings: &Settings) -> anyhow::Result<()> {
    let credentials = settings.credentials();
    if !credentials.is_complete() {
        println!("No Trello credentials stored. Run `cushions credentials <key> <token>`.");
        return Ok(());
    }

    let valid = TrelloClient::new(credentials).verify_credentials().await?;
    if valid {
        println!("Trello credentials are valid");
    } else {
        println!("Trello rejected the stored credentials");
    }
    Ok(())
}
