// src/main.rs
use anyhow::{Context, Result, bail};
use clap::Parser;
use color_studio::services::analysis_client::DEFAULT_ENDPOINT;
use color_studio::services::{HttpAnalysisClient, ImageProcessor, MemoryClipboard};
use color_studio::{Controller, DispatchOutcome, Selection, render_page};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "color-studio",
    version,
    about = "Analyze a room photo and render the suggested color palette"
)]
struct Cli {
    /// Room photo to analyze
    image: PathBuf,

    /// Analysis endpoint
    #[arg(long, env = "COLOR_STUDIO_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Write the page here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Emit the document snapshot as JSON instead of HTML
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    info!("Starting Color Studio against {}", cli.endpoint);

    let controller = Controller::new(
        Arc::new(HttpAnalysisClient::new(cli.endpoint.clone())),
        Arc::new(MemoryClipboard::new()),
    );

    let mut updates = controller.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().state;
            debug!("Document updated, state {:?}", state);
        }
    });

    let file = ImageProcessor::new()
        .load_file(&cli.image)
        .await
        .with_context(|| format!("Failed to read {}", cli.image.display()))?;

    match controller.select_file(file).await? {
        Selection::Previewed => {}
        other => bail!("Image was not accepted: {:?}", other),
    }

    let outcome = controller.dispatch().await?;
    let document = controller.snapshot();

    let output = if cli.json {
        serde_json::to_string_pretty(&document).context("Failed to serialize document")?
    } else {
        render_page(&document)
    };

    match &cli.out {
        Some(path) => {
            tokio::fs::write(path, output)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", output),
    }

    match outcome {
        DispatchOutcome::Rendered => Ok(()),
        DispatchOutcome::Failed(message) => bail!("Analysis failed: {}", message),
        DispatchOutcome::Discarded => bail!("Analysis was discarded"),
    }
}
