use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use photolapse::{config::Config, pipeline::LapseEngine, sequence::Direction};

#[derive(Parser)]
#[command(
    name = "photolapse",
    version,
    about = "Assemble a folder of photos into a date-ordered timelapse video",
    long_about = "Photolapse reads the capture time and orientation of every photo in a \
directory, sorts the batch chronologically, letterboxes each photo onto a fixed canvas, \
and encodes the result as a single H.264 video."
)]
struct Cli {
    /// Directory containing source photos (JPEG or PNG)
    #[arg(short, long)]
    photos: PathBuf,

    /// Output video file path
    #[arg(short, long)]
    output: PathBuf,

    /// Playback order (ascending = oldest first, descending = newest first)
    #[arg(short, long)]
    direction: Option<String>,

    /// Frames per second for the output video
    #[arg(short, long)]
    fps: Option<u32>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Photolapse v{}", env!("CARGO_PKG_VERSION"));
    info!("Photos: {:?}", cli.photos);
    info!("Output: {:?}", cli.output);

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(direction) = cli.direction {
        config.sequence.direction = direction
            .parse::<Direction>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(fps) = cli.fps {
        config.video.params.fps = fps;
    }
    config.validate()?;

    // Create and run the pipeline
    let engine = LapseEngine::new(config);

    info!("Starting assembly...");
    let artifact = engine.run(&cli.photos, &cli.output).await?;

    info!(
        "Done! {} frames at {} fps ({}) -> {:?}",
        artifact.frame_count, artifact.fps, artifact.direction, artifact.path
    );
    Ok(())
}
