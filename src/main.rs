use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use photo_gps_mapper::constants::PHOTOS_DIR_NAME;
use photo_gps_mapper::{run, Outcome, Settings};

const EXIT_FAILURE: u8 = 3;

/// Build an interactive map from the GPS tags of a photo folder.
/// Popups show a thumbnail that opens the full photo in a new tab.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Folder containing the photos (searched recursively)
    input_folder: PathBuf,
    /// Output HTML file [default: photo_map.html]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Maximum thumbnail edge in pixels [default: 480]
    #[arg(long)]
    thumb_size: Option<u32>,
    /// Maximum edge of the large copy in pixels [default: 2048]
    #[arg(long)]
    large_size: Option<u32>,
    /// Initial zoom level [default: 12]
    #[arg(long)]
    zoom: Option<u8>,
    /// Disable marker clustering
    #[arg(long, action)]
    no_cluster: bool,
    /// key = value config file; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, action)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::new(&self.input_folder);
        if let Some(ref config) = self.config {
            settings.apply_config_file(config)?;
        }
        if let Some(ref output) = self.output {
            settings.output = output.clone();
        }
        if let Some(size) = self.thumb_size {
            settings.thumb_size = size;
        }
        if let Some(size) = self.large_size {
            settings.large_size = size;
        }
        if let Some(zoom) = self.zoom {
            settings.zoom = zoom;
        }
        if self.no_cluster {
            settings.cluster = false;
        }
        Ok(settings)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.settings().and_then(|settings| run(&settings)) {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::from(outcome.exit_code() as u8)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Written(summary) => {
            println!("Map created: {} ({} photos)", summary.output.display(), summary.markers);
            println!(
                "Resized photos are stored in '{}'. Keep the HTML file and that folder together.",
                PHOTOS_DIR_NAME
            );
        }
        Outcome::NoPhotos => {
            eprintln!("No supported photo files found (JPG/JPEG/PNG/HEIC/HEIF).");
        }
        Outcome::NoGps { files } => {
            eprintln!(
                "None of the {} photos contain GPS data (location tagging may be turned off on the camera).",
                files
            );
        }
    }
}
