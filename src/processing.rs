use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::constants::PHOTOS_DIR_NAME;
use crate::exif_parser::GpsExtractor;
use crate::image_processing::{heic_supported, render_derivative};
use crate::map::{MapBuilder, MapOptions};
use crate::photo::{is_heif_path, Derivatives, PhotoRecord};
use crate::scanner::scan_images;
use crate::settings::Settings;

/// How a run ended when it did not fail outright.
#[derive(Debug)]
pub enum Outcome {
    /// No supported image files under the input folder
    NoPhotos,
    /// Supported files exist, none carries GPS tags
    NoGps { files: usize },
    Written(MapSummary),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Written(_) => 0,
            Outcome::NoPhotos => 1,
            Outcome::NoGps { .. } => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapSummary {
    pub output: PathBuf,
    pub photos_dir: PathBuf,
    pub markers: usize,
    pub center: [f64; 2],
    pub stats: ProcessingStats,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub heic_files: usize,
    pub with_gps: usize,
    pub without_gps: usize,
    pub rendered: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

impl ProcessingStats {
    fn log(&self) {
        let secs = self.elapsed.as_secs_f64();
        let avg_ms = if self.total_files > 0 {
            secs * 1000.0 / self.total_files as f64
        } else {
            0.0
        };

        tracing::info!("Processing statistics:");
        tracing::info!("   Files checked:      {}", self.total_files);
        tracing::info!("   With GPS data:      {}", self.with_gps);
        tracing::info!("   Without GPS:        {}", self.without_gps);
        tracing::info!("   HEIC files:         {}", self.heic_files);
        tracing::info!("   Photos on the map:  {}", self.rendered);
        if self.skipped > 0 {
            tracing::info!("   Skipped (render):   {}", self.skipped);
        }
        tracing::info!("   Processing time:    {:.2} s ({:.1} ms per file)", secs, avg_ms);
    }
}

/// Where the map document and its resized photos go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub html: PathBuf,
    pub photos_dir: PathBuf,
}

impl OutputLayout {
    /// Absolute HTML path plus the `map_photos` directory next to it.
    pub fn resolve(output: &Path) -> Result<Self> {
        let html = if output.is_absolute() {
            output.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to determine current directory")?
                .join(output)
        };
        let parent = html
            .parent()
            .map(Path::to_path_buf)
            .context("Output path has no parent directory")?;

        Ok(Self {
            photos_dir: parent.join(PHOTOS_DIR_NAME),
            html,
        })
    }
}

/// Scans, extracts, renders and writes the map.
pub fn run(settings: &Settings) -> Result<Outcome> {
    settings.validate()?;
    let start_time = Instant::now();
    let layout = OutputLayout::resolve(&settings.output)?;

    tracing::info!("Scanning photos directory: {}", settings.input.display());
    let files = scan_images(&settings.input, Some(&layout.photos_dir))?;
    if files.is_empty() {
        return Ok(Outcome::NoPhotos);
    }

    let heic_files = files.iter().filter(|p| is_heif_path(p)).count();
    if heic_files > 0 && !heic_supported() {
        tracing::warn!(
            "{} HEIC/HEIF files found but HEIC decoding is not built in; their map photos will be skipped",
            heic_files
        );
        tracing::warn!("   Install libheif and rebuild with: cargo build --release --features heic");
    }

    tracing::info!("Found {} photos. Reading GPS tags...", files.len());
    let extractor = GpsExtractor::default();
    let records: Vec<PhotoRecord> = files
        .par_iter()
        .filter_map(|path| extractor.extract_file(path))
        .collect();

    if records.is_empty() {
        return Ok(Outcome::NoGps { files: files.len() });
    }

    let created_photos_dir = !layout.photos_dir.exists();
    std::fs::create_dir_all(&layout.photos_dir)
        .with_context(|| format!("Failed to create {}", layout.photos_dir.display()))?;

    tracing::info!("{} photos have GPS data. Creating map photos...", records.len());
    let rendered: Vec<(&PhotoRecord, Option<Derivatives>)> = records
        .par_iter()
        .enumerate()
        .map(|(i, record)| (record, render_photo(record, i + 1, &layout.photos_dir, settings)))
        .collect();

    let mut builder = MapBuilder::new(MapOptions {
        zoom: settings.zoom,
        cluster: settings.cluster,
        thumb_size: settings.thumb_size,
    });
    let mut markers = 0;
    for (record, derivatives) in &rendered {
        if let Some(derivatives) = derivatives {
            builder.add_photo(record, derivatives);
            markers += 1;
        }
    }
    if markers == 0 {
        if created_photos_dir {
            // remove_dir leaves it alone unless empty
            let _ = std::fs::remove_dir(&layout.photos_dir);
        }
        bail!("None of the {} photos with GPS data could be rendered", records.len());
    }

    let map = builder.build()?;
    map.save(&layout.html)?;

    let stats = ProcessingStats {
        total_files: files.len(),
        heic_files,
        with_gps: records.len(),
        without_gps: files.len() - records.len(),
        rendered: markers,
        skipped: records.len() - markers,
        elapsed: start_time.elapsed(),
    };
    stats.log();

    Ok(Outcome::Written(MapSummary {
        output: layout.html,
        photos_dir: layout.photos_dir,
        markers,
        center: map.center,
        stats,
    }))
}

/// Writes the large and thumbnail copies of one photo. A failure is logged,
/// leftovers are removed and the photo is left off the map.
fn render_photo(record: &PhotoRecord, index: usize, photos_dir: &Path, settings: &Settings) -> Option<Derivatives> {
    let names = Derivatives::for_photo(index, &record.path);
    let large = photos_dir.join(&names.large);
    let thumb = photos_dir.join(&names.thumbnail);

    let result = render_derivative(&record.path, &large, settings.large_size)
        .and_then(|_| render_derivative(&record.path, &thumb, settings.thumb_size));

    match result {
        Ok(_) => {
            tracing::debug!("Rendered {} -> {}", record.path.display(), names.large);
            Some(names)
        }
        Err(e) => {
            tracing::warn!("Skipping {}: {:#}", record.path.display(), e);
            let _ = std::fs::remove_file(&large);
            let _ = std::fs::remove_file(&thumb);
            None
        }
    }
}
