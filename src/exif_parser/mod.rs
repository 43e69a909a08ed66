pub mod embedded;
pub mod exif_tags;
pub mod generic;
pub mod tiff;

#[cfg(test)]
pub(crate) mod test_support;

use crate::photo::PhotoRecord;
use std::path::Path;

pub use embedded::EmbeddedExifSource;
pub use exif_tags::ExifTagSource;
pub use generic::{apply_orientation, dms_to_decimal, read_orientation};

/// Position and capture time as found by one extraction strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsTags {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<String>,
}

/// One way of pulling GPS data out of an encoded image.
///
/// Implementations never fail loudly: anything unreadable is `None`.
pub trait GpsSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, bytes: &[u8]) -> Option<GpsTags>;
}

/// Tries each source in order; the first one that finds a position wins.
pub struct GpsExtractor {
    sources: Vec<Box<dyn GpsSource>>,
}

impl Default for GpsExtractor {
    fn default() -> Self {
        Self::with_sources(vec![Box::new(ExifTagSource), Box::new(EmbeddedExifSource)])
    }
}

impl GpsExtractor {
    pub fn with_sources(sources: Vec<Box<dyn GpsSource>>) -> Self {
        Self { sources }
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Option<GpsTags> {
        self.sources.iter().find_map(|source| {
            let tags = source.extract(bytes)?;
            tracing::trace!(source = source.name(), "GPS found");
            Some(tags)
        })
    }

    /// Reads `path` and extracts its position. Unreadable files count as "no GPS".
    pub fn extract_file(&self, path: &Path) -> Option<PhotoRecord> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };

        match self.extract_bytes(&bytes) {
            Some(tags) => Some(PhotoRecord::new(path, tags)),
            None => {
                tracing::debug!("No GPS data in {}", path.display());
                None
            }
        }
    }
}
