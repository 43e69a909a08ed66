use super::tiff::parse_gps;
use super::{GpsSource, GpsTags};
use image::{ImageDecoder, ImageReader};
use std::io::Cursor;

/// Fallback strategy: asks the image decoder for its embedded EXIF blob and
/// walks the GPS IFD by numeric key.
///
/// Catches files whose EXIF the tag reader rejects but the decoder still
/// hands over, e.g. PNG `eXIf` chunks or APP1 segments with broken IFD links.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedExifSource;

impl EmbeddedExifSource {
    fn exif_blob(bytes: &[u8]) -> Option<Vec<u8>> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?;
        let mut decoder = reader.into_decoder().ok()?;
        decoder.exif_metadata().ok().flatten()
    }
}

impl GpsSource for EmbeddedExifSource {
    fn name(&self) -> &'static str {
        "embedded-exif"
    }

    fn extract(&self, bytes: &[u8]) -> Option<GpsTags> {
        let blob = Self::exif_blob(bytes)?;
        parse_gps(&blob)
    }
}
