use super::generic::{get_datetime_from_exif, get_gps_coord};
use super::{GpsSource, GpsTags};
use exif::Tag;
use std::io::Cursor;

/// Primary strategy: the EXIF tag dictionary as parsed by `kamadak-exif`.
///
/// Handles every container the reader knows (JPEG, TIFF, HEIF, PNG, WebP)
/// and keeps whatever survived a partially broken IFD chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTagSource;

impl GpsSource for ExifTagSource {
    fn name(&self) -> &'static str {
        "exif-tags"
    }

    fn extract(&self, bytes: &[u8]) -> Option<GpsTags> {
        let mut cursor = Cursor::new(bytes);
        let mut reader = exif::Reader::new();
        reader.continue_on_error(true); // Tolerate non-standard EXIF structures

        let exif = match reader.read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(exif::Error::PartialResult(partial)) => {
                let (exif, errors) = partial.into_inner();
                tracing::trace!("EXIF read with {} recoverable errors", errors.len());
                exif
            }
            Err(_) => return None,
        };

        let latitude = get_gps_coord(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
        let longitude = get_gps_coord(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

        Some(GpsTags {
            latitude,
            longitude,
            timestamp: get_datetime_from_exif(&exif),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif_parser::test_support::{gradient, jpeg_with_exif, ExifSpec};

    #[test]
    fn reads_position_and_original_time_from_jpeg() {
        let spec = ExifSpec::gps(37.5, 127.0)
            .with_original_time("2022:10:01 08:00:00")
            .with_modified_time("2023:01:01 00:00:00");
        let jpeg = jpeg_with_exif(&gradient(16, 8), Some(&spec));

        let tags = ExifTagSource.extract(&jpeg).unwrap();
        assert!((tags.latitude - 37.5).abs() < 1e-6);
        assert!((tags.longitude - 127.0).abs() < 1e-6);
        assert_eq!(tags.timestamp.as_deref(), Some("2022-10-01 08:00:00"));
    }

    #[test]
    fn southern_and_western_references_are_negative() {
        let spec = ExifSpec::gps(-22.9068, -43.1729);
        let jpeg = jpeg_with_exif(&gradient(8, 8), Some(&spec));

        let tags = ExifTagSource.extract(&jpeg).unwrap();
        assert!((tags.latitude + 22.9068).abs() < 1e-6);
        assert!((tags.longitude + 43.1729).abs() < 1e-6);
    }

    #[test]
    fn falls_back_to_datetime_tag() {
        let spec = ExifSpec::gps(1.0, 2.0).with_modified_time("2019:12:31 23:59:59");
        let jpeg = jpeg_with_exif(&gradient(8, 8), Some(&spec));

        let tags = ExifTagSource.extract(&jpeg).unwrap();
        assert_eq!(tags.timestamp.as_deref(), Some("2019-12-31 23:59:59"));
    }

    #[test]
    fn jpeg_without_gps_yields_nothing() {
        let spec = ExifSpec::default().with_original_time("2022:10:01 08:00:00");
        let jpeg = jpeg_with_exif(&gradient(8, 8), Some(&spec));
        assert!(ExifTagSource.extract(&jpeg).is_none());
        assert!(ExifTagSource.extract(&jpeg_with_exif(&gradient(8, 8), None)).is_none());
    }

    #[test]
    fn non_image_bytes_yield_nothing() {
        assert!(ExifTagSource.extract(b"").is_none());
        assert!(ExifTagSource.extract(b"\xFF\xD8\xFF\xE1\x00").is_none());
    }
}
