//! Builders for synthetic EXIF blobs and JPEGs used across unit tests.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;

#[derive(Debug, Clone, Default)]
pub struct ExifSpec {
    pub position: Option<(f64, f64)>,
    pub original_time: Option<String>,
    pub modified_time: Option<String>,
    pub orientation: Option<u16>,
}

impl ExifSpec {
    pub fn gps(lat: f64, lon: f64) -> Self {
        Self {
            position: Some((lat, lon)),
            ..Self::default()
        }
    }

    pub fn with_original_time(mut self, stamp: &str) -> Self {
        self.original_time = Some(stamp.to_string());
        self
    }

    pub fn with_modified_time(mut self, stamp: &str) -> Self {
        self.modified_time = Some(stamp.to_string());
        self
    }

    pub fn with_orientation(mut self, orientation: u16) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

fn to_dms(value: f64) -> Vec<Rational> {
    let abs = value.abs();
    let degrees = abs.trunc();
    let minutes = ((abs - degrees) * 60.0).trunc();
    let seconds = (abs - degrees - minutes / 60.0) * 3600.0;
    vec![
        Rational { num: degrees as u32, denom: 1 },
        Rational { num: minutes as u32, denom: 1 },
        Rational { num: (seconds * 10_000.0).round() as u32, denom: 10_000 },
    ]
}

fn field(tag: Tag, value: Value) -> Field {
    Field { tag, ifd_num: In::PRIMARY, value }
}

fn ascii(text: &str) -> Value {
    Value::Ascii(vec![text.as_bytes().to_vec()])
}

/// Raw TIFF-structured EXIF (no `Exif\0\0` prefix).
pub fn exif_blob(spec: &ExifSpec, little_endian: bool) -> Vec<u8> {
    let mut fields = Vec::new();
    if let Some((lat, lon)) = spec.position {
        fields.push(field(Tag::GPSLatitudeRef, ascii(if lat < 0.0 { "S" } else { "N" })));
        fields.push(field(Tag::GPSLatitude, Value::Rational(to_dms(lat))));
        fields.push(field(Tag::GPSLongitudeRef, ascii(if lon < 0.0 { "W" } else { "E" })));
        fields.push(field(Tag::GPSLongitude, Value::Rational(to_dms(lon))));
    }
    if let Some(ref stamp) = spec.original_time {
        fields.push(field(Tag::DateTimeOriginal, ascii(stamp)));
    }
    if let Some(ref stamp) = spec.modified_time {
        fields.push(field(Tag::DateTime, ascii(stamp)));
    }
    if let Some(orientation) = spec.orientation {
        fields.push(field(Tag::Orientation, Value::Short(vec![orientation])));
    }
    if fields.is_empty() {
        fields.push(field(Tag::Software, ascii("test")));
    }

    let mut writer = Writer::new();
    for f in &fields {
        writer.push_field(f);
    }
    let mut out = Cursor::new(Vec::new());
    writer.write(&mut out, little_endian).expect("write exif");
    out.into_inner()
}

/// Encodes `img` as JPEG and splices an APP1 EXIF segment right after SOI.
pub fn jpeg_with_exif(img: &DynamicImage, spec: Option<&ExifSpec>) -> Vec<u8> {
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, 90)
        .encode_image(&img.to_rgb8())
        .expect("encode jpeg");

    let Some(spec) = spec else {
        return encoded;
    };

    let tiff = exif_blob(spec, true);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("exif fits in APP1");

    let mut out = Vec::with_capacity(encoded.len() + tiff.len() + 10);
    out.extend_from_slice(&encoded[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&encoded[2..]);
    out
}

/// A small image with a horizontal gradient, so encoders have something to do.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    }))
}
