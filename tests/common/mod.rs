#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

// Keep in sync with src/exif_parser/test_support.rs
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

fn ascii(text: &str) -> Value {
    Value::Ascii(vec![text.as_bytes().to_vec()])
}

/// TIFF-structured EXIF carrying a GPS position and a capture time.
pub fn gps_exif(lat: f64, lon: f64, taken: &str) -> Vec<u8> {
    let fields = [
        (Tag::GPSLatitudeRef, ascii(if lat < 0.0 { "S" } else { "N" })),
        (Tag::GPSLatitude, Value::Rational(to_dms(lat))),
        (Tag::GPSLongitudeRef, ascii(if lon < 0.0 { "W" } else { "E" })),
        (Tag::GPSLongitude, Value::Rational(to_dms(lon))),
        (Tag::DateTimeOriginal, ascii(taken)),
    ]
    .map(|(tag, value)| Field { tag, ifd_num: In::PRIMARY, value });

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut out = Cursor::new(Vec::new());
    writer.write(&mut out, true).expect("write exif");
    out.into_inner()
}

pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    }))
}

pub fn encode_jpeg(img: &DynamicImage) -> Vec<u8> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .encode_image(&img.to_rgb8())
        .expect("encode jpeg");
    out
}

/// Inserts an APP1 EXIF segment directly after the JPEG SOI marker.
pub fn splice_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    let len = u16::try_from(2 + 6 + tiff.len()).expect("exif fits in APP1");
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn write_geotagged_jpeg(path: &Path, width: u32, height: u32, lat: f64, lon: f64) {
    let jpeg = encode_jpeg(&gradient(width, height));
    let tagged = splice_exif(&jpeg, &gps_exif(lat, lon, "2023:08:15 10:30:00"));
    std::fs::write(path, tagged).expect("write jpeg");
}

pub fn write_plain_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(&gradient(width, height))).expect("write jpeg");
}
