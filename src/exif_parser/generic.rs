use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use std::io::Cursor;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const DISPLAY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts degrees/minutes/seconds to signed decimal degrees.
///
/// The result is negative when `reference` starts with `S` or `W`. Returns `None` if any component is not a finite number.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: &str) -> Option<f64> {
    if !(degrees.is_finite() && minutes.is_finite() && seconds.is_finite()) {
        return None;
    }

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    match reference.trim().chars().next() {
        Some('S') | Some('W') => Some(-decimal),
        _ => Some(decimal),
    }
}

/// Reads a DMS triple plus its hemisphere reference from a parsed EXIF block.
pub fn get_gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let coord = exif.get_field(coord_tag, In::PRIMARY)?;
    let reference = exif.get_field(ref_tag, In::PRIMARY)?;

    let Value::Rational(ref parts) = coord.value else {
        return None;
    };
    if parts.len() != 3 || parts.iter().any(|r| r.denom == 0) {
        return None;
    }

    let reference = ascii_value(&reference.value)?;
    dms_to_decimal(parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64(), &reference)
}

/// Capture time: DateTimeOriginal first, then the generic DateTime tag.
pub fn get_datetime_from_exif(exif: &exif::Exif) -> Option<String> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .filter_map(|tag| exif.get_field(tag, In::PRIMARY))
        .find_map(|field| ascii_value(&field.value).and_then(|raw| normalize_timestamp(&raw)))
}

/// Reformats an EXIF `YYYY:MM:DD HH:MM:SS` stamp for display.
///
/// Stamps in any other shape are kept as written; blank ones are dropped.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }

    match NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT) {
        Ok(dt) => Some(dt.format(DISPLAY_DATETIME_FORMAT).to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

fn ascii_value(value: &Value) -> Option<String> {
    let Value::Ascii(ref strings) = *value else {
        return None;
    };
    let first = strings.first()?;
    std::str::from_utf8(first).ok().map(str::to_string)
}

/// Reads the EXIF orientation (1-8) of an encoded image, defaulting to 1.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let mut reader = Reader::new();
    reader.continue_on_error(true);

    let exif = match reader.read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::PartialResult(partial)) => partial.into_inner().0,
        Err(_) => return 1,
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Rotates/flips an image so it displays upright for the given EXIF orientation.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
