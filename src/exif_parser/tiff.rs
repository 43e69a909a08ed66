//! Minimal TIFF/EXIF walker for raw EXIF blobs.
//!
//! Only follows IFD0 and the two sub-IFDs that matter here (GPS and Exif),
//! addressing GPS entries by their numeric keys. Every read is bounds
//! checked, so a truncated or hostile blob just yields `None`.

use super::generic::{dms_to_decimal, normalize_timestamp};
use super::GpsTags;

const EXIF_HEADER: &[u8] = b"Exif\0\0";

// IFD0
const TAG_DATETIME: u16 = 0x0132;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_GPS_IFD: u16 = 0x8825;
// Exif IFD
const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
// GPS IFD
const GPS_LATITUDE_REF: u16 = 1;
const GPS_LATITUDE: u16 = 2;
const GPS_LONGITUDE_REF: u16 = 3;
const GPS_LONGITUDE: u16 = 4;

const FORMAT_ASCII: u16 = 2;
const FORMAT_RATIONAL: u16 = 5;

/// EXIF byte order
#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    LittleEndian,
    BigEndian,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    tag: u16,
    format: u16,
    count: u32,
    /// Absolute position of the 4-byte value/offset field
    value_pos: usize,
}

struct Tiff<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> Tiff<'a> {
    fn parse(data: &'a [u8]) -> Option<Self> {
        let order = match data.get(0..2)? {
            b"II" => ByteOrder::LittleEndian,
            b"MM" => ByteOrder::BigEndian,
            _ => return None,
        };
        let tiff = Tiff { data, order };
        (tiff.u16_at(2)? == 42).then_some(tiff)
    }

    fn u16_at(&self, pos: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(pos..pos.checked_add(2)?)?.try_into().ok()?;
        Some(match self.order {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        })
    }

    fn u32_at(&self, pos: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(pos..pos.checked_add(4)?)?.try_into().ok()?;
        Some(match self.order {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        })
    }

    fn first_ifd(&self) -> Option<usize> {
        self.u32_at(4).map(|offset| offset as usize)
    }

    fn entries(&self, ifd: usize) -> Option<Vec<Entry>> {
        let count = self.u16_at(ifd)? as usize;
        let entries = (0..count)
            .map_while(|i| {
                let pos = ifd + 2 + i * 12;
                Some(Entry {
                    tag: self.u16_at(pos)?,
                    format: self.u16_at(pos + 2)?,
                    count: self.u32_at(pos + 4)?,
                    value_pos: pos + 8,
                })
            })
            .collect();
        Some(entries)
    }

    fn sub_ifd(&self, entries: &[Entry], tag: u16) -> Option<usize> {
        let entry = entries.iter().find(|e| e.tag == tag)?;
        self.u32_at(entry.value_pos).map(|offset| offset as usize)
    }

    fn ascii(&self, entry: &Entry) -> Option<String> {
        if entry.format != FORMAT_ASCII || entry.count == 0 {
            return None;
        }
        let len = entry.count as usize;
        let start = if len <= 4 {
            entry.value_pos
        } else {
            self.u32_at(entry.value_pos)? as usize
        };
        let raw = self.data.get(start..start.checked_add(len)?)?;
        let text = raw.split(|&b| b == 0).next().unwrap_or_default();
        std::str::from_utf8(text).ok().map(str::to_string)
    }

    /// Three unsigned rationals (degrees, minutes, seconds); zero denominators reject.
    fn dms(&self, entry: &Entry) -> Option<(f64, f64, f64)> {
        if entry.format != FORMAT_RATIONAL || entry.count != 3 {
            return None;
        }
        let start = self.u32_at(entry.value_pos)? as usize;
        let mut parts = [0.0f64; 3];
        for (i, part) in parts.iter_mut().enumerate() {
            let pos = start.checked_add(i * 8)?;
            let num = self.u32_at(pos)?;
            let den = self.u32_at(pos + 4)?;
            if den == 0 {
                return None;
            }
            *part = num as f64 / den as f64;
        }
        Some((parts[0], parts[1], parts[2]))
    }
}

/// Reads GPS position and capture time from a raw EXIF blob (TIFF header first,
/// optionally preceded by the `Exif\0\0` APP1 marker).
pub fn parse_gps(blob: &[u8]) -> Option<GpsTags> {
    let data = blob.strip_prefix(EXIF_HEADER).unwrap_or(blob);
    let tiff = Tiff::parse(data)?;

    let ifd0 = tiff.entries(tiff.first_ifd()?)?;
    let gps = tiff.entries(tiff.sub_ifd(&ifd0, TAG_GPS_IFD)?)?;

    let find = |tag: u16| gps.iter().find(|e| e.tag == tag);
    let coordinate = |value_tag: u16, ref_tag: u16| {
        let (d, m, s) = tiff.dms(find(value_tag)?)?;
        let reference = tiff.ascii(find(ref_tag)?)?;
        dms_to_decimal(d, m, s, &reference)
    };

    let latitude = coordinate(GPS_LATITUDE, GPS_LATITUDE_REF)?;
    let longitude = coordinate(GPS_LONGITUDE, GPS_LONGITUDE_REF)?;

    Some(GpsTags {
        latitude,
        longitude,
        timestamp: capture_time(&tiff, &ifd0),
    })
}

fn capture_time(tiff: &Tiff<'_>, ifd0: &[Entry]) -> Option<String> {
    let original = tiff
        .sub_ifd(ifd0, TAG_EXIF_IFD)
        .and_then(|ifd| tiff.entries(ifd))
        .and_then(|entries| {
            entries
                .iter()
                .find(|e| e.tag == TAG_DATETIME_ORIGINAL)
                .and_then(|e| tiff.ascii(e))
        })
        .and_then(|raw| normalize_timestamp(&raw));

    original.or_else(|| {
        ifd0.iter()
            .find(|e| e.tag == TAG_DATETIME)
            .and_then(|e| tiff.ascii(e))
            .and_then(|raw| normalize_timestamp(&raw))
    })
}
