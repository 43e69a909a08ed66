use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::path::Path;

use crate::constants::JPEG_QUALITY;
use crate::exif_parser::{apply_orientation, read_orientation};
use crate::photo::is_heif_path;

/// Whether this build can decode HEIC/HEIF pixels.
pub fn heic_supported() -> bool {
    cfg!(feature = "heic")
}

/// Writes a JPEG copy of `source` to `dest` whose longer edge is at most
/// `max_size`, upright and without alpha. Returns the written dimensions.
pub fn render_derivative(source: &Path, dest: &Path, max_size: u32) -> Result<(u32, u32)> {
    let img = load_upright(source)?;
    let scaled = fit_within(img, max_size);
    let rgb = flatten_alpha(scaled);
    let jpeg = encode_jpeg(&rgb)?;

    std::fs::write(dest, jpeg).with_context(|| format!("Failed to write {}", dest.display()))?;
    Ok(rgb.dimensions())
}

/// Decodes an image and applies the orientation stored in its own EXIF.
pub fn load_upright(source: &Path) -> Result<DynamicImage> {
    let data = std::fs::read(source).with_context(|| format!("Failed to read {}", source.display()))?;

    if is_heif_path(source) {
        // libheif already applies the container's rotation/mirroring
        return decode_heif(&data).with_context(|| format!("Failed to decode HEIC: {}", source.display()));
    }

    let img = image::load_from_memory(&data)
        .with_context(|| format!("Failed to open image: {}", source.display()))?;
    Ok(apply_orientation(img, read_orientation(&data)))
}

/// Downsamples so neither side exceeds `max_size`, keeping the aspect ratio.
/// Images that already fit are returned untouched.
pub fn fit_within(img: DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_size && height <= max_size {
        return img;
    }
    // Triangle is plenty for display copies and much faster than Lanczos
    img.resize(max_size, max_size, image::imageops::FilterType::Triangle)
}

/// Drops the alpha channel by compositing onto white.
pub fn flatten_alpha(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(not(feature = "turbojpeg"))]
fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(rgb)
        .context("Failed to encode JPEG")?;
    Ok(out)
}

#[cfg(feature = "turbojpeg")]
fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut compressor = turbojpeg::Compressor::new()?;
    compressor.set_quality(i32::from(JPEG_QUALITY))?;
    compressor.set_subsamp(turbojpeg::Subsamp::Sub2x2)?;
    compressor.set_optimize(true)?;

    let width = rgb.width() as usize;
    let image = turbojpeg::Image {
        pixels: rgb.as_raw().as_slice(),
        width,
        pitch: width * 3,
        height: rgb.height() as usize,
        format: turbojpeg::PixelFormat::RGB,
    };
    compressor
        .compress_to_vec(image)
        .with_context(|| "Failed to compress image with turbojpeg")
}

#[cfg(feature = "heic")]
fn decode_heif(data: &[u8]) -> Result<DynamicImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data)?;
    let handle = ctx.primary_image_handle()?;
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

    let planes = decoded.planes();
    let plane = planes.interleaved.context("HEIC image has no interleaved plane")?;
    let (width, height) = (plane.width, plane.height);
    let row_len = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        pixels.extend_from_slice(row.get(..row_len).context("Short HEIC row")?);
    }
    let rgb = RgbImage::from_raw(width, height, pixels).context("HEIC plane size mismatch")?;
    Ok(DynamicImage::ImageRgb8(rgb))
}

#[cfg(not(feature = "heic"))]
fn decode_heif(_data: &[u8]) -> Result<DynamicImage> {
    anyhow::bail!("HEIC decoding is not available in this build (rebuild with --features heic)")
}
