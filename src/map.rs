use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::constants::PHOTOS_DIR_NAME;
use crate::html_template::{escape_html, render_map_page};
use crate::photo::{Derivatives, PhotoRecord};

/// One map point with its popup fragment and hover label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MapOptions {
    pub zoom: u8,
    pub cluster: bool,
    pub thumb_size: u32,
}

/// The finished map document, ready to be written out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMap {
    pub center: [f64; 2],
    pub zoom: u8,
    pub cluster: bool,
    pub popup_max_width: u32,
    pub markers: Vec<Marker>,
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(points: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let (count, lat_sum, lon_sum) = points
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), (p_lat, p_lon)| (n + 1, lat + p_lat, lon + p_lon));

    (count > 0).then(|| (lat_sum / count as f64, lon_sum / count as f64))
}

/// Popup body: the thumbnail linking to the large copy, then a caption with
/// file name, capture time and coordinates.
pub fn popup_html(record: &PhotoRecord, derivatives: &Derivatives, thumb_size: u32) -> String {
    let name = escape_html(&record.file_name());
    let timestamp = escape_html(record.timestamp.as_deref().unwrap_or_default());
    let large = escape_html(&format!("{}/{}", PHOTOS_DIR_NAME, derivatives.large));
    let thumb = escape_html(&format!("{}/{}", PHOTOS_DIR_NAME, derivatives.thumbnail));

    format!(
        r#"<div style="width:{width}px">
  <a href="{large}" target="_blank" rel="noopener">
    <img src="{thumb}" style="max-width:100%; height:auto; border-radius:8px; box-shadow:0 1px 4px rgba(0,0,0,0.3);" />
  </a>
  <div style="margin-top:6px; font-size:12px; line-height:1.3">
    <b>{name}</b><br/>
    {timestamp}<br/>
    {lat:.6}, {lon:.6}
  </div>
</div>"#,
        width = thumb_size.saturating_add(40),
        lat = record.latitude,
        lon = record.longitude,
    )
}

pub struct MapBuilder {
    options: MapOptions,
    markers: Vec<Marker>,
}

impl MapBuilder {
    pub fn new(options: MapOptions) -> Self {
        Self { options, markers: Vec::new() }
    }

    pub fn add_photo(&mut self, record: &PhotoRecord, derivatives: &Derivatives) -> &mut Self {
        self.markers.push(Marker {
            lat: record.latitude,
            lon: record.longitude,
            popup: popup_html(record, derivatives, self.options.thumb_size),
            tooltip: escape_html(&record.file_name()),
        });
        self
    }

    pub fn build(self) -> Result<PhotoMap> {
        let Some((lat, lon)) = centroid(self.markers.iter().map(|m| (m.lat, m.lon))) else {
            bail!("Cannot build a map without markers");
        };

        Ok(PhotoMap {
            center: [lat, lon],
            zoom: self.options.zoom,
            cluster: self.options.cluster,
            popup_max_width: self.options.thumb_size.saturating_add(80),
            markers: self.markers,
        })
    }
}

impl PhotoMap {
    pub fn render(&self) -> Result<String> {
        let config = serde_json::to_string(self).context("Failed to serialize map data")?;
        let title = format!("Photo map ({} photos)", self.markers.len());
        render_map_page(&title, &config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.render()?;
        std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
    }
}
