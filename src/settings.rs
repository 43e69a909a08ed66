use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_OUTPUT, DEFAULT_ZOOM, LARGE_SIZE, MAX_IMAGE_SIZE, MAX_ZOOM, THUMBNAIL_SIZE};

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub thumb_size: u32,
    pub large_size: u32,
    pub zoom: u8,
    pub cluster: bool,
}

impl Settings {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            thumb_size: THUMBNAIL_SIZE,
            large_size: LARGE_SIZE,
            zoom: DEFAULT_ZOOM,
            cluster: true,
        }
    }

    /// Applies a `key = value` config file on top of the current values.
    ///
    /// Lines starting with `#` are comments. Unknown keys and malformed
    /// values are skipped with a warning.
    pub fn apply_config_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
            }
        }

        for (key, value) in config_map {
            let applied = match key.as_str() {
                "output" => {
                    self.output = PathBuf::from(&value);
                    true
                }
                "thumb_size" => value.parse().map(|v| self.thumb_size = v).is_ok(),
                "large_size" => value.parse().map(|v| self.large_size = v).is_ok(),
                "zoom" => value.parse().map(|v| self.zoom = v).is_ok(),
                "cluster" => value.parse().map(|v| self.cluster = v).is_ok(),
                _ => {
                    tracing::warn!("Unknown config key '{}' in {}", key, path.display());
                    continue;
                }
            };
            if !applied {
                tracing::warn!("Ignoring invalid value '{}' for '{}' in {}", value, key, path.display());
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.thumb_size == 0 || self.large_size == 0 {
            bail!("Image sizes must be greater than zero");
        }
        if self.thumb_size > MAX_IMAGE_SIZE || self.large_size > MAX_IMAGE_SIZE {
            bail!("Image sizes must not exceed {} pixels", MAX_IMAGE_SIZE);
        }
        if self.zoom > MAX_ZOOM {
            bail!("Zoom level must be between 0 and {}", MAX_ZOOM);
        }
        Ok(())
    }
}
