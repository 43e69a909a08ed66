//! Turns a folder of geotagged photos into a self-contained Leaflet map.
//!
//! The pipeline is linear: [`scanner`] finds image files, [`exif_parser`]
//! pulls GPS position and capture time out of each one, [`image_processing`]
//! writes a large and a thumbnail JPEG per photo, and [`map`] assembles the
//! markers into an HTML page. [`processing::run`] drives all of it.

pub mod constants;
pub mod exif_parser;
pub mod html_template;
pub mod image_processing;
pub mod map;
pub mod photo;
pub mod processing;
pub mod scanner;
pub mod settings;

pub use exif_parser::{GpsExtractor, GpsSource, GpsTags};
pub use photo::{Derivatives, PhotoRecord};
pub use processing::{run, MapSummary, Outcome, ProcessingStats};
pub use settings::Settings;
