// Supported input formats (compared lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "heif"];

// Output layout
pub const DEFAULT_OUTPUT: &str = "photo_map.html";
pub const PHOTOS_DIR_NAME: &str = "map_photos";
pub const THUMB_SUFFIX: &str = "_thumb";

// Image sizes
pub const LARGE_SIZE: u32 = 2048;
pub const THUMBNAIL_SIZE: u32 = 480;
pub const JPEG_QUALITY: u8 = 85;
pub const MAX_IMAGE_SIZE: u32 = 16384;

// Map view
pub const DEFAULT_ZOOM: u8 = 12;
// Highest level the OpenStreetMap tile layer serves
pub const MAX_ZOOM: u8 = 19;

// Characters replaced with '_' in derivative file names
pub const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
