use anyhow::{Context, Result};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

const MAP_TEMPLATE: &str = "map.html";
const TITLE_PLACEHOLDER: &str = "{{TITLE}}";
const CONFIG_PLACEHOLDER: &str = "{{MAP_CONFIG}}";

/// Fills the embedded Leaflet page with a title and the map configuration.
///
/// `config_json` is inlined into a `<script>` block, so any `</` sequence is
/// escaped to keep it from closing the tag early.
pub fn render_map_page(title: &str, config_json: &str) -> Result<String> {
    let file = Asset::get(MAP_TEMPLATE).context("Embedded map template is missing")?;
    let template = std::str::from_utf8(&file.data).context("Map template is not UTF-8")?;

    Ok(template
        .replace(TITLE_PLACEHOLDER, &escape_html(title))
        .replace(CONFIG_PLACEHOLDER, &config_json.replace("</", "<\\/")))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
