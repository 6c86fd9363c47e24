//! Blog tooling configuration.
//!
//! Handles loading, validating, and merging `blogsmith.toml`. The file lives
//! at the site root and is sparse: stock defaults are the base layer and the
//! user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "src/assets"    # Preview images land in <assets_dir>/<slug>/og_image.png
//!
//! [fonts]
//! karla = "src/assets/fonts/Karla-Regular.woff2"
//! spectral = "src/assets/fonts/Spectral-Regular.woff2"
//!
//! [card]
//! image = "src/assets/images/me.jpg"
//! width = 1200
//! height = 630
//! portrait_width = 850
//! byline = "By Kirils L @kirjai"
//! text_color = "#0f0d35"
//! background = "#f6f7f3"
//! accent = "#f4bb8a"
//!
//! [browser]
//! headless = true
//! timeout_secs = 30
//!
//! [site]
//! input_dir = "src"
//! passthrough = ["src/assets", "src/favicon.ico"]
//!
//! [[nav.tags]]
//! label = "react"
//! url = "react"
//!
//! [[nav.tags]]
//! label = "angular"
//! url = "angular"
//! ```
//!
//! Tables merge key-by-key; arrays (like `nav.tags`) replace the default
//! wholesale. Unknown keys are rejected to catch typos early.

use crate::computed::NavTag;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default file name looked up at the site root.
pub const CONFIG_FILE: &str = "blogsmith.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Blog configuration loaded from `blogsmith.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Directory (relative to the site root) that receives per-post preview images.
    pub assets_dir: String,
    /// Font files inlined into the preview card.
    pub fonts: FontsConfig,
    /// Preview card layout and colors.
    pub card: CardConfig,
    /// Headless browser settings.
    pub browser: BrowserConfig,
    /// Passthrough copies registered with the site generator.
    pub site: SiteSection,
    /// Navigation tags offered on listing pages.
    pub nav: NavConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            assets_dir: "src/assets".to_string(),
            fonts: FontsConfig::default(),
            card: CardConfig::default(),
            browser: BrowserConfig::default(),
            site: SiteSection::default(),
            nav: NavConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.card.width == 0 || self.card.height == 0 {
            return Err(ConfigError::Validation(
                "card.width and card.height must be non-zero".into(),
            ));
        }
        if self.card.portrait_width > self.card.width {
            return Err(ConfigError::Validation(
                "card.portrait_width must not exceed card.width".into(),
            ));
        }
        if self.card.byline.trim().is_empty() {
            return Err(ConfigError::Validation(
                "card.byline must not be empty".into(),
            ));
        }
        if self.browser.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "browser.timeout_secs must be non-zero".into(),
            ));
        }
        if self.assets_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets_dir must not be empty".into(),
            ));
        }
        let mut labels = HashSet::new();
        for tag in &self.nav.tags {
            if !labels.insert(tag.label.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "nav.tags label '{}' is declared twice",
                    tag.label
                )));
            }
        }
        Ok(())
    }
}

/// Paths to the two fonts embedded in the preview card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Body font (`--bodyFont`).
    pub karla: String,
    /// Heading font (`--headerFont`).
    pub spectral: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            karla: "src/assets/fonts/Karla-Regular.woff2".to_string(),
            spectral: "src/assets/fonts/Spectral-Regular.woff2".to_string(),
        }
    }
}

/// Preview card settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Portrait shown in the left panel, relative to the site root.
    pub image: String,
    /// Canvas width in CSS pixels.
    pub width: u32,
    /// Canvas height in CSS pixels.
    pub height: u32,
    /// Rendered width of the portrait.
    pub portrait_width: u32,
    /// Fixed line under the title.
    pub byline: String,
    pub text_color: String,
    pub background: String,
    /// Border and rule color.
    pub accent: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            image: "src/assets/images/me.jpg".to_string(),
            width: 1200,
            height: 630,
            portrait_width: 850,
            byline: "By Kirils L @kirjai".to_string(),
            text_color: "#0f0d35".to_string(),
            background: "#f6f7f3".to_string(),
            accent: "#f4bb8a".to_string(),
        }
    }
}

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run without a visible window. Turn off to watch the batch; the
    /// window then stays open after the batch until Enter is pressed.
    pub headless: bool,
    /// Upper bound for a single browser operation (content load, screenshot).
    pub timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
        }
    }
}

/// Passthrough copies registered with the site generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Generator input directory; stripped from passthrough paths on copy.
    pub input_dir: String,
    /// Files and directories copied verbatim into the output.
    pub passthrough: Vec<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            input_dir: "src".to_string(),
            passthrough: vec!["src/assets".to_string(), "src/favicon.ico".to_string()],
        }
    }
}

/// Navigation tag table used by `filterTags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    #[serde(serialize_with = "tag_tables")]
    pub tags: Vec<NavTag>,
}

/// Config keeps the `[[nav.tags]]` table form; templates get pairs.
fn tag_tables<S: serde::Serializer>(tags: &[NavTag], serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct TagTable<'a> {
        label: &'a str,
        url: &'a str,
    }
    serializer.collect_seq(tags.iter().map(|tag| TagTable {
        label: &tag.label,
        url: &tag.url,
    }))
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tags: vec![NavTag::new("react", "react"), NavTag::new("angular", "angular")],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BlogConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BlogConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BlogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when the
/// file is absent.
pub fn load_config(path: &Path) -> Result<BlogConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `blogsmith.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blogsmith configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the site root.
# Unknown keys will cause an error.

# Preview images are written to <assets_dir>/<slug>/og_image.png
assets_dir = "src/assets"

# ---------------------------------------------------------------------------
# Fonts inlined into the preview card (base64 data URIs)
# ---------------------------------------------------------------------------
[fonts]
karla = "src/assets/fonts/Karla-Regular.woff2"
spectral = "src/assets/fonts/Spectral-Regular.woff2"

# ---------------------------------------------------------------------------
# Preview card
# ---------------------------------------------------------------------------
[card]
# Portrait shown on the left of every card.
image = "src/assets/images/me.jpg"

# Canvas size in pixels. 1200x630 is the Open Graph recommendation.
width = 1200
height = 630

# Rendered width of the portrait (must not exceed width).
portrait_width = 850

byline = "By Kirils L @kirjai"
text_color = "#0f0d35"
background = "#f6f7f3"
accent = "#f4bb8a"        # Frame border and rule under the title

# ---------------------------------------------------------------------------
# Headless browser
# ---------------------------------------------------------------------------
[browser]
# Set to false to watch the batch in a visible window. The window stays
# open after the batch until Enter is pressed.
headless = true

# Upper bound in seconds for each content load and screenshot.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Passthrough copies
# ---------------------------------------------------------------------------
[site]
# The generator's input directory, stripped from passthrough paths on copy.
input_dir = "src"
passthrough = ["src/assets", "src/favicon.ico"]

# ---------------------------------------------------------------------------
# Navigation tags (filterTags). Listing the table replaces the defaults.
# ---------------------------------------------------------------------------
[[nav.tags]]
label = "react"
url = "react"

[[nav.tags]]
label = "angular"
url = "angular"
"##
}
