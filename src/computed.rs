//! Per-page computed data exposed to templates.
//!
//! Two values are derived for every page:
//!
//! - `currentYear`: the calendar year at build time (footer copyright).
//! - `filterTags`: the tag links shown above post listings. A listing never
//!   links to itself, and every page except the home page gets an extra
//!   `all` link back to the unfiltered listing.
//!
//! ```text
//! page url     filterTags
//! /            react, angular
//! /react/      all, angular
//! /angular/    all, react
//! ```

use chrono::Datelike;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

/// A navigation tag: display label plus the listing url it points to.
///
/// Read from config as a `{ label, url }` table; handed to templates as a
/// `[label, url]` pair, which is how the listing partials index it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavTag {
    pub label: String,
    /// Url without slashes (`react` links to `/react/`). Empty for the root listing.
    pub url: String,
}

impl NavTag {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

impl Serialize for NavTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.label)?;
        pair.serialize_element(&self.url)?;
        pair.end()
    }
}

/// Computed data for a single page, serialized with the template-facing names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedData {
    pub current_year: i32,
    pub filter_tags: Vec<NavTag>,
}

impl ComputedData {
    pub fn for_page(page_url: &str, table: &[NavTag]) -> Self {
        Self {
            current_year: current_year(),
            filter_tags: filter_tags(page_url, table),
        }
    }
}

/// Current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Tags to show on the page at `page_url`.
///
/// Slashes are stripped from the url before comparing, so `/react/` drops
/// the `react` entry. Any page other than `/` gets `all` prepended.
pub fn filter_tags(page_url: &str, table: &[NavTag]) -> Vec<NavTag> {
    let clean_url = page_url.replace('/', "");
    let mut tags: Vec<NavTag> = table
        .iter()
        .filter(|tag| tag.url != clean_url)
        .cloned()
        .collect();

    if page_url != "/" {
        tags.insert(0, NavTag::new("all", ""));
    }
    tags
}
