//! Open Graph preview image capture.
//!
//! Renders the card for every post and screenshots it in a headless browser:
//!
//! ```text
//! posts.json ─▶ Post ─▶ template::render ─▶ page.set_content ─▶ PNG
//!                                                      │
//!                               <assets_dir>/<slug>/og_image.png
//! ```
//!
//! One browser serves the whole batch. A headless browser is shut down when
//! the batch ends; a visible one is held open by [`hold_open`] until the user
//! is done looking at it. Each post gets its own page, held by a
//! [`PageGuard`] so it is closed before the next post starts, on success and
//! on failure alike. The batch is sequential and stops at the first error;
//! images already written stay on disk.
//!
//! The browser sits behind [`ScreenshotBackend`] so orchestration can be
//! tested without Chrome. [`ChromeBackend`] is the production implementation.

use crate::config::BrowserConfig;
use crate::template::{self, CardContext};
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::BufRead;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// File name of the preview image inside each post's asset directory.
pub const OG_IMAGE_FILE: &str = "og_image.png";

#[derive(Error, Debug)]
pub enum ScreenshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid slug '{0}': must be a single non-empty path segment")]
    InvalidSlug(String),
    #[error("Duplicate slug '{0}' in post list")]
    DuplicateSlug(String),
    #[error("Browser error: {0}")]
    Browser(String),
}

/// A post to capture: its slug (output directory) and display title.
///
/// Deserializes from a `[slug, title]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "(String, String)")]
pub struct Post {
    slug: String,
    title: String,
}

impl Post {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Result<Self, ScreenshotError> {
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(ScreenshotError::InvalidSlug(slug));
        }
        Ok(Self {
            slug,
            title: title.into(),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `<assets_dir>/<slug>/og_image.png`
    pub fn output_path(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(&self.slug).join(OG_IMAGE_FILE)
    }
}

impl TryFrom<(String, String)> for Post {
    type Error = ScreenshotError;

    fn try_from((slug, title): (String, String)) -> Result<Self, Self::Error> {
        Post::new(slug, title)
    }
}

/// A slug must stay a single directory below the assets dir.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && slug.chars().all(|c| !c.is_control())
}

/// Read a post list: a JSON array of `[slug, title]` pairs.
pub fn load_posts(path: &Path) -> Result<Vec<Post>, ScreenshotError> {
    let content = fs::read_to_string(path)?;
    let posts: Vec<Post> = serde_json::from_str(&content)?;
    let mut seen = HashSet::new();
    for post in &posts {
        if !seen.insert(post.slug.as_str()) {
            return Err(ScreenshotError::DuplicateSlug(post.slug.clone()));
        }
    }
    Ok(posts)
}

// ============================================================================
// Backend seam
// ============================================================================

/// A browser that can hand out pages.
pub trait ScreenshotBackend {
    type Page: CapturePage;

    /// Open a fresh page.
    fn open_page(&self) -> Result<Self::Page, ScreenshotError>;
}

/// A single browser page.
pub trait CapturePage {
    /// Size of the area captured by [`screenshot_png`](Self::screenshot_png).
    fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), ScreenshotError>;

    /// Replace the document and wait until fonts and images are ready.
    fn set_content(&mut self, html: &str) -> Result<(), ScreenshotError>;

    /// Capture the viewport as PNG bytes.
    fn screenshot_png(&mut self) -> Result<Vec<u8>, ScreenshotError>;

    /// Release the page. Called exactly once, by [`PageGuard`].
    fn close(&mut self) -> Result<(), ScreenshotError>;
}

/// Owns an open page and closes it when dropped.
pub struct PageGuard<P: CapturePage> {
    page: P,
}

impl<P: CapturePage> PageGuard<P> {
    pub fn new(page: P) -> Self {
        Self { page }
    }
}

impl<P: CapturePage> Deref for PageGuard<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.page
    }
}

impl<P: CapturePage> DerefMut for PageGuard<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.page
    }
}

impl<P: CapturePage> Drop for PageGuard<P> {
    fn drop(&mut self) {
        if let Err(e) = self.page.close() {
            log::warn!("failed to close page: {e}");
        }
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// One written preview image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub slug: String,
    pub title: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Result of a completed batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub images: Vec<CapturedImage>,
}

/// Capture a preview image for every post, in order.
///
/// Output directories are created as needed and existing images are
/// overwritten. The first failure aborts the batch.
pub fn capture<B: ScreenshotBackend>(
    backend: &B,
    ctx: &CardContext,
    image_data_uri: &str,
    assets_dir: &Path,
    posts: &[Post],
) -> Result<CaptureReport, ScreenshotError> {
    log::info!("taking {} screenshots", posts.len());
    let mut report = CaptureReport::default();

    for post in posts {
        let html = template::render(ctx, &post.title, image_data_uri);

        let mut page = PageGuard::new(backend.open_page()?);
        page.set_viewport(ctx.card.width, ctx.card.height)?;
        page.set_content(&html)?;

        let path = post.output_path(assets_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let png = page.screenshot_png()?;
        fs::write(&path, &png)?;
        log::debug!("{} → {} ({} bytes)", post.slug, path.display(), png.len());

        report.images.push(CapturedImage {
            slug: post.slug.clone(),
            title: post.title.clone(),
            path,
            bytes: png.len(),
        });
    }

    Ok(report)
}

/// Keep a visible browser alive until the user presses Enter.
///
/// Headless runs return at once and the browser is shut down by the caller.
/// Returns whether it waited.
pub fn hold_open(config: &BrowserConfig, input: &mut impl BufRead) -> std::io::Result<bool> {
    if config.headless {
        return Ok(false);
    }
    log::info!("holding browser open for inspection");
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(true)
}

// ============================================================================
// headless_chrome backend
// ============================================================================

/// Waits for webfonts and every `<img>` before resolving. The card carries no
/// remote resources, so this is the point where the network goes idle.
const READY_SCRIPT: &str = r#"(async function() {
    await document.fonts.ready;
    await Promise.all(Array.from(document.images).map(function(img) {
        return img.complete ? Promise.resolve() : img.decode().catch(function() {});
    }));
    return true;
})()"#;

/// Headless Chrome driven over the DevTools protocol.
///
/// The browser process lives as long as this value and is shut down when it
/// is dropped.
pub struct ChromeBackend {
    browser: Browser,
    timeout: Duration,
}

impl ChromeBackend {
    /// Launch Chrome with a window matching the card canvas.
    pub fn launch(config: &BrowserConfig, width: u32, height: u32) -> Result<Self, ScreenshotError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        // A visible browser may sit idle while it is being inspected.
        let idle = if config.headless {
            timeout.max(Duration::from_secs(60))
        } else {
            Duration::from_secs(24 * 60 * 60)
        };
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((width, height)))
            .idle_browser_timeout(idle)
            .build()
            .map_err(|e| {
                ScreenshotError::Browser(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(options)
            .map_err(|e| ScreenshotError::Browser(format!("Failed to launch browser: {}", e)))?;
        log::info!("launched browser (headless: {})", config.headless);

        Ok(Self { browser, timeout })
    }
}

impl ScreenshotBackend for ChromeBackend {
    type Page = ChromePage;

    fn open_page(&self) -> Result<ChromePage, ScreenshotError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| ScreenshotError::Browser(format!("Failed to open page: {}", e)))?;
        tab.set_default_timeout(self.timeout);
        Ok(ChromePage { tab, clip: None })
    }
}

/// A Chrome tab.
pub struct ChromePage {
    tab: Arc<Tab>,
    clip: Option<Page::Viewport>,
}

impl ChromePage {
    /// `window.innerWidth` and `window.innerHeight` as the page sees them.
    pub fn inner_size(&self) -> Result<(u32, u32), ScreenshotError> {
        let result = self
            .tab
            .evaluate("window.innerWidth + 'x' + window.innerHeight", false)
            .map_err(|e| ScreenshotError::Browser(format!("Failed to read viewport: {}", e)))?;
        let text = result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        text.split_once('x')
            .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
            .ok_or_else(|| ScreenshotError::Browser(format!("Unexpected viewport size '{text}'")))
    }
}

impl CapturePage for ChromePage {
    fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), ScreenshotError> {
        // The window size alone is not the layout viewport once browser
        // chrome is visible, so pin the metrics on the page itself.
        self.tab
            .call_method(Emulation::SetDeviceMetricsOverride {
                width,
                height,
                device_scale_factor: 1.0,
                mobile: false,
                scale: None,
                screen_width: None,
                screen_height: None,
                position_x: None,
                position_y: None,
                dont_set_visible_size: None,
                screen_orientation: None,
                viewport: None,
                display_feature: None,
                device_posture: None,
            })
            .map_err(|e| ScreenshotError::Browser(format!("Failed to set viewport: {}", e)))?;
        if log::log_enabled!(log::Level::Debug) {
            let (w, h) = self.inner_size()?;
            log::debug!("viewport {w}x{h}");
        }
        self.clip = Some(Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(width),
            height: f64::from(height),
            scale: 1.0,
        });
        Ok(())
    }

    fn set_content(&mut self, html: &str) -> Result<(), ScreenshotError> {
        let literal = serde_json::to_string(html)?;
        let write = format!("document.open(); document.write({literal}); document.close();");
        self.tab
            .evaluate(&write, false)
            .map_err(|e| ScreenshotError::Browser(format!("Failed to set content: {}", e)))?;
        self.tab
            .evaluate(READY_SCRIPT, true)
            .map_err(|e| ScreenshotError::Browser(format!("Content never became ready: {}", e)))?;
        Ok(())
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>, ScreenshotError> {
        self.tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                self.clip.clone(),
                true,
            )
            .map_err(|e| ScreenshotError::Browser(format!("Screenshot failed: {}", e)))
    }

    fn close(&mut self) -> Result<(), ScreenshotError> {
        self.tab
            .close(false)
            .map(|_| ())
            .map_err(|e| ScreenshotError::Browser(format!("Failed to close page: {}", e)))
    }
}
