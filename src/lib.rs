//! # blogsmith
//!
//! The code side of a personal blog. The site itself is built by an external
//! static-site generator; blogsmith owns what is not content: Open Graph
//! preview images, the template filters, per-page computed data, and the
//! passthrough asset copy.
//!
//! # Preview Image Pipeline
//!
//! ```text
//! 1. Load      fonts + portrait  →  FontSet, data URI   (explicit, once per batch)
//! 2. Render    title             →  card HTML           (pure, deterministic)
//! 3. Capture   card HTML         →  <slug>/og_image.png (one browser, one page per post)
//! ```
//!
//! Loading is a separate step that produces a [`template::CardContext`]
//! value, so rendering never touches the filesystem and is trivially
//! testable. Capture goes through the [`screenshot::ScreenshotBackend`]
//! trait; production uses headless Chrome, tests use a recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `blogsmith.toml` loading, merging over stock defaults, validation |
//! | [`inline`] | Font loader and image data URIs (base64 inlining) |
//! | [`template`] | Preview card HTML rendered with Maud |
//! | [`screenshot`] | Post list, capture orchestration, headless Chrome backend |
//! | [`filters`] | `contentDate` and `cssmin` template filters |
//! | [`computed`] | `currentYear` and `filterTags` computed data |
//! | [`site`] | Filter/plugin registry and passthrough copy |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Scoped Pages
//!
//! Every post gets a fresh browser page wrapped in a
//! [`screenshot::PageGuard`]. The guard closes the page when it goes out of
//! scope, so at most one page is open at a time and an error halfway through
//! a post does not leak it.
//!
//! ## Fail Fast
//!
//! The batch is sequential and stops at the first error. Images written
//! before the failure stay on disk; re-running overwrites them, so a fixed
//! batch can simply be run again.

pub mod computed;
pub mod config;
pub mod filters;
pub mod inline;
pub mod output;
pub mod screenshot;
pub mod site;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
