//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Screenshot
//!
//! ```text
//! 001 Foo Title
//!     foo → src/assets/foo/og_image.png (48.2 KB)
//! 002 Bar Title
//!     bar → src/assets/bar/og_image.png (51.0 KB)
//!
//! Captured 2 images
//! ```
//!
//! ## Copy assets
//!
//! ```text
//! _site/assets/fonts/Karla-Regular.woff2
//! _site/favicon.ico
//! Skipped (missing): src/robots.txt
//!
//! Copied 2 files
//! ```

use crate::screenshot::CaptureReport;
use crate::site::{CopyReport, Site};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Show `path` relative to `base` when it lives under it.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

pub fn format_capture_report(report: &CaptureReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, image) in report.images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), image.title));
        lines.push(format!(
            "    {} → {} ({})",
            image.slug,
            display_path(&image.path, root),
            format_size(image.bytes)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Captured {}",
        plural(report.images.len(), "image", "images")
    ));
    lines
}

pub fn print_capture_report(report: &CaptureReport, root: &Path) {
    for line in format_capture_report(report, root) {
        println!("{}", line);
    }
}

pub fn format_copy_report(report: &CopyReport, output_dir: &Path) -> Vec<String> {
    // Paths are shown from the output directory's own name down
    let base = output_dir.parent().unwrap_or(output_dir);
    let mut lines: Vec<String> = report
        .copied
        .iter()
        .map(|path| display_path(path, base))
        .collect();
    for skipped in &report.skipped {
        lines.push(format!("Skipped (missing): {}", skipped.display()));
    }
    lines.push(String::new());
    lines.push(format!(
        "Copied {}",
        plural(report.copied.len(), "file", "files")
    ));
    lines
}

pub fn print_copy_report(report: &CopyReport, output_dir: &Path) {
    for line in format_copy_report(report, output_dir) {
        println!("{}", line);
    }
}

/// Registrations in the order the generator receives them.
pub fn format_site(site: &Site) -> Vec<String> {
    let mut lines = vec!["Filters".to_string()];
    for filter in &site.filters {
        lines.push(format!("    {} ({})", filter.name, filter.kind));
    }
    lines.push("Plugins".to_string());
    for plugin in &site.plugins {
        lines.push(format!("    {}", plugin));
    }
    lines.push("Passthrough".to_string());
    for entry in &site.passthrough {
        lines.push(format!("    {}", entry.display()));
    }
    lines.push(format!(
        "passthroughFileCopy: {}",
        site.passthrough_file_copy
    ));
    lines
}

pub fn print_site(site: &Site) {
    for line in format_site(site) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogConfig;
    use crate::screenshot::CapturedImage;
    use std::path::PathBuf;

    #[test]
    fn size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn capture_report_lines() {
        let root = PathBuf::from("/blog");
        let report = CaptureReport {
            images: vec![
                CapturedImage {
                    slug: "foo".to_string(),
                    title: "Foo Title".to_string(),
                    path: root.join("src/assets/foo/og_image.png"),
                    bytes: 2048,
                },
                CapturedImage {
                    slug: "bar".to_string(),
                    title: "Bar Title".to_string(),
                    path: root.join("src/assets/bar/og_image.png"),
                    bytes: 100,
                },
            ],
        };
        let lines = format_capture_report(&report, &root);
        assert_eq!(
            lines,
            vec![
                "001 Foo Title",
                "    foo → src/assets/foo/og_image.png (2.0 KB)",
                "002 Bar Title",
                "    bar → src/assets/bar/og_image.png (100 B)",
                "",
                "Captured 2 images",
            ]
        );
    }

    #[test]
    fn empty_capture_report() {
        let lines = format_capture_report(&CaptureReport::default(), Path::new("."));
        assert_eq!(lines.last().unwrap(), "Captured 0 images");
    }

    #[test]
    fn copy_report_lists_files_and_skips() {
        let out = PathBuf::from("/tmp/_site");
        let report = CopyReport {
            copied: vec![out.join("assets/a.css"), out.join("favicon.ico")],
            skipped: vec![PathBuf::from("src/robots.txt")],
        };
        let lines = format_copy_report(&report, &out);
        assert_eq!(
            lines,
            vec![
                "_site/assets/a.css",
                "_site/favicon.ico",
                "Skipped (missing): src/robots.txt",
                "",
                "Copied 2 files",
            ]
        );
    }

    #[test]
    fn site_listing() {
        let site = Site::new(&BlogConfig::default());
        let lines = format_site(&site);
        assert!(lines.contains(&"    contentDate (nunjucks)".to_string()));
        assert!(lines.contains(&"    cssmin (universal)".to_string()));
        assert!(lines.contains(&"    syntaxhighlight".to_string()));
        assert!(lines.contains(&"    src/assets".to_string()));
        assert_eq!(lines.last().unwrap(), "passthroughFileCopy: true");
    }
}
