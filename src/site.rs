//! Site generator registrations.
//!
//! The blog itself is built by an external static-site generator. This module
//! is the Rust side of its configuration: which filters and plugins the site
//! registers, and which files are copied through untouched. Filters can be run
//! by name, which is how the CLI exposes them.
//!
//! Passthrough paths are given relative to the site root and land in the
//! output directory with the generator's input directory stripped, so
//! `src/assets/fonts/Karla.woff2` is copied to `<output>/assets/fonts/Karla.woff2`.

use crate::config::BlogConfig;
use crate::filters::{self, FilterError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Where a filter is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Nunjucks templates only.
    Nunjucks,
    /// Every template language the generator supports.
    Universal,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Nunjucks => write!(f, "nunjucks"),
            FilterKind::Universal => write!(f, "universal"),
        }
    }
}

type FilterFn = fn(&str) -> Result<String, FilterError>;

/// A named template filter.
#[derive(Clone)]
pub struct Filter {
    pub name: &'static str,
    pub kind: FilterKind,
    apply: FilterFn,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Everything the site registers with the generator.
#[derive(Debug, Clone)]
pub struct Site {
    pub filters: Vec<Filter>,
    pub plugins: Vec<&'static str>,
    pub input_dir: PathBuf,
    pub passthrough: Vec<PathBuf>,
    pub passthrough_file_copy: bool,
}

impl Site {
    pub fn new(config: &BlogConfig) -> Self {
        Self {
            filters: vec![
                Filter {
                    name: "contentDate",
                    kind: FilterKind::Nunjucks,
                    apply: filters::content_date_filter,
                },
                Filter {
                    name: "cssmin",
                    kind: FilterKind::Universal,
                    apply: filters::cssmin_filter,
                },
            ],
            plugins: vec!["syntaxhighlight"],
            input_dir: PathBuf::from(&config.site.input_dir),
            passthrough: config.site.passthrough.iter().map(PathBuf::from).collect(),
            passthrough_file_copy: true,
        }
    }

    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// Run the filter registered as `name`.
    pub fn apply_filter(&self, name: &str, input: &str) -> Result<String, FilterError> {
        let filter = self
            .filter(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;
        (filter.apply)(input)
    }

    /// Output location of a passthrough path.
    fn destination(&self, relative: &Path, output_dir: &Path) -> PathBuf {
        let stripped = relative.strip_prefix(&self.input_dir).unwrap_or(relative);
        output_dir.join(stripped)
    }

    /// Copy every passthrough entry from `root` into `output_dir`.
    ///
    /// Directories are copied recursively. Entries that do not exist are
    /// skipped and listed in the report.
    pub fn passthrough_copy(&self, root: &Path, output_dir: &Path) -> Result<CopyReport, SiteError> {
        let mut report = CopyReport::default();

        for entry in &self.passthrough {
            let source = root.join(entry);
            if !source.exists() {
                log::warn!("passthrough entry {} does not exist", source.display());
                report.skipped.push(entry.clone());
                continue;
            }

            for item in WalkDir::new(&source).sort_by_file_name() {
                let item = item?;
                if !item.file_type().is_file() {
                    continue;
                }
                let relative = match item.path().strip_prefix(&source) {
                    Ok(rest) if !rest.as_os_str().is_empty() => entry.join(rest),
                    _ => entry.clone(),
                };
                let dest = self.destination(&relative, output_dir);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(item.path(), &dest)?;
                log::debug!("copied {} → {}", item.path().display(), dest.display());
                report.copied.push(dest);
            }
        }

        Ok(report)
    }
}

/// Outcome of [`Site::passthrough_copy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination paths, grouped by passthrough entry.
    pub copied: Vec<PathBuf>,
    /// Passthrough entries missing from the site root.
    pub skipped: Vec<PathBuf>,
}
