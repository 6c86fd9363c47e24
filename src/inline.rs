//! Base64 inlining of the card's binary assets.
//!
//! The preview card must render without any network or filesystem access from
//! the browser, so both fonts and the portrait are embedded as data URIs.
//! [`FontSet::load`] is the explicit initialization step: it runs once per
//! batch and its result is handed to the renderer. A changed font file needs
//! a fresh `FontSet`.

use crate::config::FontsConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InlineError {
    #[error("Missing file: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot determine image type of {}", .0.display())]
    UnknownImageFormat(PathBuf),
}

/// Base64 payloads of the two card fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSet {
    pub karla: String,
    pub spectral: String,
}

impl FontSet {
    /// Read and encode both fonts. Paths are resolved against `root`.
    pub fn load(root: &Path, fonts: &FontsConfig) -> Result<Self, InlineError> {
        Ok(Self {
            karla: encode_file(&root.join(&fonts.karla))?,
            spectral: encode_file(&root.join(&fonts.spectral))?,
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, InlineError> {
    fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InlineError::Missing(path.to_path_buf())
        } else {
            InlineError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn encode_file(path: &Path) -> Result<String, InlineError> {
    let bytes = read_file(path)?;
    log::debug!("inlined {} ({} bytes)", path.display(), bytes.len());
    Ok(STANDARD.encode(bytes))
}

/// Encode an image as a `data:` URI.
///
/// The MIME type is sniffed from the file contents, with the extension as a
/// fallback for formats the sniffer does not know.
pub fn image_data_uri(path: &Path) -> Result<String, InlineError> {
    let bytes = read_file(path)?;
    let mime = image::guess_format(&bytes)
        .ok()
        .or_else(|| image::ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type())
        .ok_or_else(|| InlineError::UnknownImageFormat(path.to_path_buf()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
