//! Shared test utilities.
//!
//! [`site_fixture`] lays out a minimal site root matching the stock config:
//!
//! ```text
//! src/assets/
//! ├── fonts/Karla-Regular.woff2      "karla-font-bytes"
//! ├── fonts/Spectral-Regular.woff2   "spectral-font-bytes"
//! └── images/me.jpg                  2×2 PNG (contents, not extension, decide the type)
//! ```

use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

/// Encode a solid `width`×`height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0xf4, 0xbb, 0x8a]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// A temp site root with the fonts and portrait the stock config expects.
pub fn site_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/assets/fonts/Karla-Regular.woff2", b"karla-font-bytes");
    write(
        tmp.path(),
        "src/assets/fonts/Spectral-Regular.woff2",
        b"spectral-font-bytes",
    );
    write(tmp.path(), "src/assets/images/me.jpg", &png_bytes(2, 2));
    tmp
}
