//! CLI tests: drive the `blogsmith` binary against a temp site root.
//!
//! None of these need a browser; see `browser_capture.rs` for those.

use std::io::Cursor;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn blogsmith(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blogsmith"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run blogsmith")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn portrait_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([15, 13, 53]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Site root with fonts and a portrait at the stock config locations.
fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/assets/fonts/Karla-Regular.woff2", b"karla");
    write(tmp.path(), "src/assets/fonts/Spectral-Regular.woff2", b"spectral");
    write(tmp.path(), "src/assets/images/me.jpg", &portrait_png());
    tmp
}

#[test]
fn gen_config_prints_stock_toml() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[card]"));
    assert!(text.contains("[[nav.tags]]"));
    let parsed: toml::Value = toml::from_str(&text).expect("stock config is valid TOML");
    assert_eq!(parsed["card"]["width"].as_integer(), Some(1200));
}

#[test]
fn date_formats_content_date() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["date", "2020-11-03"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "November 3, 2020");
}

#[test]
fn date_rejects_garbage() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["date", "last tuesday"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("last tuesday"));
}

#[test]
fn computed_for_tag_page() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["computed", "/react/"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let labels: Vec<&str> = json["filterTags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t[0].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["all", "angular"]);
    assert_eq!(json["filterTags"][0], serde_json::json!(["all", ""]));
    assert!(json["currentYear"].as_i64().unwrap() >= 2024);
}

#[test]
fn computed_uses_configured_tags() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "blogsmith.toml",
        b"[[nav.tags]]\nlabel = \"rust\"\nurl = \"rust\"\n",
    );
    let out = blogsmith(tmp.path(), &["computed", "/"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["filterTags"], serde_json::json!([["rust", "rust"]]));
}

#[test]
fn render_prints_card_html() {
    let tmp = site();
    let out = blogsmith(tmp.path(), &["render", "Foo Title"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let html = stdout(&out);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Foo Title"));
    assert_eq!(html.matches("@font-face").count(), 2);
    assert!(html.contains("data:image/png;base64,"));
}

#[test]
fn render_is_deterministic() {
    let tmp = site();
    let a = stdout(&blogsmith(tmp.path(), &["render", "Same"]));
    let b = stdout(&blogsmith(tmp.path(), &["render", "Same"]));
    assert_eq!(a, b);
}

#[test]
fn render_without_fonts_fails() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["render", "Foo Title"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Karla-Regular.woff2"));
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["--config", "nope.toml", "site"]);
    assert!(!out.status.success());
}

#[test]
fn cssmin_minifies_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "style.css", b"body {\n  color: red;\n}\n");
    let file = tmp.path().join("style.css");
    let out = blogsmith(tmp.path(), &["cssmin", file.to_str().unwrap()]);
    assert!(out.status.success());
    let css = stdout(&out);
    assert!(css.contains("color:red"));
    assert!(!css.trim().contains('\n'));
}

#[test]
fn copy_assets_strips_input_dir() {
    let tmp = site();
    write(tmp.path(), "src/favicon.ico", b"ico");
    let out = blogsmith(tmp.path(), &["copy-assets", "--output", "_site"]);
    assert!(out.status.success());
    assert!(tmp.path().join("_site/assets/fonts/Karla-Regular.woff2").exists());
    assert!(tmp.path().join("_site/favicon.ico").exists());
    assert!(stdout(&out).contains("Copied 4 files"));
}

#[test]
fn site_lists_registrations() {
    let tmp = TempDir::new().unwrap();
    let out = blogsmith(tmp.path(), &["site"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("contentDate (nunjucks)"));
    assert!(text.contains("cssmin (universal)"));
    assert!(text.contains("syntaxhighlight"));
}

#[test]
fn screenshot_rejects_bad_posts_file_before_launching() {
    let tmp = site();
    write(tmp.path(), "posts.json", br#"[["../escape", "Nope"]]"#);
    let posts = tmp.path().join("posts.json");
    let out = blogsmith(tmp.path(), &["screenshot", posts.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("../escape"));
}
