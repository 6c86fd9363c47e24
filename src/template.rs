//! Open Graph preview card HTML.
//!
//! Renders a self-contained document sized for the card canvas: fonts and
//! the portrait are data URIs, so the page needs no network access and the
//! output depends only on the inputs.
//!
//! ```text
//! ┌──────────────────────── 1200 × 630 ────────────────────────┐
//! │ ┌──────────────┐                                           │
//! │ │              │            Post Title In Spectral          │
//! │ │   portrait   │                 ─────────                  │
//! │ │   (850px)    │             By Kirils L @kirjai            │
//! │ └──────────────┘                                           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Titles are inserted without escaping. They come from the blog's own
//! front matter and may carry inline markup.

use crate::config::CardConfig;
use crate::inline::FontSet;
use maud::{DOCTYPE, PreEscaped, html};

/// Everything the renderer needs apart from the per-post title and image.
#[derive(Debug, Clone)]
pub struct CardContext {
    pub fonts: FontSet,
    pub card: CardConfig,
}

impl CardContext {
    pub fn new(fonts: FontSet, card: CardConfig) -> Self {
        Self { fonts, card }
    }
}

fn font_face(family: &str, base64: &str) -> String {
    format!(
        "@font-face {{
  font-family: {family};
  font-style: normal;
  font-weight: 500;
  font-display: auto;
  src: url(data:font/woff2;charset=utf-8;base64,{base64}) format('woff2');
}}
"
    )
}

fn stylesheet(fonts: &FontSet) -> String {
    let mut css = String::new();
    css.push_str(&font_face("Karla", &fonts.karla));
    css.push_str(&font_face("Spectral", &fonts.spectral));
    css.push_str(
        ":root {
  --headerFont: 'Spectral', serif;
  --bodyFont: 'Karla', serif;
}
h1, h2, h3, h4, h5, h6 {
  font-family: var(--headerFont);
}
body {
  font-family: var(--bodyFont);
  margin: 0;
}
* {
  box-sizing: border-box;
}
",
    );
    css
}

/// Render the preview card for `title` with the portrait at `image_data_uri`.
pub fn render(ctx: &CardContext, title: &str, image_data_uri: &str) -> String {
    let card = &ctx.card;
    let body_style = format!(
        "color: {}; background-color: {}",
        card.text_color, card.background
    );
    let frame_style = format!(
        "height: {}px; overflow: hidden; display: flex; border: 10px solid {};",
        card.height, card.accent
    );
    let text_style = format!(
        "display: flex; text-align: center; align-items: center; padding: 4rem; width: {}px;",
        card.width
    );
    let rule_style = format!(
        "width: 50%; margin: 0 auto; margin-top: 2.5rem; border: 0; border-top: 2px solid {};",
        card.accent
    );

    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                style { (PreEscaped(stylesheet(&ctx.fonts))) }
            }
            body style=(body_style) {
                div style=(frame_style) {
                    div {
                        img width={ (card.portrait_width) "px" } style="max-width: 100%" src=(image_data_uri);
                    }
                    div style=(text_style) {
                        div {
                            h1 style="font-size: 4.5rem; line-height: 1; font-weight: 500; margin: 0;" {
                                (PreEscaped(title))
                            }
                            hr style=(rule_style);
                            p style="font-size: 1.5rem; line-height: 2rem; margin: 0; margin-top: 2.5rem;" {
                                (card.byline)
                            }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}
