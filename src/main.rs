use blogsmith::computed::ComputedData;
use blogsmith::config::{self, BlogConfig};
use blogsmith::inline::{self, FontSet};
use blogsmith::screenshot::{self, ChromeBackend};
use blogsmith::site::Site;
use blogsmith::template::{self, CardContext};
use blogsmith::{filters, output};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(about = "Open Graph images, template filters and computed data for the blog")]
#[command(long_about = "\
Open Graph images, template filters and computed data for the blog

The site itself is built by the static-site generator; blogsmith covers the
parts that are code rather than content.

Site layout (stock config):

  blogsmith.toml                      # Optional, see 'blogsmith gen-config'
  src/
  ├── favicon.ico                     # Passthrough copy
  └── assets/                         # Passthrough copy
      ├── fonts/Karla-Regular.woff2   # Inlined into preview cards
      ├── fonts/Spectral-Regular.woff2
      ├── images/me.jpg               # Portrait on every card
      └── <slug>/og_image.png         # Written by 'blogsmith screenshot'

Posts file for 'screenshot' is a JSON array of [slug, title] pairs:

  [[\"hello-world\", \"Hello, World\"], [\"signals\", \"Signals in Angular\"]]

Set RUST_LOG=debug for per-page diagnostics.")]
#[command(version = version_string())]
struct Cli {
    /// Site root; all configured paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (defaults to <root>/blogsmith.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture an Open Graph image for every post in a posts file
    Screenshot {
        /// JSON array of [slug, title] pairs
        posts: PathBuf,
    },
    /// Print the preview card HTML for a title
    Render {
        title: String,
    },
    /// Format a date with the contentDate filter
    Date {
        /// YYYY-MM-DD or an RFC 3339 timestamp
        value: String,
    },
    /// Minify a stylesheet with the cssmin filter ("-" reads stdin)
    Cssmin {
        file: PathBuf,
    },
    /// Print computed data (currentYear, filterTags) for a page url as JSON
    Computed {
        url: String,
    },
    /// Copy passthrough files into the output directory
    CopyAssets {
        #[arg(long, default_value = "_site")]
        output: PathBuf,
    },
    /// List registered filters, plugins and passthrough copies
    Site,
    /// Print a stock blogsmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Screenshot { posts } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            let posts = screenshot::load_posts(&posts)?;
            let ctx = card_context(&cli.root, &config)?;
            let image = inline::image_data_uri(&cli.root.join(&config.card.image))?;
            let assets_dir = cli.root.join(&config.assets_dir);

            println!("==> Taking {} screenshots", posts.len());
            let backend = ChromeBackend::launch(&config.browser, config.card.width, config.card.height)?;
            let report = screenshot::capture(&backend, &ctx, &image, &assets_dir, &posts)?;
            output::print_capture_report(&report, &cli.root);
            if !config.browser.headless {
                println!("Browser left open, press Enter to close it");
            }
            screenshot::hold_open(&config.browser, &mut std::io::stdin().lock())?;
            drop(backend);
        }
        Command::Render { title } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            let ctx = card_context(&cli.root, &config)?;
            let image = inline::image_data_uri(&cli.root.join(&config.card.image))?;
            print!("{}", template::render(&ctx, &title, &image));
        }
        Command::Date { value } => {
            println!("{}", filters::content_date_filter(&value)?);
        }
        Command::Cssmin { file } => {
            let css = if file == Path::new("-") {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&file)?
            };
            println!("{}", filters::cssmin(&css));
        }
        Command::Computed { url } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            let data = ComputedData::for_page(&url, &config.nav.tags);
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::CopyAssets { output: output_dir } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            let site = Site::new(&config);
            let output_dir = cli.root.join(output_dir);
            println!("==> Copying passthrough files → {}", output_dir.display());
            let report = site.passthrough_copy(&cli.root, &output_dir)?;
            output::print_copy_report(&report, &output_dir);
        }
        Command::Site => {
            let config = load(&cli.root, cli.config.as_deref())?;
            output::print_site(&Site::new(&config));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the default location is optional.
fn load(root: &Path, explicit: Option<&Path>) -> Result<BlogConfig, config::ConfigError> {
    match explicit {
        Some(path) if !path.exists() => Err(config::ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file {} not found", path.display()),
        ))),
        Some(path) => config::load_config(path),
        None => config::load_config(&root.join(config::CONFIG_FILE)),
    }
}

fn card_context(root: &Path, config: &BlogConfig) -> Result<CardContext, inline::InlineError> {
    let fonts = FontSet::load(root, &config.fonts)?;
    Ok(CardContext::new(fonts, config.card.clone()))
}
