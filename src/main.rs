use clap::{Parser, Subcommand};
use simple_folio::app::{App, AppOptions, Site};
use simple_folio::config::{self, ViewerConfig};
use simple_folio::content::{self, FileSource};
use simple_folio::input::Key;
use simple_folio::lazyload::{ImageId, LoadResult, Rect};
use simple_folio::lightbox::LightboxInput;
use simple_folio::router::{self, MemoryLocation};
use simple_folio::view::View;
use simple_folio::{html, output};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Navigation and view-state engine for a single-page photo portfolio")]
#[command(long_about = "\
Navigation and view-state engine for a single-page photo portfolio

The site is driven by one JSON content document and the URL fragment:

  #home  (or empty)        gallery grid, optional hero
  #gallery/<name>          one gallery, images open in a lightbox
  #contact                 contact details

Content document:

  {
    \"pageName\": \"Jane Doe\",
    \"hero\": { \"title\": \"Light\", \"subtitle\": \"…\", \"ctaText\": \"Say hello\",
              \"backgroundImage\": \"bg.jpg\" },
    \"galleries\": {
      \"alps-trip\": { \"images\": [\"alps/1.jpg\"], \"tags\": [\"travel\"],
                     \"description\": \"…\" }
    },
    \"contact\": { \"email\": \"jane@example.com\", \"links\": { \"Instagram\": \"…\" } }
  }

'render' replays interaction steps against the engine and prints the
resulting HTML document on stdout, with a state summary on stderr.

Run 'simple-folio gen-config' to generate a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Viewer config file [default: ./folio.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site at a fragment, after replaying interaction steps
    Render {
        /// Content document [default: content_path from config]
        #[arg(long)]
        content: Option<PathBuf>,
        /// Initial URL fragment, e.g. '#gallery/alps-trip'
        #[arg(long, default_value = "")]
        fragment: String,
        /// Interaction step, repeatable: click:<id>, press:<id>:<key>,
        /// key:<key>, goto:<fragment>, swipe:<dx>, back, forward, reveal
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<Step>,
    },
    /// Parse a fragment and print the route it resolves to
    Route {
        /// URL fragment, with or without '#'
        fragment: String,
    },
    /// Validate a content document and summarize it
    Check {
        /// Content document [default: content_path from config]
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

/// One simulated user or host interaction.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Click(String),
    Press(String, Key),
    Key(Key),
    Goto(String),
    Swipe(f64),
    Back,
    Forward,
    /// Scroll every image of the visible page into view and load it.
    Reveal,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = s.split_once(':').unwrap_or((s, ""));
        let step = match (kind, arg) {
            ("back", "") => Step::Back,
            ("forward", "") => Step::Forward,
            ("reveal", "") => Step::Reveal,
            ("click", id) if !id.is_empty() => Step::Click(id.to_string()),
            ("key", key) if !key.is_empty() => Step::Key(Key::parse(key)),
            ("goto", fragment) => Step::Goto(fragment.to_string()),
            ("press", rest) => match rest.split_once(':') {
                Some((id, key)) if !id.is_empty() && !key.is_empty() => {
                    Step::Press(id.to_string(), Key::parse(key))
                }
                _ => return Err(format!("expected press:<id>:<key>, got '{s}'")),
            },
            ("swipe", dx) => Step::Swipe(
                dx.parse()
                    .map_err(|_| format!("expected swipe:<pixels>, got '{s}'"))?,
            ),
            _ => return Err(format!("unknown step '{s}'")),
        };
        Ok(step)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            content,
            fragment,
            steps,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let path = content.unwrap_or_else(|| PathBuf::from(&config.content_path));
            let location = MemoryLocation::new(&fragment);
            let site = Site::start(
                App::new(AppOptions::from(&config)),
                location.clone(),
                &FileSource::new(path),
            );
            for step in &steps {
                replay(&site, &location, step);
            }
            let app = site.app();
            println!("{}", html::render_document(&app).into_string());
            output::print_page_summary(&app);
        }
        Command::Route { fragment } => {
            output::print_route(&router::parse(&fragment));
        }
        Command::Check { content } => {
            let config = resolve_config(cli.config.as_deref())?;
            let path = content.unwrap_or_else(|| PathBuf::from(&config.content_path));
            println!("==> Checking {}", path.display());
            let doc = content::load(&FileSource::new(&path)).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "content document is invalid");
            })?;
            output::print_check(&doc);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--config` when given, else `folio.toml` in the working directory. A
/// missing file means stock defaults.
fn resolve_config(path: Option<&Path>) -> Result<ViewerConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn replay(site: &Site, location: &MemoryLocation, step: &Step) {
    let handled = match step {
        Step::Click(id) => site.click(id),
        Step::Press(id, key) => site.press(id, key.clone()),
        Step::Key(key) => site.key(key.clone()),
        Step::Goto(fragment) => {
            site.navigate(fragment);
            true
        }
        Step::Swipe(dx) => {
            site.lightbox_input(LightboxInput::PointerDown { x: 0.0 });
            site.lightbox_input(LightboxInput::PointerUp { x: *dx })
        }
        Step::Back => {
            let moved = location.back();
            if moved {
                site.fragment_changed();
            }
            moved
        }
        Step::Forward => {
            let moved = location.forward();
            if moved {
                site.fragment_changed();
            }
            moved
        }
        Step::Reveal => {
            let visible: Vec<ImageId> = {
                let app = site.app();
                app.active_page()
                    .and_then(|page| app.container(page).view())
                    .map(View::image_ids)
                    .unwrap_or_default()
            };
            let viewport = Rect::new(0.0, 0.0, 1.0, 1.0);
            let commits = site.scroll(viewport, |id| visible.contains(&id).then_some(viewport));
            for commit in &commits {
                site.image_loaded(commit.id, LoadResult::Ok);
            }
            !commits.is_empty()
        }
    };
    if !handled {
        info!(?step, "step had no effect");
    }
}
