use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::GalleryConfig;
use crate::models::MediaItem;
use crate::rebuild::{GalleryView, RebuildController};
use crate::resolver::ImageHeaderResolver;
use crate::scanner::{scan_images, ScanConfig};

const USAGE: &str = "\
Usage: jgal <directory> --width <px> [options]

Options:
  --width <px>                 Container width to lay out for
  --target-row-height <px>     Row height to aim for (default 300)
  --bandwidth <px>             Allowed row height deviation (default 50)
  --justify-last-row           Stretch the trailing row to full width
  --gutter <px>                Spacing between items (default 10)
  --full-width-cadence <n>     Every nth eligible row is one full-width item
  --rebuild-sensitivity <px>   Width change that triggers a rebuild (default 50)
  --seed <n>                   Seed for reproducible row breaks
  --resize <px>                Replay a container resize (repeatable)
  --max-depth <n>              Limit directory recursion depth
  --no-recursive               Only scan the top-level directory
  --help                       Show this message";

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub path: PathBuf,
    pub width: f64,
    pub resizes: Vec<f64>,
    pub scan: ScanConfig,
    pub config: GalleryConfig,
}

fn next_value<I, T>(args: &mut I, flag: &str) -> Result<T>
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
{
    let value = args
        .next()
        .with_context(|| format!("Missing value for {}", flag))?;
    value
        .parse::<T>()
        .ok()
        .with_context(|| format!("Failed to parse {} value {:?}", flag, value))
}

/// Parses command-line arguments on top of `base`. Returns `None` when
/// help was requested.
pub fn parse_args<I>(args: I, base: GalleryConfig) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut path: Option<PathBuf> = None;
    let mut width: Option<f64> = None;
    let mut resizes = Vec::new();
    let mut scan = ScanConfig::default();
    let mut config = base;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--width" => width = Some(next_value(&mut args, "--width")?),
            "--target-row-height" => {
                config.target_row_height = next_value(&mut args, "--target-row-height")?
            }
            "--bandwidth" => config.row_height_bandwidth = next_value(&mut args, "--bandwidth")?,
            "--justify-last-row" => config.justify_last_row = true,
            "--gutter" => config.gutter = next_value(&mut args, "--gutter")?,
            "--full-width-cadence" => {
                config.full_width_cadence = next_value(&mut args, "--full-width-cadence")?
            }
            "--rebuild-sensitivity" => {
                config.rebuild_sensitivity = next_value(&mut args, "--rebuild-sensitivity")?
            }
            "--seed" => config.seed = Some(next_value(&mut args, "--seed")?),
            "--resize" => resizes.push(next_value(&mut args, "--resize")?),
            "--max-depth" => scan.max_depth = next_value(&mut args, "--max-depth")?,
            "--no-recursive" => scan.recursive = false,
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            _ => {
                if path.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                path = Some(PathBuf::from(arg));
            }
        }
    }

    let path = path.context("Missing <directory> argument")?;
    let width = width.context("Missing --width <px>")?;
    config.validate().context("Invalid gallery configuration")?;

    Ok(Some(CliArgs {
        path,
        width,
        resizes,
        scan,
        config,
    }))
}

/// Entry point of the binary. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = match parse_args(std::env::args().skip(1), GalleryConfig::from_env())? {
        Some(args) => args,
        None => {
            println!("{}", USAGE);
            return Ok(0);
        }
    };

    let items = scan_images(&args.path, &args.scan).await?;
    if items.is_empty() {
        warn!("No images found in {}", args.path.display());
        return Ok(0);
    }

    let outcome = lay_out(&args, items.clone()).await?;
    print!("{}", render_report(&args, &items, &outcome));
    Ok(0)
}

/// Final state after all resizes were replayed.
struct Outcome {
    view: GalleryView,
    generation: u64,
    container_width: f64,
}

/// Mounts the gallery, replays the resizes, and waits for the last build.
async fn lay_out(args: &CliArgs, items: Vec<MediaItem>) -> Result<Outcome> {
    let mut view = GalleryView::new(items.len());
    let (mut controller, rx) =
        RebuildController::new(args.config.clone(), ImageHeaderResolver::new(), items);

    controller.mount(args.width)?;
    for &width in &args.resizes {
        match controller.on_resize(width)? {
            Some(generation) => info!(width, generation, "Resize triggered rebuild"),
            None => info!(width, "Resize within band"),
        }
    }
    controller.wait().await;
    view.drain(&rx);

    if let Some(error) = view.error() {
        bail!("Layout failed: {}", error);
    }
    Ok(Outcome {
        view,
        generation: controller.generation(),
        container_width: controller.container_width().unwrap_or(args.width),
    })
}

fn render_report(args: &CliArgs, items: &[MediaItem], outcome: &Outcome) -> String {
    let view = &outcome.view;
    let mut out = format!(
        "# {} images, container {}px, gutter {}px, generation {}, {} rows\n",
        items.len(),
        outcome.container_width,
        args.config.gutter,
        outcome.generation,
        view.row_count()
    );

    let mut row = 0u32;
    for (index, item) in items.iter().enumerate() {
        match view.placement(index) {
            Some(placement) => {
                if placement.starts_row() {
                    out.push_str(&format!("row {}\n", row));
                    row += 1;
                }
                out.push_str(&format!("  {}  {}\n", item.display_name(), placement));
            }
            None => out.push_str(&format!("  {}  skipped\n", item.display_name())),
        }
    }
    out
}
