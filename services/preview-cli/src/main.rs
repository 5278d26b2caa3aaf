//! Command-line front end for the catalog map preview.
//!
//! Loads a widget configuration blob and runs one stage of the preview
//! pipeline against it: scene composition, colormap derivation, point
//! queries, or tilejson inspection.

mod commands;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colormap::{BuildStrategy, ColorRamp};
use preview_common::{GlobalConfig, LngLat};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use commands::Settings;

#[derive(Parser, Debug)]
#[command(name = "preview-cli")]
#[command(about = "Inspect catalog map previews")]
struct Args {
    /// Tile service base URL
    #[arg(long, env = "TITILER_URL")]
    titiler_url: Option<String>,

    /// Host global configuration blob (overrides environment settings)
    #[arg(long)]
    global_config: Option<PathBuf>,

    /// Named color ramp for raster layers
    #[arg(long, default_value = "blues")]
    ramp: String,

    /// Use 256-step colormaps instead of one entry per ramp anchor
    #[arg(long)]
    continuous: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sources and style layers registered for a scene
    Compose {
        /// Widget configuration blob
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the rescale window and colormap of a raster layer
    Colormap {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        layer: String,

        /// Expand to all 256 bins the way the tile service does
        #[arg(long)]
        expand: bool,
    },

    /// Sample the scene's raster at a coordinate and print the popup
    Point {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },

    /// Fetch the tilejson document for a raster layer
    Inspect {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        layer: String,
    },
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn settings(args: &Args) -> Result<Settings> {
    let mut global = match &args.global_config {
        Some(path) => {
            let blob = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read global config {}", path.display()))?;
            GlobalConfig::from_legacy_str(&blob).context("Invalid global config")?
        }
        None => GlobalConfig::from_env().context("Invalid environment configuration")?,
    };
    if let Some(url) = &args.titiler_url {
        global.titiler_url = url.clone();
        global.validate()?;
    }
    debug!(titiler_url = %global.titiler_url, "Using tile service");

    let ramp = ColorRamp::named(&args.ramp)?;
    let strategy = if args.continuous {
        BuildStrategy::Continuous
    } else {
        BuildStrategy::Discrete
    };

    Ok(Settings {
        global,
        ramp,
        strategy,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;
    let settings = settings(&args)?;

    match &args.command {
        Command::Compose { config } => {
            let preview = commands::load_preview(config, &settings)?;
            println!("{}", serde_json::to_string_pretty(&commands::compose(&preview)?)?);
        }
        Command::Colormap {
            config,
            layer,
            expand,
        } => {
            let preview = commands::load_preview(config, &settings)?;
            let style = commands::colormap(&preview, layer, *expand)?;
            println!("{}", serde_json::to_string_pretty(&style)?);
        }
        Command::Point { config, lng, lat } => {
            let preview = commands::load_preview(config, &settings)?;
            if let Some(html) = commands::point(&preview, LngLat::new(*lng, *lat)).await? {
                println!("{}", html);
            }
        }
        Command::Inspect { config, layer } => {
            let preview = commands::load_preview(config, &settings)?;
            let doc = commands::inspect(&preview, layer).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}
