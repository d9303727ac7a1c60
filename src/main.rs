use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dld_volume::{
    Reduction, Viewer, ViewerCommand, ViewerConfig, VolumeLoader,
    enums::{DataMode, ResolutionMode},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Plane {
    /// A time slice
    Xy,
    /// Time against x at the center row
    Ex,
    /// Time against y at the center column
    Ey,
}

impl From<Plane> for DataMode {
    fn from(plane: Plane) -> Self {
        match plane {
            Plane::Xy => DataMode::Xy,
            Plane::Ex => DataMode::Ex,
            Plane::Ey => DataMode::Ey,
        }
    }
}

/// Reduce a stack of detector-count TIFF slices and render one plane
#[derive(Parser)]
#[command(name = "dld-volume")]
#[command(version)]
struct Cli {
    /// Directory holding the slice images
    #[arg(short, long, env = "DLD_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Slice `n` is read from `{prefix}{n}.tif`
    #[arg(short, long, env = "DLD_FILE_PREFIX", default_value = "DLD")]
    prefix: String,

    /// Number of slices in the stack
    #[arg(short = 'n', long, env = "DLD_SLICES", default_value_t = 100)]
    slices: usize,

    /// Active slice
    #[arg(short, long, default_value_t = 0)]
    slice: usize,

    /// Plane to render [default: xy, or ey with --side-view]
    #[arg(short, long, value_enum)]
    mode: Option<Plane>,

    /// Render from the normalized full resolution data
    #[arg(long)]
    high_res: bool,

    /// Grey instead of the jet palette
    #[arg(long)]
    mono: bool,

    /// Turn the trackball to the side view
    #[arg(long)]
    side_view: bool,

    /// Where to write the rendered plane
    #[arg(short, long, default_value = "plane.png")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ViewerConfig {
        data_dir: cli.data_dir,
        file_prefix: cli.prefix,
        slice_count: cli.slices,
        ..ViewerConfig::default()
    };

    let mut volume = VolumeLoader::load_from_config(&config)
        .with_context(|| format!("failed to load slices from {}", config.data_dir.display()))?;

    match volume.reduce(config.decimation) {
        Reduction::Decimated(reduced) => info!(dim = ?reduced.dim(), "volume decimated"),
        Reduction::Skipped(reason) => info!("showing source resolution: {reason}"),
    }

    let mut viewer = Viewer::new(config.viewport, &volume)?;
    if cli.side_view {
        viewer.apply(ViewerCommand::SideView);
    }
    if let Some(plane) = cli.mode {
        viewer.apply(ViewerCommand::SetDataMode(plane.into()));
    }
    if cli.high_res {
        viewer.apply(ViewerCommand::SetResolution(ResolutionMode::HighRes));
    }
    if cli.mono {
        viewer.apply(ViewerCommand::ToggleColorMode);
    }
    viewer.active_slice = cli.slice;

    debug!(matrix = ?viewer.rotation_matrix().as_array(), "model rotation");

    let image = viewer
        .render_plane(&volume)
        .with_context(|| format!("plane {} is outside the volume", viewer.plane_index()))?;
    image
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "plane written");

    Ok(())
}
