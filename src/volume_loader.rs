use crate::{config::ViewerConfig, volume::Volume, volume::VolumeError};

use ndarray::Array2;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use web_time::Instant;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No readable slice images found")]
    NoValidImages,

    #[error("Slice {index} is {found:?} (height, width), expected {expected:?}")]
    InconsistentDimensions {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Raster shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Volume(#[from] VolumeError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// File name of slice `index`, e.g. `DLD7.tif`.
    pub fn slice_path(directory: impl AsRef<Path>, prefix: &str, index: usize) -> PathBuf {
        directory.as_ref().join(format!("{prefix}{index}.tif"))
    }

    pub fn load_from_config(config: &ViewerConfig) -> Result<Volume, VolumeLoaderError> {
        Self::load_from_directory(&config.data_dir, &config.file_prefix, config.slice_count)
    }

    /// Load `slice_count` slices named `{prefix}{n}.tif` from a directory
    ///
    /// # Errors
    ///
    /// Returns error if no slice could be decoded or decoded slices differ in
    /// size. Missing or unreadable slices are logged and stay zero-filled.
    pub fn load_from_directory(
        directory: impl AsRef<Path>,
        prefix: &str,
        slice_count: usize,
    ) -> Result<Volume, VolumeLoaderError> {
        let paths: Vec<_> = (0..slice_count)
            .map(|index| Self::slice_path(directory.as_ref(), prefix, index))
            .collect();

        Self::load_from_file_paths(&paths)
    }

    /// Load one slice per path, in order
    pub fn load_from_file_paths(paths: &[impl AsRef<Path>]) -> Result<Volume, VolumeLoaderError> {
        let started = Instant::now();
        let rasters: Vec<Option<Array2<u16>>> = paths
            .iter()
            .map(|path| match Self::decode_raster(path.as_ref()) {
                Ok(raster) => Some(raster),
                Err(err) => {
                    warn!(path = %path.as_ref().display(), "slice left empty: {err}");
                    None
                }
            })
            .collect();

        let loaded = rasters.iter().flatten().count();
        let volume = Self::build_volume(&rasters)?;
        info!(
            slices = paths.len(),
            loaded,
            dim = ?volume.dim(),
            elapsed = ?started.elapsed(),
            "slice stack loaded"
        );
        Ok(volume)
    }

    /// Build a volume from in-memory rasters (height, width)
    pub fn load_from_rasters(rasters: &[Array2<u16>]) -> Result<Volume, VolumeLoaderError> {
        let rasters: Vec<_> = rasters.iter().cloned().map(Some).collect();
        Self::build_volume(&rasters)
    }

    /// Decodes a single image as 16-bit grayscale.
    pub fn decode_raster(path: &Path) -> Result<Array2<u16>, VolumeLoaderError> {
        let image = image::open(path)?.into_luma16();
        let (width, height) = image.dimensions();
        debug!(path = %path.display(), width, height, "slice decoded");
        Ok(Array2::from_shape_vec(
            (height as usize, width as usize),
            image.into_raw(),
        )?)
    }

    fn build_volume(rasters: &[Option<Array2<u16>>]) -> Result<Volume, VolumeLoaderError> {
        let (height, width) = rasters
            .iter()
            .flatten()
            .next()
            .map(|raster| raster.dim())
            .ok_or(VolumeLoaderError::NoValidImages)?;

        Self::validate_dimensions(rasters, (height, width))?;

        let mut volume = Volume::zeros(rasters.len(), height, width);
        for (index, raster) in rasters.iter().enumerate() {
            if let Some(raster) = raster {
                volume.insert_slice(index, raster.view())?;
            }
        }

        Ok(volume)
    }

    fn validate_dimensions(
        rasters: &[Option<Array2<u16>>],
        expected: (usize, usize),
    ) -> Result<(), VolumeLoaderError> {
        let mismatch = rasters
            .iter()
            .enumerate()
            .filter_map(|(index, raster)| raster.as_ref().map(|r| (index, r.dim())))
            .find(|(_, dim)| *dim != expected);

        match mismatch {
            Some((index, found)) => Err(VolumeLoaderError::InconsistentDimensions {
                index,
                expected,
                found,
            }),
            None => Ok(()),
        }
    }
}
