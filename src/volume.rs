use crate::enums::{DataMode, ResolutionMode};
use crate::reducer::{DecimationPolicy, IntensityReducer, Reduction};

use ndarray::{Array2, Array3, ArrayView2, s};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VolumeError {
    #[error("Slice index {index} out of range for {depth} slices")]
    SliceOutOfRange { index: usize, depth: usize },

    #[error("Raster is {found:?} (height, width), volume slices are {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Volume was already reduced")]
    AlreadyReduced,

    #[error("Volume has not been reduced yet")]
    NotReduced,
}

/// A stack of detector-count slices, stored as (depth, height, width).
///
/// Raw counts are filled in slice by slice, then [`Volume::reduce`] rescales
/// them once into the display range and derives the decimated copy.
#[derive(Debug, Default)]
pub struct Volume {
    data: Array3<u16>,
    reduction: Option<Reduction>,
}

impl Volume {
    pub fn new(data: Array3<u16>) -> Self {
        Self {
            data,
            reduction: None,
        }
    }

    /// A zero-filled volume awaiting its slices.
    pub fn zeros(depth: usize, height: usize, width: usize) -> Self {
        Self::new(Array3::zeros((depth, height, width)))
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Raw counts before [`Volume::reduce`], the normalized volume after it.
    pub fn data(&self) -> &Array3<u16> {
        &self.data
    }

    /// Copies `raster` (height, width) into slice `index`.
    pub fn insert_slice(
        &mut self,
        index: usize,
        raster: ArrayView2<'_, u16>,
    ) -> Result<(), VolumeError> {
        if self.reduction.is_some() {
            return Err(VolumeError::AlreadyReduced);
        }
        let (depth, height, width) = self.dim();
        if index >= depth {
            return Err(VolumeError::SliceOutOfRange { index, depth });
        }
        if raster.dim() != (height, width) {
            return Err(VolumeError::DimensionMismatch {
                expected: (height, width),
                found: raster.dim(),
            });
        }
        self.data.slice_mut(s![index, .., ..]).assign(&raster);
        Ok(())
    }

    /// Runs the reduction pipeline. Only the first call does any work.
    pub fn reduce(&mut self, policy: DecimationPolicy) -> &Reduction {
        if self.reduction.is_some() {
            warn!("volume already reduced, keeping the first result");
        }
        self.reduction
            .get_or_insert_with(|| IntensityReducer::reduce(&mut self.data, policy))
    }

    pub fn reduction(&self) -> Option<&Reduction> {
        self.reduction.as_ref()
    }

    /// The decimated 8-bit volume, if decimation ran.
    pub fn reduced(&self) -> Option<&Array3<u8>> {
        match &self.reduction {
            Some(Reduction::Decimated(reduced)) => Some(reduced),
            _ => None,
        }
    }

    /// Dimensions of the data a plane in `resolution` is cut from.
    pub fn display_dim(&self, resolution: ResolutionMode) -> (usize, usize, usize) {
        match (resolution, self.reduced()) {
            (ResolutionMode::LowRes, Some(reduced)) => reduced.dim(),
            _ => self.dim(),
        }
    }

    #[inline]
    fn narrow_to_u8(value: u16) -> u8 {
        value.min(u8::MAX as u16) as u8
    }

    /// Cuts one plane out of the volume as display intensities.
    ///
    /// `LowRes` falls back to the normalized volume when decimation was
    /// skipped. Returns `None` for an index outside the volume.
    pub fn get_plane(
        &self,
        resolution: ResolutionMode,
        mode: DataMode,
        index: usize,
    ) -> Option<Array2<u8>> {
        match (resolution, self.reduced()) {
            (ResolutionMode::LowRes, Some(reduced)) => {
                Self::get_slice_from_axis(reduced, mode, index).map(|plane| plane.to_owned())
            }
            _ => Self::get_slice_from_axis(&self.data, mode, index)
                .map(|plane| plane.mapv(Self::narrow_to_u8)),
        }
    }

    pub fn get_slice_from_axis<A>(
        data: &Array3<A>,
        mode: DataMode,
        index: usize,
    ) -> Option<ArrayView2<'_, A>> {
        if !Self::is_valid_index(data.dim(), index, mode) {
            return None;
        }
        let slice_result = match mode {
            DataMode::Xy => data.slice(s![index, .., ..]),
            DataMode::Ex => data.slice(s![.., index, ..]),
            DataMode::Ey => data.slice(s![.., .., index]),
        };
        Some(slice_result)
    }

    fn is_valid_index(dim: (usize, usize, usize), index: usize, mode: DataMode) -> bool {
        let max_index = match mode {
            DataMode::Xy => dim.0,
            DataMode::Ex => dim.1,
            DataMode::Ey => dim.2,
        };
        index < max_index
    }
}
