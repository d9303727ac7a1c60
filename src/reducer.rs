use ndarray::{Array3, Zip};
use std::fmt;
use tracing::{debug, info};
use web_time::Instant;

/// Upper end of the display range.
pub const DISPLAY_MAX: f32 = 255.0;

/// Block summing applied to square slices of side `block * target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimationPolicy {
    /// Edge length of the block summed into one output sample
    pub block: usize,
    /// Edge length of a decimated slice
    pub target: usize,
}

impl Default for DecimationPolicy {
    fn default() -> Self {
        Self {
            block: 4,
            target: 128,
        }
    }
}

impl DecimationPolicy {
    /// Slice edge length this policy decimates.
    pub fn source_side(&self) -> usize {
        self.block * self.target
    }
}

/// Why a volume kept its source resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotSquare { width: usize, height: usize },
    UnsupportedSide { side: usize, expected: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotSquare { width, height } => {
                write!(f, "slices are {width}x{height}, decimation needs square slices")
            }
            SkipReason::UnsupportedSide { side, expected } => {
                write!(f, "slice side is {side}, decimation needs {expected}")
            }
        }
    }
}

/// Outcome of [`IntensityReducer::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    /// 8-bit volume of shape (depth, target, target)
    Decimated(Array3<u8>),
    /// The normalized volume is displayed as is
    Skipped(SkipReason),
}

pub struct IntensityReducer;

impl IntensityReducer {
    #[inline]
    fn rescale(value: f32, max: f32) -> f32 {
        (DISPLAY_MAX * value / max).round()
    }

    /// Rescales every sample to `round(255 * sample / max)` in place.
    ///
    /// The maximum starts at 1, so an all-zero volume stays all zero.
    /// Returns the maximum that was used.
    pub fn normalize(data: &mut Array3<u16>) -> u16 {
        let max_count = data.iter().copied().fold(1, u16::max);
        let max = max_count as f32;
        data.mapv_inplace(|v| Self::rescale(v as f32, max) as u16);
        max_count
    }

    /// Sums each `block x block` tile of every slice into one sample.
    ///
    /// `data` is (depth, height, width). Sums can exceed 255, hence `u32`.
    pub fn decimate(
        data: &Array3<u16>,
        policy: DecimationPolicy,
    ) -> Result<Array3<u32>, SkipReason> {
        let (depth, height, width) = data.dim();
        if width != height {
            return Err(SkipReason::NotSquare { width, height });
        }
        if width != policy.source_side() || policy.block == 0 {
            return Err(SkipReason::UnsupportedSide {
                side: width,
                expected: policy.source_side(),
            });
        }

        let mut sums = Array3::<u32>::zeros((depth, policy.target, policy.target));
        Zip::from(&mut sums)
            .and(data.exact_chunks((1, policy.block, policy.block)))
            .for_each(|sum, tile| {
                *sum = tile.iter().map(|&v| v as u32).sum();
            });
        Ok(sums)
    }

    /// Rescales against the buffer's own maximum and narrows to 8 bit.
    pub fn to_display_range(sums: &Array3<u32>) -> Array3<u8> {
        let max = sums.iter().copied().fold(1, u32::max) as f32;
        sums.mapv(|v| Self::rescale(v as f32, max) as u8)
    }

    /// Normalizes `data` in place, then decimates and renormalizes it when
    /// the slice shape matches `policy`.
    ///
    /// The global maximum is always taken before decimation. A skipped
    /// decimation is not an error, `data` then holds the displayable volume.
    pub fn reduce(data: &mut Array3<u16>, policy: DecimationPolicy) -> Reduction {
        let started = Instant::now();
        let max_count = Self::normalize(data);
        debug!(max_count, elapsed = ?started.elapsed(), "volume normalized");

        match Self::decimate(data, policy) {
            Ok(sums) => {
                let reduced = Self::to_display_range(&sums);
                debug!(shape = ?reduced.dim(), elapsed = ?started.elapsed(), "volume decimated");
                Reduction::Decimated(reduced)
            }
            Err(reason) => {
                info!("decimation skipped, keeping source resolution: {reason}");
                Reduction::Skipped(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn normalize_stretches_to_full_range() {
        let mut data = array![[[0u16, 0, 0, 0], [0, 100, 0, 0], [0, 0, 200, 0], [0, 0, 0, 0]]];
        let max = IntensityReducer::normalize(&mut data);
        assert_eq!(max, 200);
        assert_eq!(data[[0, 1, 1]], 128);
        assert_eq!(data[[0, 2, 2]], 255);
        assert_eq!(data[[0, 0, 0]], 0);
    }

    #[test]
    fn normalize_of_zeros_is_zeros() {
        let mut data = Array3::<u16>::zeros((2, 3, 3));
        assert_eq!(IntensityReducer::normalize(&mut data), 1);
        assert!(data.iter().all(|&v| v == 0));
    }

    #[test]
    fn decimate_sums_tiles() {
        let policy = DecimationPolicy {
            block: 2,
            target: 2,
        };
        let slice: Array2<u16> = array![[1, 1, 2, 2], [1, 1, 2, 2], [3, 3, 0, 0], [3, 3, 0, 4]];
        let data = slice.insert_axis(ndarray::Axis(0));
        let sums = IntensityReducer::decimate(&data, policy).expect("square input");
        assert_eq!(sums, array![[[4, 8], [12, 4]]]);
    }

    #[test]
    fn decimate_rejects_other_shapes() {
        let policy = DecimationPolicy::default();
        let wide = Array3::<u16>::zeros((1, 256, 512));
        assert_eq!(
            IntensityReducer::decimate(&wide, policy),
            Err(SkipReason::NotSquare {
                width: 512,
                height: 256
            })
        );
        let small = Array3::<u16>::zeros((1, 256, 256));
        assert_eq!(
            IntensityReducer::decimate(&small, policy),
            Err(SkipReason::UnsupportedSide {
                side: 256,
                expected: 512
            })
        );
    }

    #[test]
    fn display_range_hits_255() {
        let sums = array![[[0u32, 2040], [4080, 1020]]];
        let reduced = IntensityReducer::to_display_range(&sums);
        assert_eq!(reduced, array![[[0u8, 128], [255, 64]]]);
    }
}
