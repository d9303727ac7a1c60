use crate::reducer::DecimationPolicy;
use crate::trackball::Viewport;

use std::path::PathBuf;

/// Settings for loading a slice stack and viewing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Directory holding the slice images
    pub data_dir: PathBuf,
    /// Slice `n` is read from `{file_prefix}{n}.tif`
    pub file_prefix: String,
    pub slice_count: usize,
    pub viewport: Viewport,
    pub decimation: DecimationPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_prefix: "DLD".to_owned(),
            slice_count: 100,
            viewport: Viewport::default(),
            decimation: DecimationPolicy::default(),
        }
    }
}
