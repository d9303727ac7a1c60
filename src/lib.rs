//! # DLD-volume library
//!
//! This crate serves the core of an interactive viewer for time-stacks of
//! detector-count images (one 16-bit raster per time slice).
//!
//! Two parts do the heavy lifting:
//!  - An arcball trackball ([`TrackballEngine`]) that turns pointer drags
//!    into a quaternion rotation and exposes it as a column-major 4x4
//!    matrix for the renderer's model transform.
//!  - An intensity reduction pipeline ([`IntensityReducer`]) that rescales
//!    raw counts into the 0-255 display range and box-sums 512x512 slices
//!    down to 128x128.
//!
//!  Slices are read from a directory of TIFF files named `{prefix}{n}.tif`.
//!  Missing slices stay zero-filled. The [`Viewer`] ties the trackball to
//!  slice navigation and renders the current plane (a time slice or a
//!  time-vs-space linecut) through a jet color palette.
//!
//!  Everything runs on the caller's thread; the reduced volume is complete
//!  before [`Volume::reduce`] returns.
//!
//! # Examples
//!
//! ## Loading a stack and rendering the active slice
//!
//! ```no_run
//! # use dld_volume::{DecimationPolicy, Viewer, VolumeLoader, Viewport};
//! let mut volume = VolumeLoader::load_from_directory("data", "DLD", 100)
//!     .expect("should have loaded slices from directory");
//! volume.reduce(DecimationPolicy::default());
//! let viewer = Viewer::new(Viewport::default(), &volume)
//!     .expect("should have built a viewer for the reduced volume");
//! let image = viewer
//!     .render_plane(&volume)
//!     .expect("should have rendered the first slice");
//! image.save("slice.png").expect("should have written the image");
//! ```
//!
//! ## Rotating with the trackball
//!
//! ```
//! # use dld_volume::{TrackballEngine, Viewport};
//! let mut trackball = TrackballEngine::new(Viewport::new(512.0, 512.0));
//! trackball.begin_drag(256.0, 256.0);
//! trackball.drag_to(320.0, 240.0);
//! trackball.end_drag();
//! let matrix = trackball.rotation_matrix();
//! assert_eq!(matrix.as_bytes().len(), 64);
//! ```

pub mod config;
pub mod enums;
pub mod palette;
pub mod quaternion;
pub mod reducer;
pub mod trackball;
pub mod vector;
pub mod viewer;
pub mod volume;
pub mod volume_loader;

pub use config::ViewerConfig;
pub use palette::Palette;
pub use quaternion::{Quaternion, RotationMatrix};
pub use reducer::{DecimationPolicy, IntensityReducer, Reduction, SkipReason};
pub use trackball::{TrackballEngine, Viewport};
pub use vector::Vector3;
pub use viewer::{InputEvent, Viewer, ViewerCommand};
pub use volume::{Volume, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
