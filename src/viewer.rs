use crate::enums::{ColorMode, DataMode, Modifiers, PointerButton, RenderMode, ResolutionMode};
use crate::palette::Palette;
use crate::quaternion::RotationMatrix;
use crate::trackball::{TrackballEngine, Viewport};
use crate::volume::{Volume, VolumeError};

use image::RgbaImage;
use tracing::debug;

/// Voxels of the active slice brighter than this are highlighted in
/// [`RenderMode::All`].
const HIGHLIGHT_THRESHOLD: u8 = 20;

const MAX_SCALE: f32 = 2.0;
const KEY_ZOOM_STEP: f32 = 0.1;
const KEY_ZOOM_MIN: f32 = 0.2;
const WHEEL_ZOOM_STEP: f32 = 0.05;
const WHEEL_ZOOM_MIN: f32 = 0.05;
const ALPHA_STEP: u8 = 10;

/// Discrete actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    ZoomIn,
    ZoomOut,
    IncreaseAlpha,
    DecreaseAlpha,
    ResetView,
    SideView,
    ToggleYLineCut,
    SetDataMode(DataMode),
    SetResolution(ResolutionMode),
    ToggleColorMode,
    ToggleRenderMode,
}

impl ViewerCommand {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'm' => Some(Self::ZoomIn),
            'n' => Some(Self::ZoomOut),
            '+' => Some(Self::IncreaseAlpha),
            '-' => Some(Self::DecreaseAlpha),
            'r' => Some(Self::ResetView),
            't' => Some(Self::SideView),
            'y' => Some(Self::ToggleYLineCut),
            _ => None,
        }
    }

    /// F1 to F3 pick the plane, F5 and F6 toggle color and render mode.
    pub fn from_function_key(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::SetDataMode(DataMode::Xy)),
            2 => Some(Self::SetDataMode(DataMode::Ey)),
            3 => Some(Self::SetDataMode(DataMode::Ex)),
            5 => Some(Self::ToggleColorMode),
            6 => Some(Self::ToggleRenderMode),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,
    Resize {
        width: f32,
        height: f32,
    },
    Command(ViewerCommand),
}

/// Moves `value` one step within `0..len`. Returns whether it moved.
fn step_index(value: &mut usize, len: usize, up: bool) -> bool {
    if up && *value + 1 < len {
        *value += 1;
        true
    } else if !up && *value > 0 {
        *value -= 1;
        true
    } else {
        false
    }
}

/// Interactive state of the stack viewer: orientation, navigation position
/// and display modes.
#[derive(Debug, Clone)]
pub struct Viewer {
    trackball: TrackballEngine,
    palette: Palette,
    /// (depth, height, width) of the low and high resolution data
    low_res_dim: (usize, usize, usize),
    high_res_dim: (usize, usize, usize),

    pub active_slice: usize,
    pub y_linecut_x: usize,
    pub y_linecut_x_high_res: usize,
    pub x_linecut_y: usize,
    pub x_linecut_y_high_res: usize,
    pub show_y_linecut: bool,
    pub viewport_scale: f32,
    pub voxel_alpha: u8,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    pub data_mode: DataMode,
    pub resolution_mode: ResolutionMode,
}

impl Viewer {
    /// Viewer for a reduced volume; linecuts start at the plane's center.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::NotReduced`] before [`Volume::reduce`] ran,
    /// the plane sizes are only known afterwards.
    pub fn new(viewport: Viewport, volume: &Volume) -> Result<Self, VolumeError> {
        if volume.reduction().is_none() {
            return Err(VolumeError::NotReduced);
        }
        let low_res_dim = volume.display_dim(ResolutionMode::LowRes);
        let high_res_dim = volume.display_dim(ResolutionMode::HighRes);
        Ok(Self {
            trackball: TrackballEngine::new(viewport),
            palette: Palette::jet(),
            low_res_dim,
            high_res_dim,
            active_slice: 0,
            y_linecut_x: low_res_dim.2 / 2,
            y_linecut_x_high_res: high_res_dim.2 / 2,
            x_linecut_y: low_res_dim.1 / 2,
            x_linecut_y_high_res: high_res_dim.1 / 2,
            show_y_linecut: false,
            viewport_scale: 1.0,
            voxel_alpha: u8::MAX,
            render_mode: RenderMode::default(),
            color_mode: ColorMode::default(),
            data_mode: DataMode::default(),
            resolution_mode: ResolutionMode::default(),
        })
    }

    pub fn trackball(&self) -> &TrackballEngine {
        &self.trackball
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn rotation_matrix(&self) -> RotationMatrix {
        self.trackball.rotation_matrix()
    }

    fn display_dim(&self) -> (usize, usize, usize) {
        match self.resolution_mode {
            ResolutionMode::LowRes => self.low_res_dim,
            ResolutionMode::HighRes => self.high_res_dim,
        }
    }

    /// Half width and height of the orthographic view volume.
    pub fn ortho_half_extent(&self) -> (f32, f32) {
        let (_, height, width) = self.display_dim();
        (
            width as f32 * self.viewport_scale,
            height as f32 * self.viewport_scale,
        )
    }

    /// Handles one input event. Returns whether the view needs a redraw.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => match button {
                PointerButton::WheelUp | PointerButton::WheelDown => {
                    let up = button == PointerButton::WheelUp;
                    if modifiers.is_empty() {
                        self.scroll(up)
                    } else if modifiers.ctrl_only() {
                        self.wheel_zoom(up)
                    } else {
                        false
                    }
                }
                _ => {
                    self.trackball.pointer_down(x, y, button, modifiers);
                    false
                }
            },
            InputEvent::PointerMove { x, y } => self.trackball.drag_to(x, y),
            InputEvent::PointerUp => {
                self.trackball.end_drag();
                false
            }
            InputEvent::Resize { width, height } => {
                self.trackball.set_viewport(Viewport::new(width, height))
            }
            InputEvent::Command(command) => self.apply(command),
        }
    }

    pub fn apply(&mut self, command: ViewerCommand) -> bool {
        debug!(?command, "viewer command");
        match command {
            ViewerCommand::ZoomIn => {
                if self.viewport_scale < MAX_SCALE {
                    self.viewport_scale += KEY_ZOOM_STEP;
                }
                true
            }
            ViewerCommand::ZoomOut => {
                if self.viewport_scale > KEY_ZOOM_MIN {
                    self.viewport_scale -= KEY_ZOOM_STEP;
                }
                true
            }
            ViewerCommand::IncreaseAlpha => {
                if self.voxel_alpha < u8::MAX - ALPHA_STEP {
                    self.voxel_alpha += ALPHA_STEP;
                    return true;
                }
                false
            }
            ViewerCommand::DecreaseAlpha => {
                if self.voxel_alpha > ALPHA_STEP {
                    self.voxel_alpha -= ALPHA_STEP;
                    return true;
                }
                false
            }
            ViewerCommand::ResetView => {
                self.trackball.reset();
                self.data_mode = DataMode::Xy;
                true
            }
            ViewerCommand::SideView => {
                self.trackball.side_view();
                self.data_mode = DataMode::Ey;
                true
            }
            ViewerCommand::ToggleYLineCut => {
                self.show_y_linecut = !self.show_y_linecut;
                true
            }
            ViewerCommand::SetDataMode(mode) => {
                self.data_mode = mode;
                true
            }
            ViewerCommand::SetResolution(resolution) => {
                self.resolution_mode = resolution;
                true
            }
            ViewerCommand::ToggleColorMode => {
                self.color_mode = match self.color_mode {
                    ColorMode::Color => ColorMode::Mono,
                    ColorMode::Mono => ColorMode::Color,
                };
                true
            }
            ViewerCommand::ToggleRenderMode => {
                self.render_mode = match self.render_mode {
                    RenderMode::All => RenderMode::Single,
                    RenderMode::Single => RenderMode::All,
                };
                true
            }
        }
    }

    /// Wheel without modifiers: steps the slice or a linecut, depending on
    /// the plane shown and whether the y linecut is visible.
    fn scroll(&mut self, up: bool) -> bool {
        let (depth, low_height, low_width) = self.low_res_dim;
        let (_, high_height, high_width) = self.high_res_dim;

        match (self.data_mode, self.resolution_mode, self.show_y_linecut) {
            (DataMode::Xy, _, false) | (DataMode::Ey, ResolutionMode::LowRes, true) => {
                step_index(&mut self.active_slice, depth, up)
            }
            (DataMode::Xy, _, true) | (DataMode::Ey, ResolutionMode::LowRes, false) => {
                step_index(&mut self.y_linecut_x, low_width, up)
            }
            (DataMode::Ey, ResolutionMode::HighRes, _) => {
                step_index(&mut self.y_linecut_x_high_res, high_width, up)
            }
            (DataMode::Ex, ResolutionMode::LowRes, _) => {
                step_index(&mut self.x_linecut_y, low_height, up)
            }
            (DataMode::Ex, ResolutionMode::HighRes, _) => {
                step_index(&mut self.x_linecut_y_high_res, high_height, up)
            }
        }
    }

    fn wheel_zoom(&mut self, up: bool) -> bool {
        if up && self.viewport_scale < MAX_SCALE {
            self.viewport_scale += WHEEL_ZOOM_STEP;
            true
        } else if !up && self.viewport_scale > WHEEL_ZOOM_MIN {
            self.viewport_scale -= WHEEL_ZOOM_STEP;
            true
        } else {
            false
        }
    }

    /// Slices drawn in the current render mode.
    pub fn visible_slices(&self) -> Vec<usize> {
        match self.render_mode {
            RenderMode::Single => vec![self.active_slice],
            RenderMode::All => (0..self.low_res_dim.0).step_by(2).collect(),
        }
    }

    /// Index of the plane shown for the current data and resolution mode.
    pub fn plane_index(&self) -> usize {
        match (self.data_mode, self.resolution_mode) {
            (DataMode::Xy, _) => self.active_slice,
            (DataMode::Ey, ResolutionMode::LowRes) => self.y_linecut_x,
            (DataMode::Ey, ResolutionMode::HighRes) => self.y_linecut_x_high_res,
            (DataMode::Ex, ResolutionMode::LowRes) => self.x_linecut_y,
            (DataMode::Ex, ResolutionMode::HighRes) => self.x_linecut_y_high_res,
        }
    }

    /// Display color of a voxel of `slice` with the given intensity.
    pub fn voxel_rgba(&self, intensity: u8, slice: usize) -> [u8; 4] {
        let [r, g, b] = self.palette.color(intensity);
        if self.render_mode == RenderMode::All
            && slice == self.active_slice
            && intensity > HIGHLIGHT_THRESHOLD
        {
            return [r, g, 0, u8::MAX];
        }
        match self.color_mode {
            ColorMode::Color => [r, g, b, self.voxel_alpha],
            ColorMode::Mono => [intensity, intensity, intensity, self.voxel_alpha],
        }
    }

    /// Colors the current plane of `volume` into an image.
    ///
    /// Rows of a linecut plane are slices. Returns `None` if the plane index
    /// lies outside the volume.
    pub fn render_plane(&self, volume: &Volume) -> Option<RgbaImage> {
        let plane = volume.get_plane(self.resolution_mode, self.data_mode, self.plane_index())?;
        let (height, width) = plane.dim();

        let pixels: Vec<u8> = plane
            .indexed_iter()
            .flat_map(|((row, _), &intensity)| {
                let slice = match self.data_mode {
                    DataMode::Xy => self.active_slice,
                    DataMode::Ex | DataMode::Ey => row,
                };
                self.voxel_rgba(intensity, slice)
            })
            .collect();

        RgbaImage::from_raw(width as u32, height as u32, pixels)
    }
}
