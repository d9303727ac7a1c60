use crate::enums::{Modifiers, PointerButton};
use crate::quaternion::{Quaternion, RotationMatrix};
use crate::vector::Vector3;

use std::f32::consts::FRAC_PI_2;
use tracing::{debug, warn};

/// Pixel size of the window the pointer coordinates refer to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Maps a pixel position onto the unit arcball.
    ///
    /// Both axes are scaled to [-1, 1] with y pointing up. Positions outside
    /// the ball's silhouette land on its equator (z = 0).
    pub fn project(&self, x: f32, y: f32) -> Vector3 {
        let px = x / (self.width / 2.0) - 1.0;
        let py = 1.0 - y / (self.height / 2.0);

        let radicand = 1.0 - px * px - py * py;
        let pz = if radicand >= 0.0 { radicand.sqrt() } else { 0.0 };

        Vector3::new(px, py, pz).normalize()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Angle between two unit vectors given their dot product.
///
/// The dot product is clamped to [-1, 1] first, rounding can push it
/// slightly outside and `acos` would return NaN.
#[inline]
pub fn arc_angle(dot: f32) -> f32 {
    dot.clamp(-1.0, 1.0).acos()
}

/// Rotation carrying the arcball point `start` onto `end`.
pub fn incremental_rotation(start: Vector3, end: Vector3) -> Quaternion {
    let angle = arc_angle(start.dot(&end));
    let axis = end.cross(&start);
    Quaternion::from_axis_angle(angle, axis)
}

/// Arcball state: the orientation of the current gesture on top of the
/// orientation committed by all previous gestures.
#[derive(Debug, Default, Clone)]
pub struct TrackballEngine {
    current: Quaternion,
    previous: Quaternion,
    start_vector: Vector3,
    end_vector: Vector3,
    state: DragState,
    viewport: Viewport,
}

impl TrackballEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switches to a resized viewport. Degenerate sizes are ignored and the
    /// previous viewport stays; returns whether it was taken.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            warn!(?viewport, "ignoring degenerate viewport");
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn current(&self) -> Quaternion {
        self.current
    }

    pub fn previous(&self) -> Quaternion {
        self.previous
    }

    pub fn start_vector(&self) -> Vector3 {
        self.start_vector
    }

    pub fn end_vector(&self) -> Vector3 {
        self.end_vector
    }

    /// The model rotation, derived from the current orientation.
    pub fn rotation_matrix(&self) -> RotationMatrix {
        self.current.to_rotation_matrix()
    }

    /// Starts a drag if the primary button went down without modifiers.
    ///
    /// Returns whether a drag was started.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        if button != PointerButton::Primary || !modifiers.is_empty() {
            return false;
        }
        self.begin_drag(x, y);
        true
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.start_vector = self.viewport.project(x, y);
        self.state = DragState::Dragging;
        debug!(x, y, start = ?self.start_vector, "trackball drag started");
    }

    /// Rotates by the arc from the drag start to `(x, y)`, relative to the
    /// orientation committed before the drag began.
    ///
    /// Ignored unless a drag is active; returns whether the rotation changed.
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let end_vector = self.viewport.project(x, y);
        let increment = incremental_rotation(self.start_vector, end_vector);
        if !increment.is_finite() {
            return false;
        }
        self.end_vector = end_vector;
        self.apply_increment(increment);
        true
    }

    /// Ends the active drag and commits its orientation as the new baseline.
    pub fn end_drag(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.commit();
        self.state = DragState::Idle;
        debug!(orientation = ?self.previous, "trackball drag committed");
        true
    }

    /// Sets `current = increment * previous`, normalized.
    pub fn apply_increment(&mut self, increment: Quaternion) {
        self.current = (increment * self.previous).normalize();
    }

    pub fn commit(&mut self) {
        self.previous = self.current;
    }

    /// Back to the identity orientation.
    pub fn reset(&mut self) {
        self.current.reset();
        self.previous.reset();
    }

    /// Resets, then turns a quarter around +y followed by a quarter around -z.
    pub fn side_view(&mut self) {
        self.reset();

        self.apply_increment(Quaternion::from_axis_angle(FRAC_PI_2, Vector3::Y));
        self.commit();

        self.apply_increment(Quaternion::from_axis_angle(FRAC_PI_2, -Vector3::Z));
        self.commit();
    }
}
