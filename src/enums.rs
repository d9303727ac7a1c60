/// Which copy of the data a plane is taken from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Normalized data at the resolution of the source rasters
    HighRes,
    /// Decimated 8-bit data
    #[default]
    LowRes,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every second slice of the stack
    All,
    /// Only the active slice
    #[default]
    Single,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Color,
    Mono,
}

/// The plane shown in single render mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// A time slice (rows x cols)
    #[default]
    Xy,
    /// Time against x along a fixed row (slices x cols)
    Ex,
    /// Time against y along a fixed column (slices x rows)
    Ey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    WheelUp,
    WheelDown,
}

/// Keyboard modifiers held while a pointer button went down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }

    pub fn ctrl_only(&self) -> bool {
        self.ctrl && !self.shift && !self.alt
    }
}
