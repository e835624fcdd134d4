use crate::geometry::Size;

/// Display rotation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Next rotation in cyclic order, 270 wraps to 0.
    pub const fn advance(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Maps a logical point to the native panel frame of size `native`.
    pub const fn to_native(self, native: Size, x: u16, y: u16) -> (u16, u16) {
        let (w, h) = (native.width, native.height);
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        }
    }

    /// Maps a point of the native panel frame to logical coordinates.
    pub const fn to_logical(self, native: Size, x: u16, y: u16) -> (u16, u16) {
        let (w, h) = (native.width, native.height);
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, w - 1 - x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (h - 1 - y, x),
        }
    }
}

/// Hardware scan flags of the panel controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelOrientation {
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub swap_xy: bool,
}

impl PanelOrientation {
    pub const fn new(mirror_x: bool, mirror_y: bool, swap_xy: bool) -> Self {
        Self {
            mirror_x,
            mirror_y,
            swap_xy,
        }
    }

    /// Flags presenting `rotation` on a panel whose upright flags are `self`.
    pub const fn rotated(self, rotation: Rotation) -> Self {
        let Self {
            mirror_x,
            mirror_y,
            swap_xy,
        } = self;
        match rotation {
            Rotation::Deg0 => self,
            Rotation::Deg90 if swap_xy => Self::new(mirror_x, !mirror_y, !swap_xy),
            Rotation::Deg90 => Self::new(!mirror_x, mirror_y, !swap_xy),
            Rotation::Deg180 => Self::new(!mirror_x, !mirror_y, swap_xy),
            Rotation::Deg270 if swap_xy => Self::new(!mirror_x, mirror_y, !swap_xy),
            Rotation::Deg270 => Self::new(mirror_x, !mirror_y, !swap_xy),
        }
    }
}

/// Rotation state machine, lives inside the lock-guarded UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationControl {
    current: Rotation,
    upright: PanelOrientation,
}

impl RotationControl {
    pub const fn new(current: Rotation, upright: PanelOrientation) -> Self {
        Self { current, upright }
    }

    pub const fn current(&self) -> Rotation {
        self.current
    }

    /// Moves to the next rotation. The render port picks it up on its next cycle.
    pub fn advance(&mut self) -> Rotation {
        self.current = self.current.advance();
        self.current
    }

    /// Panel flags the render port has to apply for the current rotation.
    pub const fn panel_orientation(&self) -> PanelOrientation {
        self.upright.rotated(self.current)
    }
}
