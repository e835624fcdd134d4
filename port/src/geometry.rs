use crate::error::ConfigError;
use crate::rotation::Rotation;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Rectangle in display coordinates, `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// First column past the right edge, saturating at `u16::MAX`
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// First row past the bottom edge, saturating at `u16::MAX`
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the two areas overlap or share an edge.
    pub fn touches(&self, other: &Area) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Smallest area covering both.
    pub fn union(&self, other: &Area) -> Area {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Area::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Clips the area to `size`, `None` when nothing remains.
    pub fn clipped(&self, size: Size) -> Option<Area> {
        if self.x >= size.width || self.y >= size.height {
            return None;
        }
        let right = self.right().min(size.width);
        let bottom = self.bottom().min(size.height);
        let area = Area::new(self.x, self.y, right - self.x, bottom - self.y);
        (!area.is_empty()).then_some(area)
    }
}

/// Order of the color components on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorSpace {
    #[default]
    Rgb,
    Bgr,
}

/// Byte order of a 16 bit pixel on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Encodes one RGB565 value in this order.
    pub const fn encode(self, raw: u16) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => raw.to_le_bytes(),
            ByteOrder::BigEndian => raw.to_be_bytes(),
        }
    }
}

/// Fixed panel resolution and pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
    pub color_space: ColorSpace,
    pub bits_per_pixel: u8,
}

impl PanelGeometry {
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            color_space: ColorSpace::Rgb,
            bits_per_pixel: 16,
        }
    }

    pub const fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Display size as seen by the widget runtime under `rotation`.
    pub const fn logical_size(&self, rotation: Rotation) -> Size {
        if rotation.swaps_axes() {
            Size::new(self.height, self.width)
        } else {
            self.size()
        }
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel as usize).div_ceil(8)
    }

    /// Bytes needed for a buffer of `strip_height` full-width rows.
    pub const fn strip_bytes(&self, strip_height: u16) -> usize {
        self.width as usize * strip_height as usize * self.bytes_per_pixel()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGeometry);
        }
        if self.bits_per_pixel != 16 {
            return Err(ConfigError::UnsupportedPixelFormat(self.bits_per_pixel));
        }
        Ok(())
    }
}
