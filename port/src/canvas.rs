use alloc::vec;
use alloc::vec::Vec;

use crate::geometry::{Area, Size};

/// Maximum number of separate dirty rectangles tracked per frame
pub const MAX_DIRTY_AREAS: usize = 16;

/// A canvas pixel the render port can send to the panel as RGB565
pub trait Pixel: Copy + Default {
    fn to_rgb565(self) -> u16;
}

impl Pixel for u16 {
    fn to_rgb565(self) -> u16 {
        self
    }
}

#[cfg(feature = "slint")]
impl Pixel for slint::platform::software_renderer::Rgb565Pixel {
    fn to_rgb565(self) -> u16 {
        self.0
    }
}

/// Logical-size drawing surface the widget runtime renders into
pub struct Canvas<P> {
    pixels: Vec<P>,
    size: Size,
}

impl<P: Pixel> Canvas<P> {
    pub fn new(size: Size) -> Self {
        Self {
            pixels: vec![P::default(); size.pixel_count()],
            size,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Pixels per row
    pub fn stride(&self) -> usize {
        self.size.width as usize
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Reinterprets the pixels with new dimensions of the same pixel count,
    /// as happens on a quarter turn. Returns false when the count differs.
    pub fn reshape(&mut self, size: Size) -> bool {
        if size.pixel_count() != self.pixels.len() {
            return false;
        }
        self.size = size;
        true
    }

    /// `width` pixels of row `y` starting at column `x`.
    pub fn row(&self, x: u16, y: u16, width: u16) -> &[P] {
        let start = y as usize * self.stride() + x as usize;
        &self.pixels[start..start + width as usize]
    }

    pub fn fill(&mut self, area: Area, pixel: P) {
        let Some(area) = area.clipped(self.size) else {
            return;
        };
        let stride = self.stride();
        for y in area.y..area.bottom() {
            let start = y as usize * stride + area.x as usize;
            self.pixels[start..start + area.width as usize].fill(pixel);
        }
    }
}

/// Areas changed since the last flush
#[derive(Debug, Default)]
pub struct DirtyRegions {
    areas: heapless::Vec<Area, MAX_DIRTY_AREAS>,
    bounds: Size,
}

impl DirtyRegions {
    pub fn new(bounds: Size) -> Self {
        Self {
            areas: heapless::Vec::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Changes the clipping bounds and drops everything recorded so far.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.areas.clear();
    }

    /// Records `area`, merging it with every recorded area it touches.
    pub fn add(&mut self, area: Area) {
        let Some(mut merged) = area.clipped(self.bounds) else {
            return;
        };
        // A merge can grow the area into others, so repeat until stable
        let mut i = 0;
        while i < self.areas.len() {
            if self.areas[i].touches(&merged) {
                merged = merged.union(&self.areas.swap_remove(i));
                i = 0;
            } else {
                i += 1;
            }
        }
        if let Err(merged) = self.areas.push(merged) {
            let bounding = self
                .areas
                .iter()
                .fold(merged, |acc, area| acc.union(area));
            self.areas.clear();
            let _ = self.areas.push(bounding);
        }
    }

    pub fn mark_all(&mut self) {
        self.areas.clear();
        self.add(Area::full(self.bounds));
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Removes and returns all recorded areas.
    pub fn take(&mut self) -> heapless::Vec<Area, MAX_DIRTY_AREAS> {
        core::mem::take(&mut self.areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Size = Size::new(320, 480);

    #[test]
    fn test_overlapping_areas_are_merged() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        dirty.add(Area::new(0, 0, 10, 10));
        dirty.add(Area::new(5, 5, 10, 10));
        dirty.add(Area::new(100, 100, 4, 4));
        assert_eq!(dirty.len(), 2);
        assert!(dirty.iter().any(|a| *a == Area::new(0, 0, 15, 15)));
    }

    #[test]
    fn test_bridging_area_merges_chain() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        dirty.add(Area::new(0, 0, 10, 10));
        dirty.add(Area::new(20, 0, 10, 10));
        dirty.add(Area::new(8, 0, 14, 4));
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty.take()[0], Area::new(0, 0, 30, 10));
        assert!(dirty.is_empty());
    }

    #[test]
    fn test_areas_are_clipped_to_bounds() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        dirty.add(Area::new(310, 470, 50, 50));
        dirty.add(Area::new(400, 0, 5, 5));
        assert_eq!(dirty.len(), 1);
        assert_eq!(*dirty.iter().next().unwrap(), Area::new(310, 470, 10, 10));
    }

    #[test]
    fn test_area_reaching_past_u16_range_is_clipped() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        dirty.add(Area::new(10, 0, u16::MAX, 1));
        assert_eq!(dirty.take()[0], Area::new(10, 0, 310, 1));
    }

    #[test]
    fn test_overflow_collapses_to_bounding_box() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        for i in 0..=MAX_DIRTY_AREAS as u16 {
            dirty.add(Area::new(i * 10, i * 20, 2, 2));
        }
        assert_eq!(dirty.len(), 1);
        let last = MAX_DIRTY_AREAS as u16;
        assert_eq!(
            dirty.take()[0],
            Area::new(0, 0, last * 10 + 2, last * 20 + 2)
        );
    }

    #[test]
    fn test_mark_all_covers_bounds() {
        let mut dirty = DirtyRegions::new(BOUNDS);
        dirty.add(Area::new(1, 1, 1, 1));
        dirty.set_bounds(Size::new(480, 320));
        assert!(dirty.is_empty());
        dirty.mark_all();
        assert_eq!(dirty.take()[0], Area::new(0, 0, 480, 320));
    }

    #[test]
    fn test_canvas_reshape_keeps_pixels() {
        let mut canvas: Canvas<u16> = Canvas::new(Size::new(4, 2));
        canvas.pixels_mut()[5] = 0xAAAA;
        assert!(canvas.reshape(Size::new(2, 4)));
        assert_eq!(canvas.stride(), 2);
        assert_eq!(canvas.row(1, 2, 1), &[0xAAAA]);
        assert!(!canvas.reshape(Size::new(3, 3)));
    }
}
