//! Logical to physical unit conversion

use glam::Vec2;
use winit::dpi::{LogicalSize, PhysicalSize};

use crate::ratio::PixelRatio;

/// The current scaling factor between logical simulation units and backing-store pixels.
///
/// Values scaled before a [`resize`](crate::resize) that changed the ratio are stale and
/// must be derived again from their logical originals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleContext {
    ratio: PixelRatio,
}

impl ScaleContext {
    pub fn new(ratio: PixelRatio) -> Self {
        Self { ratio }
    }

    pub fn ratio(&self) -> PixelRatio {
        self.ratio
    }

    pub(crate) fn set_ratio(&mut self, ratio: PixelRatio) {
        self.ratio = ratio;
    }

    /// Convert a logical magnitude (coordinate or size) into backing-store pixels.
    pub fn scale(&self, value: f64) -> f64 {
        value * self.ratio.get()
    }

    pub fn scale_vec2(&self, value: Vec2) -> Vec2 {
        value * self.ratio.get() as f32
    }

    /// Backing size for a logical size. Fractional pixels are dropped and negative
    /// dimensions saturate at zero, like a canvas buffer size.
    pub fn physical_size(&self, logical: LogicalSize<f64>) -> PhysicalSize<u32> {
        let physical: PhysicalSize<f64> = logical.to_physical(self.ratio.get());
        PhysicalSize::new(physical.width.floor() as u32, physical.height.floor() as u32)
    }
}
