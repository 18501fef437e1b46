// src/display/mod.rs
//! Pixel buffers on both sides of the presentation path.
//!
//! - SourceFrame: the engine's fixed-resolution buffer, read-only here
//! - HostSurface: the host window's buffer, write-only here
//! - FramePresenter: fits one onto the other every frame

pub mod presenter;

pub use presenter::{FramePresenter, ScaleRatio};

/// Packed 32-bit colour, as produced by the engine.
pub type Pixel = u32;

/// Colour written over the whole surface once the window is ready.
pub const CLEAR_COLOR: Pixel = 0x0000_0000;

/// An axis-aligned rectangle in host surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn from_size(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The engine's current frame.
#[derive(Debug, Clone, Copy)]
pub struct SourceFrame<'a> {
    pub pixels: &'a [Pixel],
    pub width: usize,
    pub height: usize,
}

impl<'a> SourceFrame<'a> {
    pub fn new(pixels: &'a [Pixel], width: usize, height: usize) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    /// True when the buffer holds at least `width * height` pixels and
    /// neither dimension is zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .width
                .checked_mul(self.height)
                .is_some_and(|n| self.pixels.len() >= n)
    }
}

/// A borrowed view of the host window's pixel buffer.
///
/// `stride` is the distance in pixels between the starts of two rows and is
/// at least `width`.
#[derive(Debug)]
pub struct HostSurface<'a> {
    pub pixels: &'a mut [Pixel],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a> HostSurface<'a> {
    pub fn new(pixels: &'a mut [Pixel], width: usize, height: usize, stride: usize) -> Self {
        Self {
            pixels,
            width,
            height,
            stride,
        }
    }

    /// Narrows the view to at most `width` x `height`, keeping the stride.
    pub fn clipped(self, width: usize, height: usize) -> Self {
        Self {
            width: self.width.min(width),
            height: self.height.min(height),
            ..self
        }
    }

    /// True when every addressable row fits inside `pixels`.
    pub fn is_valid(&self) -> bool {
        if self.stride < self.width {
            return false;
        }
        if self.width == 0 || self.height == 0 {
            return true;
        }
        (self.height - 1)
            .checked_mul(self.stride)
            .and_then(|n| n.checked_add(self.width))
            .is_some_and(|needed| self.pixels.len() >= needed)
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let start = y * self.stride;
        &mut self.pixels[start..start + self.width]
    }

    /// Fills the visible area with `color`.
    pub fn fill(&mut self, color: Pixel) {
        for y in 0..self.height {
            self.row_mut(y).fill(color);
        }
    }
}
