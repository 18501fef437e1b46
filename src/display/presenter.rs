// src/display/presenter.rs
//! Fits the engine frame onto the host surface.
//!
//! The scale factor is uniform, chosen from the tighter axis, and never
//! above 1: a surface larger than the frame shows it at native size in the
//! top-left corner, a smaller one shows a nearest-neighbour downscale.
//! Pixels outside the written rectangle keep whatever the previous frame
//! left there.

use super::{HostSurface, Rect, SourceFrame};
use log::{trace, warn};

/// `min(host_h / src_h, host_w / src_w, 1)` kept as an exact fraction so
/// the pixel mapping has no floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleRatio {
    num: usize,
    den: usize,
}

impl ScaleRatio {
    pub const IDENTITY: Self = Self { num: 1, den: 1 };

    /// Both source dimensions must be non-zero.
    pub fn fit(src_width: usize, src_height: usize, host_width: usize, host_height: usize) -> Self {
        let mut ratio = Self::IDENTITY;
        for (host, src) in [(host_height, src_height), (host_width, src_width)] {
            // host/src < num/den
            if host * ratio.den < ratio.num * src {
                ratio = Self { num: host, den: src };
            }
        }
        ratio
    }

    pub fn is_identity(&self) -> bool {
        self.num == self.den
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Length of a source extent after scaling, rounded down.
    pub fn scale(&self, len: usize) -> usize {
        len * self.num / self.den
    }

    /// Source coordinate sampled for destination coordinate `dst`.
    pub fn source_index(&self, dst: usize) -> usize {
        dst * self.den / self.num
    }
}

/// Copies engine frames into host surfaces. Holds no pixel storage.
#[derive(Debug, Default)]
pub struct FramePresenter {
    frames_presented: u64,
    frames_skipped: u64,
}

impl FramePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `frame` into `surface` and returns the rectangle that changed.
    ///
    /// Returns `None` (and counts a skipped frame) when either buffer is
    /// malformed; the surface is left untouched in that case.
    pub fn present(
        &mut self,
        frame: &SourceFrame<'_>,
        surface: &mut HostSurface<'_>,
    ) -> Option<Rect> {
        if !frame.is_valid() {
            warn!(
                "FramePresenter: source buffer too small for {}x{} ({} px), skipping frame",
                frame.width,
                frame.height,
                frame.pixels.len()
            );
            self.frames_skipped += 1;
            return None;
        }
        if !surface.is_valid() {
            warn!(
                "FramePresenter: host surface {}x{} stride {} does not fit its buffer, \
                 skipping frame",
                surface.width, surface.height, surface.stride
            );
            self.frames_skipped += 1;
            return None;
        }

        let ratio = ScaleRatio::fit(frame.width, frame.height, surface.width, surface.height);
        let rect = if ratio.is_identity() {
            copy_rows(frame, surface)
        } else {
            sample_nearest(frame, surface, ratio)
        };
        trace!(
            "FramePresenter: {}x{} -> {}x{} (ratio {:.4})",
            frame.width,
            frame.height,
            rect.width,
            rect.height,
            ratio.as_f64()
        );
        self.frames_presented += 1;
        Some(rect)
    }

    /// Records a frame that never reached a surface.
    pub fn skip(&mut self) {
        self.frames_skipped += 1;
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

fn copy_rows(frame: &SourceFrame<'_>, surface: &mut HostSurface<'_>) -> Rect {
    let width = frame.width;
    for (y, src_row) in frame.pixels.chunks_exact(width).take(frame.height).enumerate() {
        let start = y * surface.stride;
        surface.pixels[start..start + width].copy_from_slice(src_row);
    }
    Rect::from_size(frame.width, frame.height)
}

fn sample_nearest(
    frame: &SourceFrame<'_>,
    surface: &mut HostSurface<'_>,
    ratio: ScaleRatio,
) -> Rect {
    let dst_width = ratio.scale(frame.width);
    let dst_height = ratio.scale(frame.height);
    for y in 0..dst_height {
        let src_start = ratio.source_index(y) * frame.width;
        let src_row = &frame.pixels[src_start..src_start + frame.width];
        let dst_start = y * surface.stride;
        let dst_row = &mut surface.pixels[dst_start..dst_start + dst_width];
        for (x, px) in dst_row.iter_mut().enumerate() {
            *px = src_row[ratio.source_index(x)];
        }
    }
    Rect::from_size(dst_width, dst_height)
}
