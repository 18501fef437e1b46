// src/platform/platform_trait.rs
//
// Defines the `Platform` trait, the set of entry points the engine loop
// calls into once per tick.

use crate::display::SourceFrame;
use crate::input::{KeyEvent, MouseDelta};

/// Engine-facing lifecycle of a host backend.
///
/// None of these calls report errors. A backend whose host failed stays
/// inert: frames are dropped, no input arrives, and the engine keeps
/// running.
pub trait Platform {
    /// Acquires the window and blocks until the host reports it ready.
    fn init(&mut self);

    /// Drains pending host events into the input queues, then presents
    /// `frame`. Does nothing before `init` succeeded.
    fn draw_frame(&mut self, frame: &SourceFrame<'_>);

    /// Oldest queued key transition, if any.
    fn get_key(&mut self) -> Option<KeyEvent>;

    /// Oldest queued pointer motion, scaled by the sensitivity multiplier.
    fn get_mouse_delta(&mut self) -> Option<MouseDelta>;

    fn sleep_ms(&mut self, ms: u32);

    /// Milliseconds since the window became ready; 0 before that.
    fn get_ticks_ms(&self) -> u32;

    fn set_window_title(&mut self, title: &str);
}
