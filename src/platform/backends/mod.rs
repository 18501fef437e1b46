// src/platform/backends/mod.rs

//! Defines the `Driver` trait implemented by host windowing backends, and
//! the types that cross it: `HostEvent`, `WindowRequest`, `Priority`.

pub use crate::display::{HostSurface, Rect};
use anyhow::Result;

pub mod headless;
#[cfg(test)]
pub mod mock;

/// Scheduling hint passed to the host when focus changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// The window is in front; the engine wants the CPU.
    Interactive,
    /// The window is behind something else; yield to other work.
    Background,
}

/// Mouse buttons as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

/// Events delivered by the host's event pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The window requested by `acquire_window` exists and its surface can
    /// be written. Carries the surface size.
    WindowReady { width: usize, height: usize },
    /// The window was brought to the front.
    FocusGained,
    /// The window was sent to the back.
    FocusLost,
    /// A raw key byte: bit 7 set on release, bits 0..6 the scancode.
    Key(u8),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Relative pointer motion since the previous move event.
    MouseMove { dx: i32, dy: i32 },
    /// The surface changed size (variable-size hosts only).
    Resized { width: usize, height: usize },
}

/// What `init` asks the host for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

/// Host windowing, event and timing services consumed by the backend.
///
/// A driver owns the window and its pixel buffer. The backend only borrows
/// the buffer through [`Driver::surface`] while presenting a frame.
pub trait Driver {
    /// Asks the host for a window. Success means the request was accepted;
    /// the window is usable only after [`HostEvent::WindowReady`] arrives.
    fn acquire_window(&mut self, request: &WindowRequest) -> Result<()>;

    /// Blocks until the next event is available.
    ///
    /// An error means the event source is gone and no event will ever come.
    fn next_event(&mut self) -> Result<HostEvent>;

    /// True when `next_event` would return without blocking.
    fn has_pending_events(&mut self) -> bool;

    /// Borrows the window's pixel buffer, or `None` if there is none (yet).
    fn surface(&mut self) -> Option<HostSurface<'_>>;

    /// Pushes `rect` of the surface to the screen. Hosts without partial
    /// redraw may redraw the whole surface.
    fn redraw_rect(&mut self, rect: Rect) -> Result<()>;

    /// Sets the window title. Hosts without titles ignore it.
    fn set_title(&mut self, title: &str) {
        log::trace!("Driver::set_title('{}') ignored by this host", title);
    }

    /// Adjusts the scheduling priority of this process.
    fn set_priority(&mut self, priority: Priority) -> Result<()>;

    /// Yields the CPU for roughly `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);

    /// Host monotonic clock in milliseconds. Only differences are meaningful.
    fn ticks_ms(&self) -> u64;
}
