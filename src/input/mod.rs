// src/input/mod.rs

//! Engine-neutral input events and the queues that buffer them between the
//! host event pump and the engine's per-tick polling.

pub mod queue;

pub use queue::{EventQueue, OverflowPolicy, DEFAULT_OVERFLOW_POLICY};

use crate::keys::KEY_UP_FLAG;

/// A translated key transition, consumed once by `get_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyEvent {
    /// Engine key code (see [`crate::keys::engine_key`]).
    pub key: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn pressed(key: u8) -> Self {
        Self { key, pressed: true }
    }

    pub fn released(key: u8) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Raw relative pointer motion. The sensitivity multiplier is applied when
/// the engine reads it, never when it is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseDelta {
    pub dx: i32,
    pub dy: i32,
}

impl MouseDelta {
    pub fn scaled(self, multiplier: i32) -> Self {
        Self {
            dx: self.dx.saturating_mul(multiplier),
            dy: self.dy.saturating_mul(multiplier),
        }
    }
}

/// Splits a raw host key byte into `(scancode, pressed)`.
pub fn decode_key_byte(raw: u8) -> (u8, bool) {
    (raw & !KEY_UP_FLAG, raw & KEY_UP_FLAG == 0)
}
