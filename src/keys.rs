// src/keys.rs

//! Host scancodes, engine key codes, and the translation between them.
//!
//! The host reports physical keys as PC set-1 scancodes packed into a byte,
//! with bit 7 set on key-up. The engine consumes its own key enumeration,
//! where letters are plain ASCII and the special keys live above `0x80`.
//! [`translate`] is the pure mapping between the two; [`KeyTranslator`]
//! layers the sticky meta modifier on top of it.

use serde::{Deserialize, Serialize};

/// Bit set on a raw key byte when the key was released.
pub const KEY_UP_FLAG: u8 = 0x80;

/// Physical key identifiers as delivered by the host (PC set 1, make codes).
pub mod scancode {
    pub const ESC: u8 = 0x01;
    pub const TAB: u8 = 0x0F;
    pub const W: u8 = 0x11;
    pub const Y: u8 = 0x15;
    pub const ENTER: u8 = 0x1C;
    pub const LCTRL: u8 = 0x1D;
    pub const A: u8 = 0x1E;
    pub const S: u8 = 0x1F;
    pub const D: u8 = 0x20;
    pub const QUOTE: u8 = 0x28;
    pub const RSHIFT: u8 = 0x36;
    pub const SPACE: u8 = 0x39;
    pub const UP: u8 = 0x48;
    pub const LEFT: u8 = 0x4B;
    pub const RIGHT: u8 = 0x4D;
    pub const DOWN: u8 = 0x50;
    /// Left "super"/meta key. Never reaches the engine.
    pub const META: u8 = 0x5B;
}

/// Engine key codes.
pub mod engine_key {
    pub const RIGHTARROW: u8 = 0xae;
    pub const LEFTARROW: u8 = 0xac;
    pub const UPARROW: u8 = 0xad;
    pub const DOWNARROW: u8 = 0xaf;
    pub const USE: u8 = 0xa2;
    pub const FIRE: u8 = 0xa3;
    pub const ESCAPE: u8 = 27;
    pub const ENTER: u8 = 13;
    pub const TAB: u8 = 9;
    pub const RSHIFT: u8 = 0x80 + 0x36;
}

/// What to do with scancodes that have no entry in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnmappedKeys {
    /// Silently ignore the key. Nothing is queued.
    #[default]
    Drop,
    /// Forward the 7-bit scancode to the engine unchanged.
    PassThrough,
}

/// Backend-level hotkeys, handled by the backend and never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// Meta+Tab: hand the CPU back to the rest of the system.
    YieldFocus,
}

/// Result of translating one scancode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Translation {
    /// Queue this engine key.
    Key(u8),
    /// The meta modifier; updates the sticky flag, not queued.
    Meta,
    /// A backend hotkey fired.
    Hotkey(Hotkey),
    /// No engine meaning.
    Unmapped,
}

#[rustfmt::skip]
fn table_lookup(code: u8) -> Option<u8> {
    let key = match code {
        scancode::ESC                    => engine_key::ESCAPE,
        scancode::ENTER                  => engine_key::ENTER,
        scancode::QUOTE | scancode::LCTRL => engine_key::FIRE,
        scancode::SPACE                  => engine_key::USE,
        scancode::RSHIFT                 => engine_key::RSHIFT,
        scancode::TAB                    => engine_key::TAB,
        scancode::W | scancode::UP       => engine_key::UPARROW,
        scancode::S | scancode::DOWN     => engine_key::DOWNARROW,
        scancode::A | scancode::LEFT     => engine_key::LEFTARROW,
        scancode::D | scancode::RIGHT    => engine_key::RIGHTARROW,
        // Answers the engine's "are you sure?" prompts.
        scancode::Y                      => b'y',
        _ => return None,
    };
    Some(key)
}

/// Maps a 7-bit scancode to its engine meaning.
///
/// Pure: the same `(code, meta_held, unmapped)` always yields the same
/// result. `meta_held` is only consulted when `hotkeys` is enabled; without
/// it the meta key is treated like any other unmapped key.
pub fn translate(code: u8, meta_held: bool, hotkeys: bool, unmapped: UnmappedKeys) -> Translation {
    let code = code & !KEY_UP_FLAG;
    if hotkeys {
        if code == scancode::META {
            return Translation::Meta;
        }
        if code == scancode::TAB && meta_held {
            return Translation::Hotkey(Hotkey::YieldFocus);
        }
    }
    match table_lookup(code) {
        Some(key) => Translation::Key(key),
        None => match unmapped {
            UnmappedKeys::Drop => Translation::Unmapped,
            UnmappedKeys::PassThrough => Translation::Key(code),
        },
    }
}

/// Stateful wrapper around [`translate`] that tracks the meta key.
#[derive(Debug, Clone)]
pub struct KeyTranslator {
    meta_held: bool,
    /// Scancode whose press fired a hotkey; its next release is consumed.
    swallowed: Option<u8>,
    hotkeys: bool,
    unmapped: UnmappedKeys,
}

impl KeyTranslator {
    pub fn new(hotkeys: bool, unmapped: UnmappedKeys) -> Self {
        Self {
            meta_held: false,
            swallowed: None,
            hotkeys,
            unmapped,
        }
    }

    pub fn meta_held(&self) -> bool {
        self.meta_held
    }

    /// Translates a scancode for a press (`pressed == true`) or release.
    ///
    /// Meta presses and releases toggle the sticky flag. A hotkey fires only
    /// on the press of its key, and the next release of that key is
    /// swallowed even if meta was let go first. Releases never fire hotkeys.
    pub fn feed(&mut self, code: u8, pressed: bool) -> Translation {
        let code = code & !KEY_UP_FLAG;
        if !pressed && self.swallowed == Some(code) {
            self.swallowed = None;
            return Translation::Unmapped;
        }
        let meta_held = self.meta_held && pressed;
        match translate(code, meta_held, self.hotkeys, self.unmapped) {
            Translation::Meta => {
                self.meta_held = pressed;
                Translation::Meta
            }
            Translation::Hotkey(hotkey) => {
                self.swallowed = Some(code);
                Translation::Hotkey(hotkey)
            }
            other => other,
        }
    }
}
