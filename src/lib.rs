// src/lib.rs

//! Host backend for a fixed-resolution software-rendered game engine.
//!
//! The engine renders into its own pixel buffer and polls for input once
//! per tick. This crate sits between it and a host windowing system:
//! [`platform::GenericPlatform`] acquires the window, drains host events
//! through the key translator into bounded input queues, and fits every
//! frame onto the host surface.

pub mod config;
pub mod display;
pub mod input;
pub mod keys;
pub mod platform;

pub use config::{Capabilities, Config, CONFIG};
pub use display::{HostSurface, Rect, SourceFrame};
pub use input::{KeyEvent, MouseDelta};
pub use platform::backends::headless::{HeadlessDriver, HostEventSender};
pub use platform::{Driver, GenericPlatform, HostEvent, LifecycleState, Platform};
