// src/platform/os/mod.rs
//! Thin wrappers over the OS services the headless driver relies on.

pub mod clock;
pub mod priority;

pub use clock::MonotonicClock;
pub use priority::set_niceness;
