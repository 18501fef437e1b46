// src/platform/os/clock.rs

use anyhow::{Context, Result};
use nix::time::{clock_gettime, ClockId};

/// Millisecond reader over `CLOCK_MONOTONIC`, anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin_ms: u64,
}

impl MonotonicClock {
    pub fn new() -> Result<Self> {
        Ok(Self {
            origin_ms: read_monotonic_ms()?,
        })
    }

    /// Milliseconds since the clock was created. Never decreases.
    pub fn elapsed_ms(&self) -> u64 {
        // CLOCK_MONOTONIC only fails for an invalid clock id, which this is not.
        read_monotonic_ms()
            .map(|now| now.saturating_sub(self.origin_ms))
            .unwrap_or(0)
    }
}

fn read_monotonic_ms() -> Result<u64> {
    let ts = clock_gettime(ClockId::CLOCK_MONOTONIC)
        .context("clock_gettime(CLOCK_MONOTONIC) failed")?;
    let secs = u64::try_from(ts.tv_sec()).context("negative monotonic seconds")?;
    let nanos = u64::try_from(ts.tv_nsec()).context("negative monotonic nanoseconds")?;
    Ok(secs * 1_000 + nanos / 1_000_000)
}
