// src/main.rs

//! Headless smoke run: drives the backend lifecycle the way the engine
//! loop does, with a generated test pattern standing in for engine frames
//! and a feeder thread standing in for the user.

use anyhow::Context;
use doom_host::keys::{scancode, KEY_UP_FLAG};
use doom_host::{
    GenericPlatform, HeadlessDriver, HostEvent, HostEventSender, Platform, SourceFrame, CONFIG,
};
use log::{info, warn};
use std::time::Duration;

const FRAMES: u32 = 70;
const TICK_MS: u32 = 1000 / 35;

/// Main entry point for the `doom-host` smoke run.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting doom-host headless run...");
    let config = &*CONFIG;

    let driver = HeadlessDriver::new(config.scheduling.clone())
        .context("Failed to create headless driver")?;
    let feeder = spawn_feeder(driver.sender())?;
    let mut platform = GenericPlatform::new(driver, config).context("Failed to create platform")?;
    platform.init();
    if !platform.is_ready() {
        warn!("Backend failed to initialize; continuing without a window");
    }

    let (width, height) = (config.display.width, config.display.height);
    let mut pixels = frame_buffer(width, height).context("Failed to allocate the engine frame")?;
    let mut keys_seen = 0usize;
    for tick in 0..FRAMES {
        render_pattern(&mut pixels, width, tick);
        platform.draw_frame(&SourceFrame::new(&pixels, width, height));
        while let Some(event) = platform.get_key() {
            keys_seen += 1;
            info!(
                "tick {:>3} @ {:>5} ms: key {:#04x} pressed={}",
                tick,
                platform.get_ticks_ms(),
                event.key,
                event.pressed
            );
        }
        while let Some(delta) = platform.get_mouse_delta() {
            info!("tick {:>3}: mouse {:?}", tick, delta);
        }
        platform.sleep_ms(TICK_MS);
    }

    if feeder.join().is_err() {
        warn!("Input feeder thread panicked");
    }
    info!(
        "Done: {} frames presented, {} skipped, {} keys read, {} keys dropped, {} ms elapsed",
        platform.presenter().frames_presented(),
        platform.presenter().frames_skipped(),
        keys_seen,
        platform.keys_dropped(),
        platform.get_ticks_ms()
    );
    Ok(())
}

fn frame_buffer(width: usize, height: usize) -> anyhow::Result<Vec<u32>> {
    let len = width
        .checked_mul(height)
        .with_context(|| format!("frame size {}x{} overflows", width, height))?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .with_context(|| format!("cannot allocate a {}x{} frame", width, height))?;
    pixels.resize(len, 0);
    Ok(pixels)
}

/// Diagonal colour bands that move one pixel per tick.
fn render_pattern(pixels: &mut [u32], width: usize, tick: u32) {
    for (i, px) in pixels.iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let band = ((x + y + tick as usize) / 16) as u32;
        *px = (band.wrapping_mul(0x0011_2233)) & 0x00ff_ffff;
    }
}

fn spawn_feeder(sender: HostEventSender) -> anyhow::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input-feeder".to_string())
        .spawn(move || {
            let script = [scancode::W, scancode::QUOTE, scancode::A, scancode::ENTER];
            for code in script {
                std::thread::sleep(Duration::from_millis(250));
                let sent = sender
                    .send(HostEvent::Key(code))
                    .and_then(|_| sender.send(HostEvent::MouseMove { dx: 1, dy: 0 }))
                    .and_then(|_| sender.send(HostEvent::Key(code | KEY_UP_FLAG)));
                if sent.is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn input feeder thread")
}
