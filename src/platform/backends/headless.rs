// src/platform/backends/headless.rs
//! In-memory host driver.
//!
//! The "window" is a pixel buffer owned by the driver. Events come from a
//! channel: any thread holding a [`HostEventSender`] can feed the pump, and
//! `draw_frame` drains it on the engine thread. Time comes from the OS
//! monotonic clock and priority hints optionally renice the process.

use crate::config::SchedulingConfig;
use crate::display::{HostSurface, Pixel, Rect};
use crate::platform::backends::{Driver, HostEvent, Priority, WindowRequest};
use crate::platform::os::{set_niceness, MonotonicClock};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, trace, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

/// Cloneable handle for delivering events to a [`HeadlessDriver`].
#[derive(Debug, Clone)]
pub struct HostEventSender {
    tx: Sender<HostEvent>,
}

impl HostEventSender {
    pub fn send(&self, event: HostEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow!("headless event pump has been dropped"))
    }
}

pub struct HeadlessDriver {
    scheduling: SchedulingConfig,
    clock: MonotonicClock,
    tx: Sender<HostEvent>,
    rx: Receiver<HostEvent>,
    /// Events generated by the driver itself, delivered before channel events.
    local: VecDeque<HostEvent>,
    framebuffer: Option<Vec<Pixel>>,
    width: usize,
    height: usize,
    title: String,
    priority: Option<Priority>,
    redraws: u64,
    last_redraw: Option<Rect>,
}

impl HeadlessDriver {
    pub fn new(scheduling: SchedulingConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let clock = MonotonicClock::new().context("HeadlessDriver: monotonic clock unavailable")?;
        info!("HeadlessDriver::new() renice={}", scheduling.renice);
        Ok(Self {
            scheduling,
            clock,
            tx,
            rx,
            local: VecDeque::new(),
            framebuffer: None,
            width: 0,
            height: 0,
            title: String::new(),
            priority: None,
            redraws: 0,
            last_redraw: None,
        })
    }

    pub fn sender(&self) -> HostEventSender {
        HostEventSender {
            tx: self.tx.clone(),
        }
    }

    /// Reallocates the surface at a new size and announces it with a
    /// `Resized` event, like a user dragging the window border.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        if self.framebuffer.is_none() {
            bail!("HeadlessDriver: resize before a window was acquired");
        }
        self.framebuffer = Some(allocate_surface(width, height)?);
        self.width = width;
        self.height = height;
        self.local.push_back(HostEvent::Resized { width, height });
        debug!("HeadlessDriver: resized to {}x{}", width, height);
        Ok(())
    }

    pub fn pixels(&self) -> Option<&[Pixel]> {
        self.framebuffer.as_deref()
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn last_redraw(&self) -> Option<Rect> {
        self.last_redraw
    }
}

fn allocate_surface(width: usize, height: usize) -> Result<Vec<Pixel>> {
    let len = width
        .checked_mul(height)
        .with_context(|| format!("surface size {}x{} overflows", width, height))?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .with_context(|| format!("Failed to allocate {}x{} surface", width, height))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

impl Driver for HeadlessDriver {
    fn acquire_window(&mut self, request: &WindowRequest) -> Result<()> {
        if self.framebuffer.is_some() {
            bail!("HeadlessDriver: a window has already been acquired");
        }
        if request.width == 0 || request.height == 0 {
            bail!(
                "HeadlessDriver: rejecting {}x{} window '{}'",
                request.width,
                request.height,
                request.title
            );
        }
        self.framebuffer = Some(allocate_surface(request.width, request.height)?);
        self.width = request.width;
        self.height = request.height;
        self.title = request.title.clone();
        self.local.push_back(HostEvent::WindowReady {
            width: request.width,
            height: request.height,
        });
        info!(
            "HeadlessDriver: window '{}' {}x{} created",
            request.title, request.width, request.height
        );
        Ok(())
    }

    fn next_event(&mut self) -> Result<HostEvent> {
        if let Some(event) = self.local.pop_front() {
            return Ok(event);
        }
        self.rx
            .recv()
            .map_err(|_| anyhow!("HeadlessDriver: event source closed"))
    }

    fn has_pending_events(&mut self) -> bool {
        if !self.local.is_empty() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(event) => {
                self.local.push_back(event);
                true
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }

    fn surface(&mut self) -> Option<HostSurface<'_>> {
        let (width, height) = (self.width, self.height);
        self.framebuffer
            .as_deref_mut()
            .map(|pixels| HostSurface::new(pixels, width, height, width))
    }

    fn redraw_rect(&mut self, rect: Rect) -> Result<()> {
        if rect.x + rect.width > self.width || rect.y + rect.height > self.height {
            bail!(
                "HeadlessDriver: redraw {:?} outside {}x{} surface",
                rect,
                self.width,
                self.height
            );
        }
        self.redraws += 1;
        self.last_redraw = Some(rect);
        trace!("HeadlessDriver: redraw {:?}", rect);
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        debug!("HeadlessDriver: title '{}'", title);
        self.title = title.to_string();
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.priority = Some(priority);
        if !self.scheduling.renice {
            trace!("HeadlessDriver: priority {:?} (renice disabled)", priority);
            return Ok(());
        }
        let nice = match priority {
            Priority::Interactive => self.scheduling.interactive_nice,
            Priority::Background => self.scheduling.background_nice,
        };
        set_niceness(nice).map_err(|e| {
            warn!("HeadlessDriver: could not apply {:?}: {:#}", priority, e);
            e
        })
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn ticks_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }
}
