// src/platform/backends/mock.rs

use crate::display::{HostSurface, Pixel, Rect};
use crate::platform::backends::{Driver, HostEvent, Priority, WindowRequest};
use anyhow::{anyhow, bail, Result};
use std::collections::VecDeque;

/// Scripted host for unit tests.
///
/// Events are delivered in the order they were pushed. Once the script runs
/// dry, `next_event` reports a closed event source instead of blocking.
pub struct MockDriver {
    events: VecDeque<HostEvent>,
    framebuffer: Vec<Pixel>,
    width: usize,
    height: usize,
    pub reject_window: bool,
    pub withhold_surface: bool,
    pub fail_redraw: bool,
    pub now_ms: u64,
    pub window_requests: Vec<WindowRequest>,
    pub redraws: Vec<Rect>,
    pub priorities: Vec<Priority>,
    pub titles: Vec<String>,
    pub sleeps: Vec<u32>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            framebuffer: Vec::new(),
            width: 0,
            height: 0,
            reject_window: false,
            withhold_surface: false,
            fail_redraw: false,
            now_ms: 1_000,
            window_requests: Vec::new(),
            redraws: Vec::new(),
            priorities: Vec::new(),
            titles: Vec::new(),
            sleeps: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        self.events.extend(events);
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Replaces the surface buffer with a `width` x `height` one filled
    /// with `fill`.
    pub fn set_surface(&mut self, width: usize, height: usize, fill: Pixel) {
        self.framebuffer = vec![fill; width * height];
        self.width = width;
        self.height = height;
    }

    pub fn framebuffer(&self) -> &[Pixel] {
        &self.framebuffer
    }
}

impl Driver for MockDriver {
    fn acquire_window(&mut self, request: &WindowRequest) -> Result<()> {
        self.window_requests.push(request.clone());
        if self.reject_window {
            bail!("MockDriver: window rejected");
        }
        if self.framebuffer.is_empty() {
            self.set_surface(request.width, request.height, 0xffff_ffff);
        }
        Ok(())
    }

    fn next_event(&mut self) -> Result<HostEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow!("MockDriver: event script exhausted"))
    }

    fn has_pending_events(&mut self) -> bool {
        !self.events.is_empty()
    }

    fn surface(&mut self) -> Option<HostSurface<'_>> {
        if self.withhold_surface || self.framebuffer.is_empty() {
            return None;
        }
        Some(HostSurface::new(
            &mut self.framebuffer,
            self.width,
            self.height,
            self.width,
        ))
    }

    fn redraw_rect(&mut self, rect: Rect) -> Result<()> {
        if self.fail_redraw {
            bail!("MockDriver: redraw failed");
        }
        self.redraws.push(rect);
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn set_priority(&mut self, priority: Priority) -> Result<()> {
        self.priorities.push(priority);
        Ok(())
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
        self.now_ms += u64::from(ms);
    }

    fn ticks_ms(&self) -> u64 {
        self.now_ms
    }
}
