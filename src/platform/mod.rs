// src/platform/mod.rs
//
// The backend lifecycle: window acquisition, per-frame event draining and
// presentation, on top of any host `Driver`.

use crate::config::{Capabilities, Config};
use crate::display::{FramePresenter, SourceFrame};
use crate::input::{decode_key_byte, EventQueue, KeyEvent, MouseDelta};
use crate::keys::{engine_key, Hotkey, KeyTranslator, Translation};
use anyhow::{Context, Result};
use log::*;

pub mod backends;
pub mod os;
pub mod platform_trait;

pub use backends::{Driver, HostEvent, MouseButton, Priority, WindowRequest};
pub use platform_trait::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    AwaitingWindow,
    /// Terminal for the life of the process.
    Ready,
}

/// Display and input backend for any host implementing [`Driver`].
///
/// Owns everything the engine-facing [`Platform`] calls touch: the host
/// driver, both input queues, the key translator and the presenter.
pub struct GenericPlatform<D: Driver> {
    driver: D,
    config: Config,
    state: LifecycleState,
    init_attempted: bool,
    start_ms: u64,
    /// Surface size reported by the host, used to clip fixed-size surfaces.
    surface_size: (usize, usize),
    keys: EventQueue<KeyEvent>,
    mouse: Option<EventQueue<MouseDelta>>,
    translator: KeyTranslator,
    presenter: FramePresenter,
}

impl<D: Driver> GenericPlatform<D> {
    pub fn new(driver: D, config: &Config) -> Result<Self> {
        config.validate().context("Invalid backend configuration")?;
        let input = &config.input;
        let keys = EventQueue::new(input.key_queue_capacity, input.overflow_policy)
            .context("Failed to create key queue")?;
        let mouse = if config.capabilities.contains(Capabilities::MOUSE) {
            Some(
                EventQueue::new(input.mouse_queue_capacity, input.overflow_policy)
                    .context("Failed to create mouse queue")?,
            )
        } else {
            None
        };
        let translator = KeyTranslator::new(
            config.capabilities.contains(Capabilities::FOCUS_HOTKEY),
            input.unmapped_keys,
        );
        info!(
            "GenericPlatform::new() - {}x{}, capabilities {:?}, key queue {} ({:?})",
            config.display.width,
            config.display.height,
            config.capabilities,
            keys.capacity(),
            keys.policy()
        );
        Ok(Self {
            driver,
            config: config.clone(),
            state: LifecycleState::Uninitialized,
            init_attempted: false,
            start_ms: 0,
            surface_size: (0, 0),
            keys,
            mouse,
            translator,
            presenter: FramePresenter::new(),
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LifecycleState::Ready
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn presenter(&self) -> &FramePresenter {
        &self.presenter
    }

    pub fn surface_size(&self) -> (usize, usize) {
        self.surface_size
    }

    pub fn keys_dropped(&self) -> u64 {
        self.keys.dropped()
    }

    pub fn mouse_dropped(&self) -> u64 {
        self.mouse.as_ref().map_or(0, EventQueue::dropped)
    }

    fn try_init(&mut self) -> Result<()> {
        self.request_priority(Priority::Interactive);

        let request = WindowRequest {
            title: self.config.display.title.clone(),
            width: self.config.display.width,
            height: self.config.display.height,
        };
        self.driver
            .acquire_window(&request)
            .context("Host rejected the window request")?;
        self.state = LifecycleState::AwaitingWindow;
        debug!("GenericPlatform: window requested, waiting for it to become ready");

        let (width, height) = self.wait_for_window()?;
        self.start_ms = self.driver.ticks_ms();
        self.surface_size = (width, height);
        self.clear_surface();
        self.state = LifecycleState::Ready;
        Ok(())
    }

    /// Blocks on the host event pump until the window is ready. Anything
    /// else arriving first is discarded.
    fn wait_for_window(&mut self) -> Result<(usize, usize)> {
        loop {
            match self
                .driver
                .next_event()
                .context("Event source closed before the window became ready")?
            {
                HostEvent::WindowReady { width, height } => return Ok((width, height)),
                other => trace!("GenericPlatform: discarding {:?} before window ready", other),
            }
        }
    }

    fn clear_surface(&mut self) {
        let (width, height) = self.surface_size;
        let color = self.config.display.clear_color;
        match self.driver.surface() {
            Some(surface) => {
                let mut surface = surface.clipped(width, height);
                if surface.is_valid() {
                    surface.fill(color);
                } else {
                    warn!("GenericPlatform: host surface does not fit its buffer, not clearing");
                }
            }
            None => warn!("GenericPlatform: no host surface to clear"),
        }
    }

    fn request_priority(&mut self, priority: Priority) {
        if let Err(e) = self.driver.set_priority(priority) {
            debug!("GenericPlatform: priority {:?} not applied: {:#}", priority, e);
        }
    }

    fn pump_events(&mut self) {
        while self.driver.has_pending_events() {
            match self.driver.next_event() {
                Ok(event) => self.handle_event(event),
                Err(e) => {
                    warn!("GenericPlatform: event pump failed: {:#}", e);
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, event: HostEvent) {
        trace!("GenericPlatform: {:?}", event);
        let capabilities = self.config.capabilities;
        match event {
            HostEvent::FocusGained => self.request_priority(Priority::Interactive),
            HostEvent::FocusLost => self.request_priority(Priority::Background),
            HostEvent::Key(raw) => {
                let (code, pressed) = decode_key_byte(raw);
                match self.translator.feed(code, pressed) {
                    Translation::Key(key) => self.keys.push(KeyEvent { key, pressed }),
                    Translation::Hotkey(Hotkey::YieldFocus) => {
                        debug!("GenericPlatform: meta+tab, yielding priority");
                        self.request_priority(Priority::Background);
                    }
                    Translation::Meta | Translation::Unmapped => {}
                }
            }
            HostEvent::MouseDown(button) | HostEvent::MouseUp(button)
                if capabilities.contains(Capabilities::MOUSE) =>
            {
                let pressed = matches!(event, HostEvent::MouseDown(_));
                let key = match button {
                    MouseButton::Left => engine_key::FIRE,
                    MouseButton::Right => engine_key::USE,
                    MouseButton::Middle | MouseButton::Other(_) => return,
                };
                self.keys.push(KeyEvent { key, pressed });
            }
            HostEvent::MouseMove { dx, dy } => {
                if let Some(mouse) = self.mouse.as_mut() {
                    mouse.push(MouseDelta { dx, dy });
                }
            }
            HostEvent::Resized { width, height } => {
                if capabilities.contains(Capabilities::FIXED_SURFACE) {
                    debug!(
                        "GenericPlatform: ignoring resize to {}x{} on a fixed surface",
                        width, height
                    );
                } else {
                    info!("GenericPlatform: surface resized to {}x{}", width, height);
                    self.surface_size = (width, height);
                }
            }
            HostEvent::WindowReady { .. } | HostEvent::MouseDown(_) | HostEvent::MouseUp(_) => {}
        }
    }

    fn present(&mut self, frame: &SourceFrame<'_>) {
        let (width, height) = self.surface_size;
        let Some(surface) = self.driver.surface() else {
            trace!("GenericPlatform: no host surface, skipping frame");
            self.presenter.skip();
            return;
        };
        let mut surface = surface.clipped(width, height);
        let Some(rect) = self.presenter.present(frame, &mut surface) else {
            return;
        };
        if rect.is_empty() {
            return;
        }
        if let Err(e) = self.driver.redraw_rect(rect) {
            warn!("GenericPlatform: redraw of {:?} failed: {:#}", rect, e);
        }
    }
}

impl<D: Driver> Platform for GenericPlatform<D> {
    fn init(&mut self) {
        if self.init_attempted {
            warn!("GenericPlatform::init called again (state {:?}), ignoring", self.state);
            return;
        }
        self.init_attempted = true;
        match self.try_init() {
            Ok(()) => info!(
                "GenericPlatform: window ready, surface {}x{}",
                self.surface_size.0, self.surface_size.1
            ),
            Err(e) => {
                error!("GenericPlatform: init failed, running without a window: {:#}", e);
                self.state = LifecycleState::Uninitialized;
            }
        }
    }

    fn draw_frame(&mut self, frame: &SourceFrame<'_>) {
        if self.state != LifecycleState::Ready {
            trace!("GenericPlatform: draw_frame before ready, ignoring");
            return;
        }
        self.pump_events();
        self.present(frame);
    }

    fn get_key(&mut self) -> Option<KeyEvent> {
        self.keys.try_pop()
    }

    fn get_mouse_delta(&mut self) -> Option<MouseDelta> {
        let sensitivity = self.config.input.mouse_sensitivity;
        self.mouse
            .as_mut()?
            .try_pop()
            .map(|delta| delta.scaled(sensitivity))
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.driver.sleep_ms(ms);
    }

    fn get_ticks_ms(&self) -> u32 {
        if self.state != LifecycleState::Ready {
            return 0;
        }
        let elapsed = self.driver.ticks_ms().saturating_sub(self.start_ms);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    fn set_window_title(&mut self, title: &str) {
        if self.state == LifecycleState::Ready {
            self.driver.set_title(title);
        } else {
            // Not shown yet; use it when the window is requested.
            self.config.display.title = title.to_string();
        }
    }
}

#[cfg(test)]
mod tests;
