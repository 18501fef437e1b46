// src/platform/tests.rs

use super::backends::mock::MockDriver;
use super::*;
use crate::display::{Pixel, Rect};
use crate::input::OverflowPolicy;
use crate::keys::{engine_key, scancode, KEY_UP_FLAG};
use anyhow::Result;
use test_log::test;

const W: usize = 320;
const H: usize = 200;

fn config(capabilities: Capabilities) -> Config {
    let mut config = Config::default();
    config.display.width = W;
    config.display.height = H;
    config.capabilities = capabilities;
    config
}

fn frame_pixels() -> Vec<Pixel> {
    (0..(W * H) as Pixel).collect()
}

fn ready_platform(capabilities: Capabilities) -> Result<GenericPlatform<MockDriver>> {
    let mut driver = MockDriver::new();
    driver.push_event(HostEvent::WindowReady { width: W, height: H });
    let mut platform = GenericPlatform::new(driver, &config(capabilities))?;
    platform.init();
    assert!(platform.is_ready());
    Ok(platform)
}

fn drain_keys(platform: &mut GenericPlatform<MockDriver>) -> Vec<KeyEvent> {
    std::iter::from_fn(|| platform.get_key()).collect()
}

#[test]
fn it_should_become_ready_and_clear_the_surface() -> Result<()> {
    let platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    assert_eq!(platform.state(), LifecycleState::Ready);
    assert_eq!(platform.surface_size(), (W, H));

    let driver = platform.driver();
    assert_eq!(driver.window_requests.len(), 1);
    assert_eq!(driver.window_requests[0].title, "DOOM");
    assert_eq!((driver.window_requests[0].width, driver.window_requests[0].height), (W, H));
    assert!(driver.framebuffer().iter().all(|&p| p == 0));
    assert_eq!(driver.priorities, vec![Priority::Interactive]);
    Ok(())
}

#[test]
fn it_should_discard_events_that_arrive_before_the_window_is_ready() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.push_events([
        HostEvent::Key(scancode::W),
        HostEvent::FocusLost,
        HostEvent::WindowReady { width: W, height: H },
        HostEvent::Key(scancode::S),
    ]);
    let mut platform = GenericPlatform::new(driver, &config(Capabilities::FIXED_SURFACE))?;
    platform.init();
    assert!(platform.is_ready());
    // Only the event after WindowReady is left for the first frame.
    assert_eq!(platform.driver().pending(), 1);
    assert_eq!(platform.get_key(), None);

    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(drain_keys(&mut platform), vec![KeyEvent::pressed(engine_key::DOWNARROW)]);
    Ok(())
}

#[test]
fn it_should_stay_uninitialized_when_the_window_is_rejected() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.reject_window = true;
    driver.push_event(HostEvent::Key(scancode::W));
    let mut platform = GenericPlatform::new(driver, &config(Capabilities::FIXED_SURFACE))?;
    platform.init();
    assert_eq!(platform.state(), LifecycleState::Uninitialized);

    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert!(platform.driver().redraws.is_empty());
    assert_eq!(platform.driver().pending(), 1, "events must not be drained");
    assert_eq!(platform.get_key(), None);
    assert_eq!(platform.get_ticks_ms(), 0);
    Ok(())
}

#[test]
fn it_should_stay_uninitialized_when_the_event_source_closes_before_ready() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.push_event(HostEvent::FocusGained);
    let mut platform = GenericPlatform::new(driver, &config(Capabilities::FIXED_SURFACE))?;
    platform.init();
    assert_eq!(platform.state(), LifecycleState::Uninitialized);
    Ok(())
}

#[test]
fn it_should_refuse_a_second_init() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.reject_window = true;
    let mut platform = GenericPlatform::new(driver, &config(Capabilities::FIXED_SURFACE))?;
    platform.init();
    platform.driver_mut().reject_window = false;
    platform.driver_mut().push_event(HostEvent::WindowReady { width: W, height: H });
    platform.init();
    assert_eq!(platform.state(), LifecycleState::Uninitialized);
    assert_eq!(platform.driver().window_requests.len(), 1);
    Ok(())
}

#[test]
fn it_should_present_the_frame_and_redraw_the_written_rect() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));

    assert_eq!(platform.driver().redraws, vec![Rect::from_size(W, H)]);
    assert_eq!(platform.driver().framebuffer(), pixels.as_slice());
    assert_eq!(platform.presenter().frames_presented(), 1);
    Ok(())
}

#[test]
fn it_should_skip_frames_without_a_surface() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform.driver_mut().withhold_surface = true;
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert!(platform.driver().redraws.is_empty());
    assert_eq!(platform.presenter().frames_skipped(), 1);
    Ok(())
}

#[test]
fn it_should_keep_running_when_a_redraw_fails() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform.driver_mut().fail_redraw = true;
    platform.driver_mut().push_event(HostEvent::Key(scancode::SPACE));
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(platform.get_key(), Some(KeyEvent::pressed(engine_key::USE)));
    Ok(())
}

#[test]
fn it_should_translate_key_presses_and_releases() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform.driver_mut().push_events([
        HostEvent::Key(scancode::W),
        HostEvent::Key(scancode::QUOTE),
        HostEvent::Key(0x10), // unmapped, dropped
        HostEvent::Key(scancode::W | KEY_UP_FLAG),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        drain_keys(&mut platform),
        vec![
            KeyEvent::pressed(engine_key::UPARROW),
            KeyEvent::pressed(engine_key::FIRE),
            KeyEvent::released(engine_key::UPARROW),
        ]
    );
    assert_eq!(platform.get_key(), None);
    Ok(())
}

#[test]
fn it_should_keep_the_newest_keys_when_the_queue_overflows() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.push_event(HostEvent::WindowReady { width: W, height: H });
    let mut cfg = config(Capabilities::FIXED_SURFACE);
    cfg.input.key_queue_capacity = 2;
    let mut platform = GenericPlatform::new(driver, &cfg)?;
    platform.init();

    // A pressed, B pressed, A released into a two-slot queue.
    platform.driver_mut().push_events([
        HostEvent::Key(scancode::A),
        HostEvent::Key(scancode::D),
        HostEvent::Key(scancode::A | KEY_UP_FLAG),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        drain_keys(&mut platform),
        vec![
            KeyEvent::pressed(engine_key::RIGHTARROW),
            KeyEvent::released(engine_key::LEFTARROW),
        ]
    );
    assert_eq!(platform.keys_dropped(), 1);
    Ok(())
}

#[test]
fn it_should_keep_the_oldest_keys_when_configured_to_drop_newest() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.push_event(HostEvent::WindowReady { width: W, height: H });
    let mut cfg = config(Capabilities::FIXED_SURFACE);
    cfg.input.key_queue_capacity = 2;
    cfg.input.overflow_policy = OverflowPolicy::DropNewest;
    let mut platform = GenericPlatform::new(driver, &cfg)?;
    platform.init();

    platform.driver_mut().push_events([
        HostEvent::Key(scancode::A),
        HostEvent::Key(scancode::D),
        HostEvent::Key(scancode::A | KEY_UP_FLAG),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        drain_keys(&mut platform),
        vec![
            KeyEvent::pressed(engine_key::LEFTARROW),
            KeyEvent::pressed(engine_key::RIGHTARROW),
        ]
    );
    Ok(())
}

#[test]
fn it_should_adjust_priority_on_focus_changes() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform
        .driver_mut()
        .push_events([HostEvent::FocusLost, HostEvent::FocusGained]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        platform.driver().priorities,
        vec![Priority::Interactive, Priority::Background, Priority::Interactive]
    );
    assert_eq!(platform.get_key(), None, "focus changes are not queued");
    Ok(())
}

#[test]
fn it_should_yield_priority_on_meta_tab_without_queueing_keys() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE | Capabilities::FOCUS_HOTKEY)?;
    platform.driver_mut().push_events([
        HostEvent::Key(scancode::META),
        HostEvent::Key(scancode::TAB),
        HostEvent::Key(scancode::TAB | KEY_UP_FLAG),
        HostEvent::Key(scancode::META | KEY_UP_FLAG),
        HostEvent::Key(scancode::TAB),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        platform.driver().priorities,
        vec![Priority::Interactive, Priority::Background]
    );
    assert_eq!(drain_keys(&mut platform), vec![KeyEvent::pressed(engine_key::TAB)]);
    Ok(())
}

#[test]
fn it_should_not_leak_the_tab_release_when_meta_is_let_go_first() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE | Capabilities::FOCUS_HOTKEY)?;
    platform.driver_mut().push_events([
        HostEvent::Key(scancode::META),
        HostEvent::Key(scancode::TAB),
        HostEvent::Key(scancode::META | KEY_UP_FLAG),
        HostEvent::Key(scancode::TAB | KEY_UP_FLAG),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(
        platform.driver().priorities,
        vec![Priority::Interactive, Priority::Background]
    );
    assert_eq!(drain_keys(&mut platform), Vec::<KeyEvent>::new());
    Ok(())
}

#[test]
fn it_should_scale_mouse_motion_when_read() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE | Capabilities::MOUSE)?;
    platform.driver_mut().push_events([
        HostEvent::MouseMove { dx: 2, dy: -1 },
        HostEvent::MouseDown(MouseButton::Left),
        HostEvent::MouseUp(MouseButton::Left),
        HostEvent::MouseDown(MouseButton::Right),
        HostEvent::MouseDown(MouseButton::Middle),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));

    assert_eq!(platform.get_mouse_delta(), Some(MouseDelta { dx: 8, dy: -4 }));
    assert_eq!(platform.get_mouse_delta(), None);
    assert_eq!(
        drain_keys(&mut platform),
        vec![
            KeyEvent::pressed(engine_key::FIRE),
            KeyEvent::released(engine_key::FIRE),
            KeyEvent::pressed(engine_key::USE),
        ]
    );
    Ok(())
}

#[test]
fn it_should_ignore_the_mouse_without_the_capability() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform.driver_mut().push_events([
        HostEvent::MouseMove { dx: 2, dy: -1 },
        HostEvent::MouseDown(MouseButton::Left),
    ]);
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(platform.get_mouse_delta(), None);
    assert_eq!(platform.get_key(), None);
    assert_eq!(platform.mouse_dropped(), 0);
    Ok(())
}

#[test]
fn it_should_downscale_into_a_resized_variable_surface() -> Result<()> {
    let mut platform = ready_platform(Capabilities::empty())?;
    platform.driver_mut().set_surface(160, 100, 0xffff_ffff);
    platform
        .driver_mut()
        .push_event(HostEvent::Resized { width: 160, height: 100 });
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));

    assert_eq!(platform.surface_size(), (160, 100));
    assert_eq!(platform.driver().redraws, vec![Rect::from_size(160, 100)]);
    let fb = platform.driver().framebuffer();
    assert_eq!(fb[0], pixels[0]);
    assert_eq!(fb[160 + 1], pixels[2 * W + 2]);
    Ok(())
}

#[test]
fn it_should_clip_a_fixed_surface_to_its_ready_size() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    platform
        .driver_mut()
        .push_event(HostEvent::Resized { width: 160, height: 100 });
    let pixels = frame_pixels();
    platform.draw_frame(&SourceFrame::new(&pixels, W, H));
    assert_eq!(platform.surface_size(), (W, H));
    assert_eq!(platform.driver().redraws, vec![Rect::from_size(W, H)]);
    Ok(())
}

#[test]
fn it_should_count_ticks_from_the_ready_transition() -> Result<()> {
    let mut platform = ready_platform(Capabilities::FIXED_SURFACE)?;
    assert_eq!(platform.get_ticks_ms(), 0);
    platform.sleep_ms(5);
    assert_eq!(platform.get_ticks_ms(), 5);
    platform.driver_mut().now_ms += 30;
    assert_eq!(platform.get_ticks_ms(), 35);
    assert_eq!(platform.driver().sleeps, vec![5]);
    Ok(())
}

#[test]
fn it_should_forward_titles_once_ready_and_remember_them_before() -> Result<()> {
    let mut driver = MockDriver::new();
    driver.push_event(HostEvent::WindowReady { width: W, height: H });
    let mut platform = GenericPlatform::new(driver, &config(Capabilities::FIXED_SURFACE))?;
    platform.set_window_title("Freedoom");
    platform.init();
    assert_eq!(platform.driver().window_requests[0].title, "Freedoom");
    assert!(platform.driver().titles.is_empty());

    platform.set_window_title("E1M1");
    assert_eq!(platform.driver().titles, vec!["E1M1".to_string()]);
    Ok(())
}

#[test]
fn it_should_reject_an_invalid_configuration() {
    let mut cfg = Config::default();
    cfg.input.key_queue_capacity = 0;
    assert!(GenericPlatform::new(MockDriver::new(), &cfg).is_err());
}
