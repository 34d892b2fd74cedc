use std::time::Duration;

use coffee_smoke::app::{Clock, RenderLoop};

#[test]
fn loop_starts_stopped_with_zero_elapsed() {
    let render_loop = RenderLoop::new();
    assert!(!render_loop.is_running());
    assert_eq!(render_loop.elapsed(), Duration::ZERO);
}

#[test]
fn start_and_stop_toggle_running() {
    let mut render_loop = RenderLoop::new();
    render_loop.start();
    assert!(render_loop.is_running());
    render_loop.stop();
    assert!(!render_loop.is_running());
    render_loop.start();
    assert!(render_loop.is_running());
}

#[test]
fn elapsed_time_never_decreases() {
    let mut render_loop = RenderLoop::new();
    render_loop.start();

    let mut previous = render_loop.elapsed();
    for _ in 0..50 {
        let now = render_loop.elapsed();
        assert!(now >= previous);
        previous = now;
    }
}

#[test]
fn stopping_does_not_reset_the_clock() {
    let mut render_loop = RenderLoop::new();
    render_loop.start();
    std::thread::sleep(Duration::from_millis(5));
    let before = render_loop.elapsed();

    render_loop.stop();
    render_loop.start();
    assert!(render_loop.elapsed() >= before);
}

#[test]
fn clock_is_monotonic() {
    let clock = Clock::start();
    let first = clock.elapsed();
    std::thread::sleep(Duration::from_millis(2));
    let second = clock.elapsed();
    assert!(second >= first);
    assert!(second >= Duration::from_millis(2));
}
