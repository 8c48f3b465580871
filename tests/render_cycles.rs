//! Render cycle integration tests.
//!
//! These tests drive a [`RenderCoordinator`] step by step through the
//! public API and verify the scheduling contract per dispatch mode:
//! which steps publish, which renders block, what the counters report.
//!
//! Step timing below assumes a 10 Hz publish rate against 100 ms
//! steps, so every post-warm-up step has a publish due and cycle
//! pacing comes purely from the strategy's waits.

use netra_rig::config::RigConfig;
use netra_rig::core::SensorRef;
use netra_rig::rig::RenderCoordinator;
use netra_rig::sim::SimCamera;
use std::thread;
use std::time::{Duration, Instant};

fn rig(count: usize, render: Duration) -> (Vec<SensorRef>, Vec<SimCamera>) {
    let cameras: Vec<SimCamera> = (0..count)
        .map(|i| SimCamera::new(&format!("cam{}", i), render))
        .collect();
    let sensors = cameras.iter().map(SimCamera::handle).collect();
    (sensors, cameras)
}

/// Build a warmed-up coordinator publishing at 10 Hz.
fn coordinator(sensors: Vec<SensorRef>, sequential: bool, strategy: u8) -> RenderCoordinator {
    let config = RigConfig {
        tick_rate_hz: 10,
        sequential,
        strategy,
        use_command_buffer: false,
    };
    let mut coordinator = RenderCoordinator::new(sensors, &config).unwrap();
    coordinator.step(Duration::from_secs(1));
    coordinator
}

fn run_steps(coordinator: &mut RenderCoordinator, count: usize, dt: Duration) {
    for _ in 0..count {
        coordinator.step(dt);
    }
}

/// Poll until the predicate holds or five seconds pass.
fn wait_for<F: Fn() -> bool>(predicate: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_sequential_frame_end_renders_in_camera_order() {
    let (sensors, cameras) = rig(3, Duration::from_millis(5));
    let mut coordinator = coordinator(sensors, true, 0);

    // one cycle spans three frame ends: two renders land in the
    // starting step, the third in the next, the final wait in a third
    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 4);
    for camera in &cameras {
        assert_eq!(camera.frames_captured(), 4);
    }

    let mut spans: Vec<(usize, Instant, Instant)> = Vec::new();
    for (index, camera) in cameras.iter().enumerate() {
        for (start, end) in camera.spans() {
            spans.push((index, start, end));
        }
    }
    spans.sort_by_key(|span| span.1);

    for (order, span) in spans.iter().enumerate() {
        assert_eq!(
            span.0,
            order % 3,
            "render {} should come from cam{}",
            order,
            order % 3
        );
    }
    for pair in spans.windows(2) {
        assert!(
            pair[0].2 <= pair[1].1,
            "sequential renders must not overlap"
        );
    }
}

#[test]
fn test_sequential_batched_counts_shade_requests() {
    let (sensors, cameras) = rig(2, Duration::ZERO);
    let config = RigConfig {
        tick_rate_hz: 10,
        sequential: true,
        strategy: 1,
        use_command_buffer: true,
    };
    let mut coordinator = RenderCoordinator::new(sensors, &config).unwrap();
    coordinator.step(Duration::from_secs(1));

    run_steps(&mut coordinator, 10, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 5);
    assert_eq!(snap.shade_requested, 10);
    assert_eq!(snap.shaded, 10);
    assert_eq!(snap.rendered, 10);
    assert_eq!(snap.render_requested, 10);
    for camera in &cameras {
        assert_eq!(camera.frames_captured(), 5);
    }
}

#[test]
fn test_fixed_step_final_render_not_waited() {
    let (sensors, cameras) = rig(3, Duration::ZERO);
    let mut coordinator = coordinator(sensors, true, 2);

    // fixed-step waits pipeline cycles two steps apart: the settling
    // step immediately starts the next cycle
    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 5);
    assert_eq!(snap.rendered, 17);
    assert_eq!(cameras[0].frames_captured(), 6);
    assert_eq!(cameras[1].frames_captured(), 6);
    assert_eq!(cameras[2].frames_captured(), 5);
}

#[test]
fn test_deferred_renders_settle_without_observed_completion() {
    let (sensors, cameras) = rig(2, Duration::from_millis(2));
    let mut coordinator = coordinator(sensors, true, 4);

    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 5);
    assert_eq!(snap.render_requested, 12);
    // deferred renders complete off-thread, the dispatcher never
    // observes them
    assert_eq!(snap.rendered, 0);

    assert!(cameras[0].wait_idle(Duration::from_secs(2)));
    assert!(cameras[1].wait_idle(Duration::from_secs(2)));
    assert_eq!(cameras[0].frames_captured(), 6);
    assert_eq!(cameras[1].frames_captured(), 6);
}

#[test]
fn test_concurrent_fire_and_forget_publishes_every_due_step() {
    let (sensors, cameras) = rig(3, Duration::ZERO);
    let mut coordinator = coordinator(sensors, false, 0);

    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 12);
    assert_eq!(snap.rendered, 36);
    assert_eq!(snap.requested, 36);
    for camera in &cameras {
        assert_eq!(camera.frames_captured(), 12);
    }
}

#[test]
fn test_join_all_settles_at_the_next_fixed_step() {
    let (sensors, _cameras) = rig(3, Duration::ZERO);
    let mut coordinator = coordinator(sensors, false, 4);

    // the first cycle settles in step 2; from then on every step both
    // settles the previous cycle and starts the next one
    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 11);
    assert_eq!(snap.rendered, 36);
}

#[test]
fn test_worker_offload_keeps_honest_counters() {
    let (sensors, cameras) = rig(4, Duration::from_millis(2));
    let mut coordinator = coordinator(sensors, false, 6);

    run_steps(&mut coordinator, 12, Duration::from_millis(100));

    // offloaded renders are never joined, publishes happen immediately
    assert_eq!(coordinator.counters().published, 12);

    assert!(
        wait_for(|| coordinator.counters().rendered == 48),
        "offloaded renders should all complete, got {}",
        coordinator.counters().rendered
    );
    let snap = coordinator.counters();
    assert_eq!(snap.render_requested, 48);
    for camera in &cameras {
        assert_eq!(camera.frames_captured(), 12);
    }
}

#[test]
fn test_parallel_fan_out_joins_within_the_step() {
    let (sensors, cameras) = rig(8, Duration::from_millis(2));
    cameras[3].set_active(false);
    cameras[7].set_active(false);
    let mut coordinator = coordinator(sensors, false, 7);

    run_steps(&mut coordinator, 6, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 6);
    assert_eq!(snap.rendered, 36);
    assert_eq!(snap.render_requested, snap.rendered);
    assert_eq!(cameras[3].frames_captured(), 0);
    assert_eq!(cameras[0].frames_captured(), 6);
}

#[test]
fn test_reserved_strategy_publishes_without_rendering() {
    let (sensors, cameras) = rig(2, Duration::ZERO);
    let mut coordinator = coordinator(sensors, false, 5);

    run_steps(&mut coordinator, 6, Duration::from_millis(100));

    let snap = coordinator.counters();
    assert_eq!(snap.published, 6);
    assert_eq!(snap.rendered, 0);
    assert_eq!(snap.render_requested, 0);
    assert!(snap.requested > 0);
    assert_eq!(cameras[0].frames_captured(), 0);
}

#[test]
fn test_publish_cadence_holds_at_simulated_sixty_hz() {
    let (sensors, _cameras) = rig(1, Duration::ZERO);
    let mut coordinator = coordinator(sensors, true, 0);

    let dt = Duration::from_secs_f64(1.0 / 60.0);
    run_steps(&mut coordinator, 1000, dt);

    // 16.667 s of simulated time at 10 Hz
    assert_eq!(coordinator.counters().published, 166);
}

#[test]
fn test_mode_presets_resolve_to_documented_modes() {
    let table = [
        (0, true, 0),
        (1, true, 1),
        (2, true, 2),
        (3, true, 3),
        (4, true, 4),
        (5, false, 0),
        (6, false, 1),
        (7, true, 0),
    ];

    for (preset, sequential, strategy) in table {
        let mut config = RigConfig::default();
        config.apply_mode(preset);
        let (sensors, _cameras) = rig(1, Duration::ZERO);
        let coordinator = RenderCoordinator::new(sensors, &config).unwrap();
        assert_eq!(
            coordinator.mode().is_sequential(),
            sequential,
            "preset {} family",
            preset
        );
        assert_eq!(
            coordinator.mode().strategy_id(),
            strategy,
            "preset {} strategy",
            preset
        );
    }
}
