//! # Phase Cycler Verification Tests
//!
//! End-to-end checks of a running traffic light:
//!
//! 1. **Alternation**: published phases alternate, starting with green
//! 2. **Timing**: every interval matches the seeded schedule (±50 ms)
//! 3. **Scenario**: a default light turns green within 7.1 s
//! 4. **Shutdown**: stopping wakes waiters and ends the thread
//!
//! Run with: cargo test --package signal_core --test phase_cycler_test -- --nocapture

use signal_core::{CycleConfig, CycleSchedule, CyclerError, Phase, PhaseCycler};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const JITTER: Duration = Duration::from_millis(50);

#[test]
fn verify_alternation_and_timing() {
    let config = CycleConfig::default()
        .with_cycle_range(200, 300)
        .with_seed(11);
    let mut expected = CycleSchedule::from_seed(11, &config).unwrap();

    let light = PhaseCycler::new(1, config).unwrap();
    let start = Instant::now();
    let handle = light.simulate().unwrap();

    let mut phases = Vec::new();
    let mut stamps = vec![start];
    for _ in 0..6 {
        let phase = light
            .mailbox()
            .receive_timeout(Duration::from_secs(2))
            .unwrap();
        phases.push(phase);
        stamps.push(Instant::now());
    }
    handle.join().unwrap();

    // Alternation, first change is to green
    assert_eq!(phases[0], Phase::Green);
    for pair in phases.windows(2) {
        assert_ne!(pair[0], pair[1], "phases did not alternate: {phases:?}");
    }

    // Each interval is the drawn duration plus scheduling noise
    for (i, pair) in stamps.windows(2).enumerate() {
        let interval = pair[1].duration_since(pair[0]);
        let drawn = expected.next_duration();
        println!("cycle {i}: drawn {drawn:?}, measured {interval:?}");

        assert!(interval + JITTER >= drawn, "cycle {i} too short: {interval:?} < {drawn:?}");
        assert!(interval <= drawn + JITTER, "cycle {i} too long: {interval:?} > {drawn:?}");
        assert!(interval + JITTER >= Duration::from_millis(200));
        assert!(interval < Duration::from_millis(300) + JITTER);
    }

    let stats = light.stats();
    assert!(stats.toggles >= 6);
    assert!(stats.greens >= 3);
}

#[test]
fn verify_default_light_turns_green_in_time() {
    let light = PhaseCycler::new(2, CycleConfig::default()).unwrap();
    assert_eq!(light.current_phase(), Phase::Red);

    let start = Instant::now();
    let handle = light.simulate().unwrap();

    let waiter = {
        let light = Arc::clone(&light);
        thread::spawn(move || {
            light.wait_for_green()?;
            Ok::<_, CyclerError>(Instant::now())
        })
    };

    let returned_at = waiter.join().unwrap().unwrap();
    let waited = returned_at.duration_since(start);
    println!("waited {waited:?} for green");
    assert!(waited >= Duration::from_millis(4_000) - JITTER);
    assert!(waited < Duration::from_millis(7_100));

    // Eventually consistent snapshot
    let deadline = Instant::now() + Duration::from_millis(100);
    while light.current_phase() != Phase::Green && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(light.current_phase(), Phase::Green);

    handle.join().unwrap();
}

#[test]
fn verify_wait_for_green_returns_repeatedly() {
    let light = PhaseCycler::new(3, CycleConfig::fast().with_seed(3)).unwrap();
    let handle = light.simulate().unwrap();

    for _ in 0..3 {
        light
            .wait_for_green_timeout(Duration::from_secs(2))
            .unwrap();
    }
    assert!(light.stats().greens >= 3);

    handle.join().unwrap();
}

#[test]
fn verify_stop_releases_all_waiters() {
    let light = PhaseCycler::new(4, CycleConfig::default().with_seed(4)).unwrap();
    let handle = light.simulate().unwrap();

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let light = Arc::clone(&light);
            thread::spawn(move || light.wait_for_green())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    handle.stop();

    for w in waiters {
        assert_eq!(w.join().unwrap(), Err(CyclerError::Stopped(4)));
    }

    handle.join().unwrap();
    assert!(!light.is_running());
    assert_eq!(light.current_phase(), Phase::Red);
}
