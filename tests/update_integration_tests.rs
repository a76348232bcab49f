//! Integration tests for the simulated update cycle
//!
//! These tests run on a paused tokio clock, so the check latency, download
//! steps and install delay complete instantly while keeping their order.
//!
//! They verify:
//! - No-update and update-found outcomes and the resulting state
//! - The download finishing at 100% and the install resetting the flags
//! - Automatic checks at start-up and after reconnecting, with throttling

use daner::config::UpdateConfig;
use daner::services::{CheckOutcome, FixedRandom, NetworkMonitor, TokioClock, UpdateSimulator};
use std::sync::Arc;
use tokio::time::{Duration, sleep};

fn simulator(draw: f64, network: &Arc<NetworkMonitor>) -> UpdateSimulator {
    UpdateSimulator::new(
        UpdateConfig::default(),
        Arc::new(FixedRandom(draw)),
        network.clone(),
        Arc::new(TokioClock),
    )
}

#[tokio::test(start_paused = true)]
async fn test_no_update_found_clears_flags() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.5, &network);

    assert_eq!(sim.check_for_updates().await, CheckOutcome::NoUpdate);

    let state = sim.snapshot();
    assert!(!state.update_available);
    assert!(!state.checking);
    assert!(state.last_check_time.is_some());
    assert_eq!(state.status_text(), "You're up to date");
}

#[tokio::test(start_paused = true)]
async fn test_update_found_downloads_then_installs() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.95, &network);
    let mut rx = sim.subscribe();

    let outcome = sim.check_for_updates().await;
    assert_eq!(
        outcome,
        CheckOutcome::UpdateFound {
            version: "1.1.0".to_string()
        }
    );
    assert!(sim.snapshot().downloading);

    // Follow the published progress until the download completes
    let mut progress = Vec::new();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        progress.push(state.download_progress);
        if state.update_downloaded {
            break;
        }
    }
    assert_eq!(progress.last(), Some(&100));
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));

    let state = sim.snapshot();
    assert!(state.update_downloaded);
    assert!(!state.downloading);
    assert_eq!(state.status_text(), "Version 1.1.0 is ready to install");

    assert!(sim.install_update().await);
    let state = sim.snapshot();
    assert!(!state.update_available);
    assert!(!state.update_downloaded);
    assert_eq!(state.download_progress, 0);
    assert_eq!(state.current_version, "1.0.0");
}

#[tokio::test(start_paused = true)]
async fn test_install_without_download_is_rejected() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.1, &network);

    assert!(!sim.install_update().await);
}

#[tokio::test(start_paused = true)]
async fn test_offline_check_changes_nothing() {
    let network = Arc::new(NetworkMonitor::new(false));
    let sim = simulator(0.95, &network);
    let before = sim.snapshot();
    let mut rx = sim.subscribe();

    assert_eq!(sim.check_for_updates().await, CheckOutcome::Offline);
    assert_eq!(sim.snapshot(), before);
    assert_eq!(sim.snapshot().status_text(), before.status_text());

    // Nothing is published, so the window has nothing to redraw
    sleep(Duration::from_secs(5)).await;
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_check_during_download_is_busy() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.95, &network);

    sim.check_for_updates().await;
    assert_eq!(sim.check_for_updates().await, CheckOutcome::Busy);
}

#[tokio::test(start_paused = true)]
async fn test_startup_check_runs_when_online() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.2, &network);

    let _auto = sim.spawn_auto_checks(network.subscribe());

    sleep(Duration::from_millis(1000)).await;
    assert!(sim.snapshot().last_check_time.is_none());

    // start-up delay (2s) + check latency (1.5s)
    sleep(Duration::from_millis(3000)).await;
    assert!(sim.snapshot().last_check_time.is_some());
    assert!(!sim.snapshot().checking);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_triggers_check() {
    let network = Arc::new(NetworkMonitor::new(false));
    let sim = simulator(0.2, &network);

    let _auto = sim.spawn_auto_checks(network.subscribe());

    sleep(Duration::from_secs(10)).await;
    assert!(sim.snapshot().last_check_time.is_none());

    network.set_online(true);
    // reconnect delay (1s) + check latency (1.5s)
    sleep(Duration::from_secs(3)).await;
    assert!(sim.snapshot().last_check_time.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_soon_after_check_is_throttled() {
    let network = Arc::new(NetworkMonitor::new(true));
    let sim = simulator(0.2, &network);

    sim.check_for_updates().await;
    let first_check = sim.snapshot().last_check_time;

    let _auto = sim.spawn_auto_checks(network.subscribe());
    // Let the start-up check (which always runs when online) finish
    sleep(Duration::from_secs(4)).await;
    let startup_check = sim.snapshot().last_check_time;
    assert_ne!(startup_check, first_check);

    network.set_online(false);
    sleep(Duration::from_secs(1)).await;
    network.set_online(true);
    sleep(Duration::from_secs(5)).await;

    assert_eq!(sim.snapshot().last_check_time, startup_check);
}
