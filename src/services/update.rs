// Simulated application self-update
//
// check -> (update found?) -> download with progress -> ready to install -> install
//
// Nothing is fetched: the check waits a fixed latency and draws a random number,
// the download advances a progress counter on a timer, and installing only
// resets the flags. Randomness, time and network presence are injected so the
// cycle can be driven deterministically.

use crate::config::{ConnectivityConfig, UpdateConfig};
use crate::models::UpdateState;
use crate::models::update::SIMULATED_NEW_VERSION;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

/// A draw above this value counts as "update found" (~30%).
pub const UPDATE_THRESHOLD: f64 = 0.7;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}

/// [`RandomSource`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// [`RandomSource`] that always returns the same draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.0
    }
}

/// Monotonic time source used to throttle rechecks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// [`Clock`] following the tokio timer, so paused test runtimes control it too.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Whether the network is currently reachable.
#[cfg_attr(test, mockall::automock)]
pub trait NetworkStatus: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Shared network presence flag with change notification.
#[derive(Debug)]
pub struct NetworkMonitor {
    online_tx: watch::Sender<bool>,
}

impl NetworkMonitor {
    pub fn new(online: bool) -> Self {
        let (online_tx, _) = watch::channel(online);
        Self { online_tx }
    }

    /// Record the current presence; subscribers are only woken on a real change.
    pub fn set_online(&self, online: bool) {
        let changed = self.online_tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });

        if changed {
            tracing::info!("Network is now {}", if online { "online" } else { "offline" });
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }

    /// Periodically test connectivity by opening a TCP connection to `probe_addr`.
    pub fn spawn_probe(self: &Arc<Self>, config: &ConnectivityConfig) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let addr = config.probe_addr.clone();
        let interval = Duration::from_secs(config.probe_interval_secs.max(1));
        let probe_timeout = Duration::from_millis(config.probe_timeout_ms);

        tokio::spawn(async move {
            loop {
                let online = matches!(
                    timeout(probe_timeout, TcpStream::connect(addr.as_str())).await,
                    Ok(Ok(_))
                );
                tracing::trace!("Connectivity probe to {}: online={}", addr, online);
                monitor.set_online(online);
                sleep(interval).await;
            }
        })
    }
}

impl NetworkStatus for NetworkMonitor {
    fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }
}

/// How a call to [`UpdateSimulator::check_for_updates`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Network reported offline; nothing happened.
    Offline,
    /// A check or download was already running.
    Busy,
    NoUpdate,
    /// An update was found and its download has been started.
    UpdateFound { version: String },
}

struct Inner {
    state_tx: watch::Sender<UpdateState>,
    random: Arc<dyn RandomSource>,
    network: Arc<dyn NetworkStatus>,
    clock: Arc<dyn Clock>,
    timings: UpdateConfig,
}

/// Process-wide owner of [`UpdateState`].
///
/// Cheap to clone; all clones drive the same state. Only one check/download
/// cycle runs at a time: overlapping checks return [`CheckOutcome::Busy`].
#[derive(Clone)]
pub struct UpdateSimulator {
    inner: Arc<Inner>,
}

impl UpdateSimulator {
    pub fn new(
        timings: UpdateConfig,
        random: Arc<dyn RandomSource>,
        network: Arc<dyn NetworkStatus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state_tx, _) = watch::channel(UpdateState::default());
        Self {
            inner: Arc::new(Inner {
                state_tx,
                random,
                network,
                clock,
                timings,
            }),
        }
    }

    pub fn snapshot(&self) -> UpdateState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UpdateState> {
        self.inner.state_tx.subscribe()
    }

    /// Run one simulated check. When an update is found its download is
    /// spawned on the current runtime before this returns.
    pub async fn check_for_updates(&self) -> CheckOutcome {
        if !self.inner.network.is_online() {
            tracing::info!("Cannot check for updates: No internet connection");
            return CheckOutcome::Offline;
        }

        let now = self.inner.clock.now();
        let started = self.inner.state_tx.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            state.checking = true;
            state.last_check_time = Some(now);
            true
        });

        if !started {
            tracing::debug!("Update check skipped: another cycle is running");
            return CheckOutcome::Busy;
        }

        tracing::info!("Checking for updates...");
        sleep(self.inner.timings.check_latency()).await;

        let draw = self.inner.random.next_f64();
        if draw > UPDATE_THRESHOLD {
            let version = SIMULATED_NEW_VERSION.to_string();
            // Downloading is raised together with clearing checking so the
            // reentrancy guard never sees an idle gap.
            self.inner.state_tx.send_modify(|state| {
                state.new_version = version.clone();
                state.update_available = true;
                state.checking = false;
                state.downloading = true;
                state.download_progress = 0;
            });

            tracing::info!("Update available: {}", version);
            let simulator = self.clone();
            tokio::spawn(async move { simulator.download_update().await });

            CheckOutcome::UpdateFound { version }
        } else {
            self.inner.state_tx.send_modify(|state| {
                state.update_available = false;
                state.update_downloaded = false;
                state.checking = false;
            });

            tracing::info!("No update available");
            CheckOutcome::NoUpdate
        }
    }

    /// Advance the download progress in equal steps up to 100.
    async fn download_update(&self) {
        let steps = self.inner.timings.download_steps;
        tracing::debug!("Downloading update in {} steps", steps);

        for step in 1..=steps {
            sleep(self.inner.timings.download_step()).await;
            let progress = (u64::from(step) * 100 / u64::from(steps)) as u8;
            self.inner
                .state_tx
                .send_modify(|state| state.download_progress = progress);
        }

        self.inner.state_tx.send_modify(|state| {
            state.download_progress = 100;
            state.downloading = false;
            state.update_downloaded = true;
        });

        tracing::info!("Update downloaded and ready to install");
    }

    /// Simulate installing the downloaded update.
    ///
    /// Waits the install delay, then clears the update flags and progress. The
    /// reported current version stays the same. Returns false when there was no
    /// downloaded update to install.
    pub async fn install_update(&self) -> bool {
        let (downloaded, version) = {
            let state = self.inner.state_tx.borrow();
            (state.update_downloaded, state.new_version.clone())
        };

        if !downloaded {
            tracing::warn!("Install requested but no update has been downloaded");
            return false;
        }

        tracing::info!("Installing update and restarting...");
        sleep(self.inner.timings.install_delay()).await;

        tracing::info!("App would restart here with version {}", version);
        self.inner.state_tx.send_modify(|state| {
            state.update_available = false;
            state.update_downloaded = false;
            state.download_progress = 0;
        });
        true
    }

    /// Whether enough time has passed since the last check to check again.
    pub fn recheck_due(&self) -> bool {
        match self.inner.state_tx.borrow().last_check_time {
            Some(last) => {
                self.inner.clock.now().saturating_duration_since(last)
                    > self.inner.timings.recheck_interval()
            }
            None => true,
        }
    }

    /// Start the automatic checks.
    ///
    /// - once at start-up, after the start-up delay, when currently online;
    /// - after every offline -> online transition seen on `online_rx`, when
    ///   [`recheck_due`](Self::recheck_due).
    pub fn spawn_auto_checks(&self, mut online_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let simulator = self.clone();

        tokio::spawn(async move {
            if simulator.inner.network.is_online() {
                simulator.spawn_delayed_check(simulator.inner.timings.startup_check_delay());
            }

            let mut was_online = *online_rx.borrow_and_update();
            while online_rx.changed().await.is_ok() {
                let online = *online_rx.borrow_and_update();
                if online && !was_online {
                    if simulator.recheck_due() {
                        tracing::debug!("Back online, scheduling update check");
                        simulator
                            .spawn_delayed_check(simulator.inner.timings.reconnect_check_delay());
                    } else {
                        tracing::debug!("Back online, last update check is recent");
                    }
                }
                was_online = online;
            }
        })
    }

    fn spawn_delayed_check(&self, delay: Duration) {
        let simulator = self.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            simulator.check_for_updates().await;
        });
    }
}
