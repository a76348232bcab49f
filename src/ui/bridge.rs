// EventLoopBridge - Coordinates between tokio async runtime and Slint event loop
//
// Two event loops run side by side:
// 1. Slint's single-threaded GUI event loop
// 2. Tokio's multi-threaded runtime for file I/O and the update simulator timers
//
// The bridge provides:
// - Safe UI updates from tokio tasks via upgrade_in_event_loop
// - Spawning async tasks from Slint callbacks
// - Forwarding watch-channel values (settings, theme, update state) to the UI

use slint::{ComponentHandle, Weak};
use std::future::Future;
use tokio::sync::{mpsc, watch};

type UiUpdate<T> = Box<dyn FnOnce(&T) + Send>;

/// Coordinates between tokio async runtime and Slint event loop
///
/// # Example
/// ```ignore
/// let runtime = tokio::runtime::Runtime::new()?;
/// let ui = MainWindow::new()?;
/// let bridge = EventLoopBridge::new(&ui, runtime.handle().clone());
///
/// bridge.spawn_async(move || async move {
///     let stats = introspector.inspect(&file).await;
///     handle.update_ui(move |ui| ui.set_file_rows(stats_text(stats).0.into()));
/// });
/// ```
pub struct EventLoopBridge<T: ComponentHandle> {
    handle: EventLoopBridgeHandle<T>,
}

impl<T: ComponentHandle + 'static> EventLoopBridge<T> {
    /// Create a new EventLoopBridge
    ///
    /// This sets up a background handler thread that receives UI update requests
    /// and queues them on the Slint event loop.
    ///
    /// # Arguments
    /// * `ui` - Strong reference to the Slint UI component
    /// * `tokio_handle` - Handle to the tokio runtime for spawning tasks
    pub fn new(ui: &T, tokio_handle: tokio::runtime::Handle) -> Self {
        let ui_weak = ui.as_weak();
        // Bounded so a stalled UI cannot grow the queue without limit
        let (ui_update_tx, mut ui_update_rx) = mpsc::channel::<UiUpdate<T>>(100);

        let ui_weak_clone = ui_weak.clone();
        std::thread::spawn(move || {
            tracing::debug!("EventLoopBridge handler thread started");

            while let Some(update_fn) = ui_update_rx.blocking_recv() {
                let result = ui_weak_clone.upgrade_in_event_loop(move |ui| {
                    update_fn(&ui);
                });

                if let Err(e) = result {
                    // The event loop has stopped; nothing left to update
                    tracing::warn!("Failed to queue UI update to event loop: {:?}", e);
                    break;
                }
            }

            tracing::debug!("EventLoopBridge handler thread terminated");
        });

        Self {
            handle: EventLoopBridgeHandle {
                ui_weak,
                tokio_handle,
                ui_update_tx,
            },
        }
    }

    /// Schedule a UI update from any thread. See [`EventLoopBridgeHandle::update_ui`].
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.handle.update_ui(update);
    }

    /// Spawn an async task on the tokio runtime from a Slint callback
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn_async(future_factory);
    }

    /// Clone the bridge for use in multiple callbacks
    pub fn clone_handle(&self) -> EventLoopBridgeHandle<T> {
        self.handle.clone()
    }
}

/// Lightweight handle that can be cloned and passed to callbacks
pub struct EventLoopBridgeHandle<T: ComponentHandle> {
    ui_weak: Weak<T>,
    tokio_handle: tokio::runtime::Handle,
    ui_update_tx: mpsc::Sender<UiUpdate<T>>,
}

// Manual Clone implementation to avoid requiring T: Clone
impl<T: ComponentHandle> Clone for EventLoopBridgeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            ui_weak: self.ui_weak.clone(),
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

impl<T: ComponentHandle + 'static> EventLoopBridgeHandle<T> {
    /// Schedule a UI update from any thread
    ///
    /// The closure runs on the Slint event loop thread on its next iteration.
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        match self.ui_update_tx.try_send(Box::new(update)) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("UI update channel full - skipping update to prevent backpressure");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!("Failed to send UI update - handler thread has stopped");
            }
        }
    }

    /// Spawn an async task on the tokio runtime
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }

    /// Push every new value of `rx` into the UI with `apply`
    ///
    /// Runs until the sending side is dropped. Intermediate values may be
    /// skipped when they change faster than the task is scheduled; the latest
    /// one is always delivered.
    pub fn forward_watch<V, F>(&self, rx: watch::Receiver<V>, apply: F)
    where
        V: Clone + Send + Sync + 'static,
        F: Fn(&T, V) + Send + Sync + Clone + 'static,
    {
        let handle = self.clone();
        self.tokio_handle.spawn(pump_watch(rx, move |value: V| {
            let apply = apply.clone();
            handle.update_ui(move |ui| apply(ui, value));
        }));
    }

    /// Weak reference to the UI component
    pub fn ui_weak(&self) -> &Weak<T> {
        &self.ui_weak
    }
}

/// Hand each value seen on `rx` to `sink` until the sender is dropped.
async fn pump_watch<V, S>(mut rx: watch::Receiver<V>, sink: S)
where
    V: Clone,
    S: Fn(V),
{
    while rx.changed().await.is_ok() {
        let value = rx.borrow_and_update().clone();
        sink(value);
    }
    tracing::trace!("Watch channel closed, stopping UI forwarder");
}
