//! Update service bridge
//!
//! The bridge is whatever delivers lifecycle events and performs the actual
//! check / install / open-download-page work. The notice only talks to it
//! through [`UpdateBridge`], so tests can swap in a fake.

pub mod simulated;

use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use crate::error::BridgeError;
use crate::update::{CheckResponse, ProgressSample, UpdateInfo};

pub use simulated::SimulatedBridge;

/// Callback invoked for every delivered event
pub type Handler<T> = Box<dyn Fn(T) + Send + Sync>;

/// Typed interface to the update service
pub trait UpdateBridge {
    /// Explicit request to show the update notice
    fn on_popup_trigger(&self, handler: Handler<UpdateInfo>) -> Subscription;

    /// An update was found
    fn on_update_available(&self, handler: Handler<UpdateInfo>) -> Subscription;

    /// Download progress
    fn on_download_progress(&self, handler: Handler<ProgressSample>) -> Subscription;

    /// Download finished
    fn on_update_downloaded(&self, handler: Handler<UpdateInfo>) -> Subscription;

    /// Ask whether an update exists
    fn check_for_updates(&self) -> impl Future<Output = Result<CheckResponse, BridgeError>> + Send;

    /// Install the downloaded update and restart
    fn quit_and_install_update(&self) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Open the manual download page
    fn open_download_page(&self) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

/// Handle to a registered handler; disposing (or dropping) it unregisters
#[must_use = "dropping a subscription unregisters its handler"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Subscription running `dispose` once when released
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Subscription with nothing to release
    pub fn empty() -> Self {
        Self { dispose: None }
    }

    /// Unregister now
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.dispose.is_some())
            .finish()
    }
}

struct HubInner<T> {
    next_id: u64,
    handlers: Vec<(u64, Arc<Handler<T>>)>,
}

/// Fan-out of one event kind to any number of handlers.
///
/// Cloning shares the same handler list.
pub struct EventHub<T> {
    inner: Arc<Mutex<HubInner<T>>>,
}

impl<T> Clone for EventHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventHub<T> {
    /// Hub without handlers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Number of live handlers
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.handlers.len()).unwrap_or(0)
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Send + 'static> EventHub<T> {
    /// Register a handler
    pub fn subscribe(&self, handler: Handler<T>) -> Subscription {
        let Ok(mut inner) = self.inner.lock() else {
            return Subscription::empty();
        };
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        drop(inner);

        let weak: Weak<Mutex<HubInner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade()
                && let Ok(mut inner) = shared.lock()
            {
                inner.handlers.retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }
}

impl<T: Clone> EventHub<T> {
    /// Deliver an event to every handler, returning how many saw it
    pub fn emit(&self, event: &T) -> usize {
        // Handlers run outside the lock so they may (un)subscribe
        let handlers: Vec<Arc<Handler<T>>> = match self.inner.lock() {
            Ok(inner) => inner.handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
            Err(_) => return 0,
        };
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }
}

/// The four lifecycle event hubs a bridge implementation exposes
#[derive(Clone, Default)]
pub struct LifecycleHubs {
    /// Popup trigger
    pub popup_trigger: EventHub<UpdateInfo>,
    /// Update available
    pub update_available: EventHub<UpdateInfo>,
    /// Download progress
    pub download_progress: EventHub<ProgressSample>,
    /// Update downloaded
    pub update_downloaded: EventHub<UpdateInfo>,
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scriptable bridge for tests

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{Handler, LifecycleHubs, Subscription, UpdateBridge};
    use crate::error::BridgeError;
    use crate::update::{CheckResponse, ProgressSample, UpdateInfo};

    #[derive(Default)]
    pub struct FakeBridge {
        pub hubs: LifecycleHubs,
        pub check: Mutex<Option<Result<CheckResponse, BridgeError>>>,
        pub install_results: Mutex<VecDeque<Result<(), BridgeError>>>,
        pub download_results: Mutex<VecDeque<Result<(), BridgeError>>>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeBridge {
        pub fn with_check(result: Result<CheckResponse, BridgeError>) -> Self {
            let bridge = Self::default();
            *bridge.check.lock().unwrap() = Some(result);
            bridge
        }

        pub fn push_install(&self, result: Result<(), BridgeError>) {
            self.install_results.lock().unwrap().push_back(result);
        }

        pub fn push_download(&self, result: Result<(), BridgeError>) {
            self.download_results.lock().unwrap().push_back(result);
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl UpdateBridge for FakeBridge {
        fn on_popup_trigger(&self, handler: Handler<UpdateInfo>) -> Subscription {
            self.hubs.popup_trigger.subscribe(handler)
        }

        fn on_update_available(&self, handler: Handler<UpdateInfo>) -> Subscription {
            self.hubs.update_available.subscribe(handler)
        }

        fn on_download_progress(&self, handler: Handler<ProgressSample>) -> Subscription {
            self.hubs.download_progress.subscribe(handler)
        }

        fn on_update_downloaded(&self, handler: Handler<UpdateInfo>) -> Subscription {
            self.hubs.update_downloaded.subscribe(handler)
        }

        async fn check_for_updates(&self) -> Result<CheckResponse, BridgeError> {
            self.record("check");
            self.check
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok(CheckResponse::default()))
        }

        async fn quit_and_install_update(&self) -> Result<(), BridgeError> {
            self.record("install");
            self.install_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }

        async fn open_download_page(&self) -> Result<(), BridgeError> {
            self.record("open-download-page");
            self.download_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> Handler<u32> {
        let counter = Arc::clone(counter);
        Box::new(move |n| {
            counter.fetch_add(n as usize, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_emit_reaches_all_handlers() {
        let hub = EventHub::<u32>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _a = hub.subscribe(counting_handler(&counter));
        let _b = hub.subscribe(counting_handler(&counter));

        assert_eq!(hub.emit(&3), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_dispose_unregisters() {
        let hub = EventHub::<u32>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = hub.subscribe(counting_handler(&counter));
        let _kept = hub.subscribe(counting_handler(&counter));
        assert_eq!(hub.len(), 2);

        sub.dispose();
        assert_eq!(hub.len(), 1);
        hub.emit(&1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unregisters() {
        let hub = EventHub::<u32>::new();
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _sub = hub.subscribe(counting_handler(&counter));
            assert_eq!(hub.len(), 1);
        }
        assert!(hub.is_empty());
        assert_eq!(hub.emit(&1), 0);
    }

    #[test]
    fn test_subscription_outliving_hub_is_harmless() {
        let hub = EventHub::<u32>::new();
        let sub = hub.subscribe(Box::new(|_| {}));
        drop(hub);
        sub.dispose();
    }

    #[test]
    fn test_clones_share_handlers() {
        let hub = EventHub::<u32>::new();
        let other = hub.clone();
        let counter = Arc::new(AtomicUsize::new(0));
        let _sub = hub.subscribe(counting_handler(&counter));
        other.emit(&5);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
