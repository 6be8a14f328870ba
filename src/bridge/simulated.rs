//! Configuration-driven update service
//!
//! Stands in for a real updater: the check compares two configured versions,
//! the "download" is a timer that emits progress samples, and the actions
//! fail a configured number of times before succeeding. A successful action
//! asks the host to exit, which is what a real install/restart would do. The
//! request is only raised once every step of the action has succeeded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use super::{Handler, LifecycleHubs, Subscription, UpdateBridge};
use crate::config::{Config, SimulationConfig};
use crate::error::BridgeError;
use crate::update::{CheckResponse, ProgressSample, UpdateInfo, version_is_newer};

/// Launches the download page in the user's browser
type Opener = fn(&str) -> std::io::Result<()>;

fn open_in_browser(url: &str) -> std::io::Result<()> {
    open::that(url)
}

/// Simulated update service
#[derive(Clone)]
pub struct SimulatedBridge {
    inner: Arc<Inner>,
}

struct Inner {
    settings: SimulationConfig,
    download_page_url: String,
    opener: Opener,
    hubs: LifecycleHubs,
    download_started: AtomicBool,
    install_attempts: AtomicU32,
    download_page_attempts: AtomicU32,
    exit_requested: AtomicBool,
}

impl SimulatedBridge {
    /// Bridge behaving as described by `settings`
    pub fn new(settings: SimulationConfig, download_page_url: impl Into<String>) -> Self {
        Self::with_opener(settings, download_page_url, open_in_browser)
    }

    fn with_opener(
        settings: SimulationConfig,
        download_page_url: impl Into<String>,
        opener: Opener,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                download_page_url: download_page_url.into(),
                opener,
                hubs: LifecycleHubs::default(),
                download_started: AtomicBool::new(false),
                install_attempts: AtomicU32::new(0),
                download_page_attempts: AtomicU32::new(0),
                exit_requested: AtomicBool::new(false),
            }),
        }
    }

    /// Bridge for the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.simulation.clone(), config.download_page_url.clone())
    }

    /// Whether a successful action asked the application to go away
    pub fn exit_requested(&self) -> bool {
        self.inner.exit_requested.load(Ordering::SeqCst)
    }

    /// Event hubs, for pushing events by hand
    pub fn hubs(&self) -> &LifecycleHubs {
        &self.inner.hubs
    }

    fn info(&self) -> UpdateInfo {
        let settings = &self.inner.settings;
        UpdateInfo {
            current_version: Some(settings.current_version.clone()),
            new_version: Some(settings.latest_version.clone()),
            version: Some(settings.latest_version.clone()),
        }
    }

    /// Emit the "update available" signals and start the download once
    fn announce(&self) {
        let info = self.info();
        self.inner.hubs.update_available.emit(&info);
        if self.inner.settings.emit_popup_trigger {
            self.inner.hubs.popup_trigger.emit(&info);
        }

        if self.inner.download_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let bridge = self.clone();
        tokio::spawn(async move { bridge.stream_download(info).await });
    }

    async fn stream_download(self, info: UpdateInfo) {
        let settings = &self.inner.settings;
        let total = settings.total_bytes.max(1);
        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let per_tick = (settings.bytes_per_second.saturating_mul(settings.tick_ms) / 1000).max(1);

        tracing::debug!(total, per_tick, "Simulated download started");

        let mut transferred = 0u64;
        while transferred < total {
            tokio::time::sleep(tick).await;
            transferred = transferred.saturating_add(per_tick).min(total);
            let sample = download_sample(transferred, total, settings.bytes_per_second);
            self.inner.hubs.download_progress.emit(&sample);
        }

        tracing::debug!("Simulated download finished");
        self.inner.hubs.update_downloaded.emit(&info);
    }

    fn request_exit(&self) {
        self.inner.exit_requested.store(true, Ordering::SeqCst);
    }
}

/// Count one attempt; the first `failures` attempts are rejected
fn attempt(attempts: &AtomicU32, failures: u32, what: &str) -> Result<(), BridgeError> {
    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
    if attempt < failures {
        return Err(BridgeError::rejected(format!(
            "{what} failed (simulated, attempt {})",
            attempt + 1
        )));
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn download_sample(transferred: u64, total: u64, bytes_per_second: u64) -> ProgressSample {
    ProgressSample {
        percent: Some(transferred as f64 / total as f64 * 100.0),
        bytes_per_second: Some(bytes_per_second as f64),
        transferred: Some(transferred as f64),
        total: Some(total as f64),
    }
}

impl UpdateBridge for SimulatedBridge {
    fn on_popup_trigger(&self, handler: Handler<UpdateInfo>) -> Subscription {
        self.inner.hubs.popup_trigger.subscribe(handler)
    }

    fn on_update_available(&self, handler: Handler<UpdateInfo>) -> Subscription {
        self.inner.hubs.update_available.subscribe(handler)
    }

    fn on_download_progress(&self, handler: Handler<ProgressSample>) -> Subscription {
        self.inner.hubs.download_progress.subscribe(handler)
    }

    fn on_update_downloaded(&self, handler: Handler<UpdateInfo>) -> Subscription {
        self.inner.hubs.update_downloaded.subscribe(handler)
    }

    async fn check_for_updates(&self) -> Result<CheckResponse, BridgeError> {
        let settings = &self.inner.settings;
        tokio::time::sleep(Duration::from_millis(settings.check_delay_ms)).await;

        if let Some(error) = &settings.check_error {
            return Err(BridgeError::rejected(error.clone()));
        }

        let update_available =
            version_is_newer(&settings.latest_version, &settings.current_version);
        tracing::debug!(
            current = %settings.current_version,
            latest = %settings.latest_version,
            update_available,
            "Simulated update check"
        );

        if update_available {
            self.announce();
        }

        Ok(CheckResponse {
            update_available,
            current_version: Some(settings.current_version.clone()),
            new_version: update_available.then(|| settings.latest_version.clone()),
            version: update_available.then(|| settings.latest_version.clone()),
            error: None,
        })
    }

    async fn quit_and_install_update(&self) -> Result<(), BridgeError> {
        tokio::time::sleep(Duration::from_millis(self.inner.settings.tick_ms)).await;
        attempt(
            &self.inner.install_attempts,
            self.inner.settings.install_failures,
            "Install",
        )?;
        self.request_exit();
        Ok(())
    }

    async fn open_download_page(&self) -> Result<(), BridgeError> {
        let url = &self.inner.download_page_url;
        attempt(
            &self.inner.download_page_attempts,
            self.inner.settings.download_page_failures,
            "Opening the download page",
        )?;
        if self.inner.settings.open_browser {
            (self.inner.opener)(url)
                .map_err(|e| BridgeError::rejected(format!("Could not open {url}: {e}")))?;
        }
        self.request_exit();
        Ok(())
    }
}
