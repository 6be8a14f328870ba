//! Update lifecycle controller
//!
//! Owns the notice state machine:
//!
//! ```text
//! Idle ──available/popup──▶ Downloading ──downloaded──▶ ReadyToInstall
//!                              │  ▲                        │
//!                              └──┘ progress               └─ install / manual download
//! ```
//!
//! Bridge events land in an inbox and are applied, in arrival order, by
//! [`UpdateLifecycleController::pump`]. After every transition the notice
//! view is re-projected from the state, so the view never drifts from it.

use tokio::sync::mpsc;

use super::guard::{ModalInputGuard, NoticeRegion};
use super::info::{CheckResponse, ProgressSample, UpdateInfo};
use super::progress::{self, ProgressDisplay};
use super::state::{ActionControl, ActionKind, ActionPhase, LifecycleState, Notice};
use super::view::{self, NoticeView};
use crate::bridge::{Handler, Subscription, UpdateBridge};
use crate::error::BridgeError;

/// Lifecycle signal delivered by the bridge
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Explicit request to show the notice
    PopupTrigger(UpdateInfo),
    /// An update was found
    UpdateAvailable(UpdateInfo),
    /// Download progress
    DownloadProgress(ProgressSample),
    /// Download finished
    UpdateDownloaded(UpdateInfo),
}

/// Drives the update notice for one application window
#[derive(Debug)]
pub struct UpdateLifecycleController {
    state: LifecycleState,
    view: Option<NoticeView>,
    guard: ModalInputGuard,
    inbox_tx: mpsc::UnboundedSender<LifecycleEvent>,
    inbox_rx: mpsc::UnboundedReceiver<LifecycleEvent>,
    subscriptions: Vec<Subscription>,
    notices_rendered: usize,
}

impl Default for UpdateLifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateLifecycleController {
    /// Idle controller, not yet subscribed to any bridge
    pub fn new() -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: LifecycleState::Idle,
            view: None,
            guard: ModalInputGuard::new(),
            inbox_tx,
            inbox_rx,
            subscriptions: Vec::new(),
            notices_rendered: 0,
        }
    }

    /// Subscribe to every lifecycle event kind of `bridge`
    pub fn init<B: UpdateBridge>(&mut self, bridge: &B) {
        if !self.subscriptions.is_empty() {
            tracing::warn!("Update controller already initialised, ignoring");
            return;
        }

        self.subscriptions = vec![
            bridge.on_popup_trigger(self.forward(LifecycleEvent::PopupTrigger)),
            bridge.on_update_available(self.forward(LifecycleEvent::UpdateAvailable)),
            bridge.on_download_progress(self.forward(LifecycleEvent::DownloadProgress)),
            bridge.on_update_downloaded(self.forward(LifecycleEvent::UpdateDownloaded)),
        ];
        tracing::debug!("Update controller subscribed to bridge events");
    }

    /// Drop every subscription and release the window
    pub fn teardown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        while self.inbox_rx.try_recv().is_ok() {}
        self.guard.deactivate();
        self.state = LifecycleState::Idle;
        self.refresh();
        tracing::debug!("Update controller torn down");
    }

    /// Whether `init` ran and `teardown` did not
    pub fn is_initialized(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    fn forward<T: Send + 'static>(&self, wrap: fn(T) -> LifecycleEvent) -> Handler<T> {
        let tx = self.inbox_tx.clone();
        Box::new(move |payload| {
            let _ = tx.send(wrap(payload));
        })
    }

    /// Apply every queued bridge event; returns how many were processed
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.handle(event);
            processed += 1;
        }
        processed
    }

    /// Apply one lifecycle event; returns whether the state changed
    pub fn handle(&mut self, event: LifecycleEvent) -> bool {
        match event {
            LifecycleEvent::PopupTrigger(info) | LifecycleEvent::UpdateAvailable(info) => {
                self.show_notice(&info)
            }
            LifecycleEvent::DownloadProgress(sample) => self.apply_progress(&sample),
            LifecycleEvent::UpdateDownloaded(_) => self.mark_downloaded(),
        }
    }

    /// `Idle → Downloading`; ignored while a notice is visible
    pub fn show_notice(&mut self, info: &UpdateInfo) -> bool {
        if self.state.is_visible() {
            tracing::debug!("Update notice already visible, ignoring signal");
            return false;
        }

        let notice = Notice::from(info);
        tracing::info!(
            current = %notice.current_version,
            new = %notice.new_version,
            "Update notice displayed"
        );

        // Download starts on its own, so progress shows right away
        self.state = LifecycleState::Downloading {
            notice,
            progress: ProgressDisplay::default(),
        };
        self.notices_rendered += 1;
        self.guard.activate();
        self.refresh();
        true
    }

    /// Update the progress display while downloading
    pub fn apply_progress(&mut self, sample: &ProgressSample) -> bool {
        let state = self.state.name();
        let LifecycleState::Downloading {
            progress: display, ..
        } = &mut self.state
        else {
            tracing::debug!(state, "Ignoring progress sample");
            return false;
        };

        *display = progress::report(sample);
        self.refresh();
        true
    }

    /// `Downloading → ReadyToInstall`
    pub fn mark_downloaded(&mut self) -> bool {
        let LifecycleState::Downloading { notice, .. } = &self.state else {
            tracing::debug!(state = self.state.name(), "Ignoring downloaded signal");
            return false;
        };
        let notice = notice.clone();

        self.state = LifecycleState::ReadyToInstall {
            notice,
            install: ActionControl::new(ActionKind::Install),
            manual_download: ActionControl::new(ActionKind::ManualDownload),
        };
        tracing::info!("Update downloaded, ready to install");
        self.refresh();
        true
    }

    /// Disable a control before its bridge call.
    ///
    /// Returns `false` when the control is absent or already in flight; the
    /// caller must not invoke the bridge in that case.
    pub fn begin_action(&mut self, kind: ActionKind) -> bool {
        let state = self.state.name();
        match self.state.control_mut(kind) {
            Some(control) if control.enabled() => control.phase = ActionPhase::Pending,
            Some(_) => {
                tracing::debug!(action = ?kind, "Update action already in flight");
                return false;
            }
            None => {
                tracing::debug!(action = ?kind, state, "No such control");
                return false;
            }
        }
        self.refresh();
        true
    }

    /// Record the outcome of a bridge call started with `begin_action`
    pub fn finish_action(&mut self, kind: ActionKind, result: Result<(), BridgeError>) {
        let Some(control) = self.state.control_mut(kind) else {
            return;
        };
        if control.phase != ActionPhase::Pending {
            tracing::debug!(action = ?kind, "Stray action result ignored");
            return;
        }

        match result {
            Ok(()) => {
                control.phase = ActionPhase::Succeeded;
                tracing::info!(action = ?kind, "Update action succeeded");
            }
            Err(e) => {
                control.phase = ActionPhase::Ready;
                tracing::error!(action = ?kind, error = %e, "Update action failed");
            }
        }
        self.refresh();
    }

    /// Fold a check result into the state machine.
    ///
    /// A rejected check counts as "no update"; the message is handed back in
    /// the neutral response and never shown to the user.
    pub fn apply_check_result(
        &mut self,
        result: Result<CheckResponse, BridgeError>,
    ) -> CheckResponse {
        match result {
            Ok(response) => {
                if response.update_available {
                    self.show_notice(&response.info());
                }
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Error checking for updates");
                CheckResponse::failed(e.to_string())
            }
        }
    }

    /// Ask the bridge once whether an update exists
    pub async fn check_for_updates_on_demand<B: UpdateBridge>(
        &mut self,
        bridge: &B,
    ) -> CheckResponse {
        let result = bridge.check_for_updates().await;
        self.apply_check_result(result)
    }

    /// Run the install action end to end; `false` if it could not start
    pub async fn install<B: UpdateBridge>(&mut self, bridge: &B) -> bool {
        if !self.begin_action(ActionKind::Install) {
            return false;
        }
        let result = bridge.quit_and_install_update().await;
        self.finish_action(ActionKind::Install, result);
        true
    }

    /// Run the manual-download action end to end; `false` if it could not start
    pub async fn open_download_page<B: UpdateBridge>(&mut self, bridge: &B) -> bool {
        if !self.begin_action(ActionKind::ManualDownload) {
            return false;
        }
        let result = bridge.open_download_page().await;
        self.finish_action(ActionKind::ManualDownload, result);
        true
    }

    fn refresh(&mut self) {
        self.view = view::project(&self.state);
    }

    /// Current state
    pub const fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Current notice, `None` when idle
    pub const fn view(&self) -> Option<&NoticeView> {
        self.view.as_ref()
    }

    /// Whether a notice is on screen
    pub const fn is_notice_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// How many notices were ever opened
    pub const fn notices_rendered(&self) -> usize {
        self.notices_rendered
    }

    /// Input guard
    pub const fn guard(&self) -> &ModalInputGuard {
        &self.guard
    }

    /// Tell the guard where the notice currently is on screen
    pub fn set_notice_region(&mut self, region: NoticeRegion) {
        self.guard.set_region(region);
    }
}
