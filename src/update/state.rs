//! Lifecycle state of the update notice

use super::info::UpdateInfo;
use super::progress::ProgressDisplay;

/// User action offered once the update is downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Install the downloaded update and restart
    Install,
    /// Open the download page and let the user update by hand
    ManualDownload,
}

impl ActionKind {
    /// Label shown while the action can be triggered
    pub const fn ready_label(self) -> &'static str {
        match self {
            Self::Install => "Install & Restart",
            Self::ManualDownload => "Manually Download",
        }
    }

    /// Label shown while the bridge call is in flight
    pub const fn pending_label(self) -> &'static str {
        match self {
            Self::Install => "Installing...",
            Self::ManualDownload => "Opening download page...",
        }
    }

    /// Label shown once the bridge call resolved
    pub const fn done_label(self) -> &'static str {
        match self {
            // The process restarts from under us
            Self::Install => "Installing...",
            Self::ManualDownload => "Closing application...",
        }
    }
}

/// Where an action control is in its click → bridge → result cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    /// Enabled, waiting for the user
    #[default]
    Ready,
    /// Bridge call awaited; control disabled
    Pending,
    /// Bridge call resolved; application is expected to exit
    Succeeded,
}

/// One of the two buttons of a ready-to-install notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionControl {
    /// Which action this control triggers
    pub kind: ActionKind,
    /// Current phase
    pub phase: ActionPhase,
}

impl ActionControl {
    /// Enabled control
    pub const fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            phase: ActionPhase::Ready,
        }
    }

    /// Whether the control accepts activation
    pub const fn enabled(&self) -> bool {
        matches!(self.phase, ActionPhase::Ready)
    }

    /// Current label
    pub const fn label(&self) -> &'static str {
        match self.phase {
            ActionPhase::Ready => self.kind.ready_label(),
            ActionPhase::Pending => self.kind.pending_label(),
            ActionPhase::Succeeded => self.kind.done_label(),
        }
    }
}

/// Version details fixed when the notice opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Running version, already resolved for display
    pub current_version: String,
    /// Offered version, already resolved for display
    pub new_version: String,
}

impl From<&UpdateInfo> for Notice {
    fn from(info: &UpdateInfo) -> Self {
        Self {
            current_version: info.current_display().to_string(),
            new_version: info.new_display().to_string(),
        }
    }
}

/// State machine driving the notice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No notice
    #[default]
    Idle,
    /// Notice visible, download running
    Downloading {
        /// Versions shown
        notice: Notice,
        /// Latest formatted progress
        progress: ProgressDisplay,
    },
    /// Notice visible, update ready
    ReadyToInstall {
        /// Versions shown
        notice: Notice,
        /// "Install & Restart"
        install: ActionControl,
        /// "Manually Download"
        manual_download: ActionControl,
    },
}

impl LifecycleState {
    /// Whether a notice is on screen
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Short name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Downloading { .. } => "downloading",
            Self::ReadyToInstall { .. } => "ready-to-install",
        }
    }

    /// Control for an action, when the notice offers actions
    pub fn control(&self, kind: ActionKind) -> Option<&ActionControl> {
        match self {
            Self::ReadyToInstall {
                install,
                manual_download,
                ..
            } => Some(match kind {
                ActionKind::Install => install,
                ActionKind::ManualDownload => manual_download,
            }),
            _ => None,
        }
    }

    pub(crate) fn control_mut(&mut self, kind: ActionKind) -> Option<&mut ActionControl> {
        match self {
            Self::ReadyToInstall {
                install,
                manual_download,
                ..
            } => Some(match kind {
                ActionKind::Install => install,
                ActionKind::ManualDownload => manual_download,
            }),
            _ => None,
        }
    }
}
