//! Pure projection of the lifecycle state onto what the notice shows

use super::state::{ActionControl, LifecycleState};

/// Notice heading
pub const TITLE: &str = "NEW UPDATE AVAILABLE";

/// Status once the download completed
pub const STATUS_READY: &str = "Update downloaded! Ready to install.";

/// Notice footer
pub const FOOTER: &str = "This notice cannot be closed until you update";

/// Progress sub-section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// Bar fill in percent
    pub percent: u8,
    /// `"<n>%"`
    pub percent_label: String,
    /// Speed line, if known
    pub speed: Option<String>,
    /// Size line, if known
    pub size: Option<String>,
}

/// A rendered button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    /// Current label
    pub label: &'static str,
    /// Whether it accepts activation
    pub enabled: bool,
}

impl From<&ActionControl> for ButtonView {
    fn from(control: &ActionControl) -> Self {
        Self {
            label: control.label(),
            enabled: control.enabled(),
        }
    }
}

/// Action sub-section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsView {
    /// "Install & Restart"
    pub install: ButtonView,
    /// "Manually Download"
    pub manual_download: ButtonView,
}

/// Everything the notice displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    /// Heading
    pub title: &'static str,
    /// Running version
    pub current_version: String,
    /// Offered version
    pub new_version: String,
    /// Status line
    pub status: String,
    /// Present while downloading
    pub progress: Option<ProgressView>,
    /// Present once ready to install
    pub actions: Option<ActionsView>,
    /// Footer line
    pub footer: &'static str,
}

/// Project a state onto its notice; `None` means no notice
pub fn project(state: &LifecycleState) -> Option<NoticeView> {
    match state {
        LifecycleState::Idle => None,
        LifecycleState::Downloading { notice, progress } => Some(NoticeView {
            title: TITLE,
            current_version: notice.current_version.clone(),
            new_version: notice.new_version.clone(),
            status: progress.status.clone(),
            progress: Some(ProgressView {
                percent: progress.percent,
                percent_label: progress.percent_label.clone(),
                speed: progress.speed.clone(),
                size: progress.size.clone(),
            }),
            actions: None,
            footer: FOOTER,
        }),
        LifecycleState::ReadyToInstall {
            notice,
            install,
            manual_download,
        } => Some(NoticeView {
            title: TITLE,
            current_version: notice.current_version.clone(),
            new_version: notice.new_version.clone(),
            status: STATUS_READY.to_string(),
            progress: None,
            actions: Some(ActionsView {
                install: install.into(),
                manual_download: manual_download.into(),
            }),
            footer: FOOTER,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::info::UpdateInfo;
    use crate::update::progress::ProgressDisplay;
    use crate::update::state::{ActionKind, ActionPhase, Notice};

    fn notice() -> Notice {
        Notice::from(&UpdateInfo::new("1.0.0", "1.1.0"))
    }

    #[test]
    fn test_idle_has_no_notice() {
        assert!(project(&LifecycleState::Idle).is_none());
    }

    #[test]
    fn test_downloading_shows_progress_only() {
        let view = project(&LifecycleState::Downloading {
            notice: notice(),
            progress: ProgressDisplay::default(),
        })
        .unwrap();

        assert_eq!(view.current_version, "1.0.0");
        assert_eq!(view.new_version, "1.1.0");
        assert_eq!(view.status, "Downloading update automatically...");
        assert_eq!(view.progress.unwrap().percent_label, "0%");
        assert!(view.actions.is_none());
    }

    #[test]
    fn test_ready_shows_actions_only() {
        let mut install = ActionControl::new(ActionKind::Install);
        install.phase = ActionPhase::Pending;
        let view = project(&LifecycleState::ReadyToInstall {
            notice: notice(),
            install,
            manual_download: ActionControl::new(ActionKind::ManualDownload),
        })
        .unwrap();

        assert!(view.progress.is_none());
        assert_eq!(view.status, STATUS_READY);
        let actions = view.actions.unwrap();
        assert_eq!(
            actions.install,
            ButtonView {
                label: "Installing...",
                enabled: false
            }
        );
        assert!(actions.manual_download.enabled);
    }
}
