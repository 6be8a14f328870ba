//! Application state

use crate::config::Config;
use crate::theme::Theme;
use crate::update::{ActionKind, NoticePart, Origin, UpdateLifecycleController};

/// Current interaction mode of the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Regular shell interaction
    #[default]
    Normal,
    /// Help popup open
    Help,
}

/// Element holding keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The application behind the notice
    #[default]
    Shell,
    /// Somewhere inside the update notice
    Notice(NoticePart),
}

/// Entries of the demo shell, standing in for the real application
pub const SHELL_ITEMS: &[&str] = &[
    "Dashboard",
    "Projects",
    "Recent files",
    "Shared with me",
    "Settings",
];

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Current mode
    pub mode: Mode,
    /// Keyboard focus
    pub focus: Focus,
    /// Selected shell entry
    pub selected_item: usize,
    /// Status message (bottom bar)
    pub status: String,
    /// An update check is in flight
    pub checking: bool,
    /// An update action succeeded; quit once its label has been drawn
    pub exit_pending: bool,

    controller: UpdateLifecycleController,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config) -> Self {
        let theme = config.theme;
        Self {
            config,
            should_quit: false,
            theme,
            mode: Mode::Normal,
            focus: Focus::Shell,
            selected_item: 0,
            status: String::new(),
            checking: false,
            exit_pending: false,
            controller: UpdateLifecycleController::new(),
            tick: 0,
        }
    }

    /// Update notice controller
    pub const fn controller(&self) -> &UpdateLifecycleController {
        &self.controller
    }

    /// Update notice controller, mutably
    pub const fn controller_mut(&mut self) -> &mut UpdateLifecycleController {
        &mut self.controller
    }

    /// Whether the shell is blocked by the notice
    pub const fn interface_blocked(&self) -> bool {
        self.controller.guard().interface_blocked()
    }

    /// Apply queued bridge events and keep focus consistent with the notice
    pub fn pump_updates(&mut self) -> usize {
        let processed = self.controller.pump();
        if processed > 0 {
            self.sync_focus();
        }
        processed
    }

    /// Pull focus into the notice while it is shown, release it otherwise
    pub fn sync_focus(&mut self) {
        let visible = self.controller.is_notice_visible();
        match self.focus {
            Focus::Shell if visible => {
                self.focus = Focus::Notice(NoticePart::Panel);
                self.mode = Mode::Normal;
            }
            Focus::Notice(_) if !visible => self.focus = Focus::Shell,
            Focus::Notice(part) if !self.focusable().contains(&part) => {
                self.focus = Focus::Notice(NoticePart::Panel);
            }
            _ => {}
        }
    }

    /// Origin of a key press, i.e. where focus currently is
    pub const fn key_origin(&self) -> Origin {
        match self.focus {
            Focus::Notice(part) if self.controller.is_notice_visible() => Origin::Notice(part),
            _ => Origin::Outside,
        }
    }

    /// Notice parts Tab cycles through: the panel plus every drawn control
    fn focusable(&self) -> Vec<NoticePart> {
        let mut parts = vec![NoticePart::Panel];
        if self.controller.view().is_some_and(|v| v.actions.is_some()) {
            let region = self.controller.guard().region();
            if region.install.is_some() {
                parts.push(NoticePart::InstallControl);
            }
            if region.download.is_some() {
                parts.push(NoticePart::DownloadControl);
            }
        }
        parts
    }

    /// Move focus to the next (or previous) element inside the notice
    pub fn cycle_notice_focus(&mut self, forward: bool) {
        let parts = self.focusable();
        let current = match self.focus {
            Focus::Notice(part) => parts.iter().position(|p| *p == part).unwrap_or(0),
            Focus::Shell => 0,
        };
        let next = if forward {
            (current + 1) % parts.len()
        } else {
            (current + parts.len() - 1) % parts.len()
        };
        self.focus = Focus::Notice(parts[next]);
    }

    /// Whether `part` holds focus
    pub fn is_focused(&self, part: NoticePart) -> bool {
        self.focus == Focus::Notice(part)
    }

    /// Disable the control for `kind`; `true` if the bridge call may start
    pub fn begin_action(&mut self, kind: ActionKind) -> bool {
        let started = self.controller.begin_action(kind);
        if started {
            self.focus = Focus::Notice(match kind {
                ActionKind::Install => NoticePart::InstallControl,
                ActionKind::ManualDownload => NoticePart::DownloadControl,
            });
        }
        started
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Get current tick
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Move selection down in the shell
    pub fn select_next_item(&mut self) {
        self.selected_item = (self.selected_item + 1).min(SHELL_ITEMS.len() - 1);
    }

    /// Move selection up in the shell
    pub fn select_prev_item(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    /// Cycle through themes
    pub fn next_theme(&mut self) {
        self.theme = self.theme.next();
        self.config.theme = self.theme;
    }
}
