//! Modal input guard
//!
//! While an update notice is up, every keyboard and pointer event of the
//! window is run through [`ModalInputGuard::filter`] before any other handler.
//! The guard only ever lets through what the notice's own controls need:
//! Tab to move focus inside the notice, Enter/Space on the manual-download
//! control, clicks on the panel and its controls, and the context menu inside
//! the notice.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;

/// Part of the notice an event originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticePart {
    /// Dimmed area around the panel
    Backdrop,
    /// The panel itself, outside any control
    Panel,
    /// "Install & Restart"
    InstallControl,
    /// "Manually Download"
    DownloadControl,
}

/// Where an input event comes from, relative to the notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Anywhere in the rest of the application
    Outside,
    /// Inside the notice's boundary region
    Notice(NoticePart),
}

impl Origin {
    /// Whether the origin lies within the notice region
    pub const fn is_inside(self) -> bool {
        matches!(self, Self::Notice(_))
    }
}

/// Kind of window-level input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Key press
    Key(KeyEvent),
    /// Secondary click
    ContextMenu,
    /// Primary click
    Click,
}

/// One window-level input event together with its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// What happened
    pub kind: InputKind,
    /// Where it came from
    pub origin: Origin,
}

impl InputEvent {
    /// Key press at the focused element
    pub const fn key(key: KeyEvent, origin: Origin) -> Self {
        Self {
            kind: InputKind::Key(key),
            origin,
        }
    }

    /// Secondary click
    pub const fn context_menu(origin: Origin) -> Self {
        Self {
            kind: InputKind::ContextMenu,
            origin,
        }
    }

    /// Primary click
    pub const fn click(origin: Origin) -> Self {
        Self {
            kind: InputKind::Click,
            origin,
        }
    }
}

/// Outcome of filtering one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Event proceeds unmodified
    Pass,
    /// Default action prevented and propagation stopped; other window-level
    /// filters still observe the event
    Suppress,
    /// Like [`Verdict::Suppress`], and no other window-level filter sees it
    SuppressImmediate,
}

impl Verdict {
    /// Default action is prevented
    pub const fn prevents_default(self) -> bool {
        !matches!(self, Self::Pass)
    }

    /// Event does not reach its target
    pub const fn stops_propagation(self) -> bool {
        !matches!(self, Self::Pass)
    }

    /// Remaining window-level filters are skipped
    pub const fn stops_immediate(self) -> bool {
        matches!(self, Self::SuppressImmediate)
    }
}

/// Screen area occupied by the notice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticeRegion {
    /// Full overlay, including the dimmed surroundings
    pub backdrop: Rect,
    /// Inner panel
    pub panel: Rect,
    /// Install control, when shown
    pub install: Option<Rect>,
    /// Manual-download control, when shown
    pub download: Option<Rect>,
}

impl NoticeRegion {
    /// Resolve a pointer position to an origin
    pub fn locate(&self, column: u16, row: u16) -> Origin {
        if self.download.is_some_and(|r| hit(r, column, row)) {
            Origin::Notice(NoticePart::DownloadControl)
        } else if self.install.is_some_and(|r| hit(r, column, row)) {
            Origin::Notice(NoticePart::InstallControl)
        } else if hit(self.panel, column, row) {
            Origin::Notice(NoticePart::Panel)
        } else if hit(self.backdrop, column, row) {
            Origin::Notice(NoticePart::Backdrop)
        } else {
            Origin::Outside
        }
    }
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Window-level filter active for as long as an update notice is shown
#[derive(Debug, Clone, Default)]
pub struct ModalInputGuard {
    active: bool,
    interface_blocked: bool,
    region: NoticeRegion,
}

impl ModalInputGuard {
    /// Inactive guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Start intercepting input and mark the rest of the interface blocked
    pub fn activate(&mut self) {
        if !self.active {
            tracing::info!("Interface blocked for update");
        }
        self.active = true;
        self.interface_blocked = true;
    }

    /// Stop intercepting; only used when the owning window goes away
    pub fn deactivate(&mut self) {
        self.active = false;
        self.interface_blocked = false;
    }

    /// Whether input is being intercepted
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the rest of the interface should render as blocked
    pub const fn interface_blocked(&self) -> bool {
        self.interface_blocked
    }

    /// Current notice region
    pub const fn region(&self) -> &NoticeRegion {
        &self.region
    }

    /// Replace the notice region (after layout changes)
    pub fn set_region(&mut self, region: NoticeRegion) {
        self.region = region;
    }

    /// Origin of a pointer event at the given cell
    pub fn locate(&self, column: u16, row: u16) -> Origin {
        self.region.locate(column, row)
    }

    /// Decide what happens to an event
    pub fn filter(&self, event: &InputEvent) -> Verdict {
        if !self.active {
            return Verdict::Pass;
        }

        match event.kind {
            InputKind::Key(key) => filter_key(key, event.origin),
            InputKind::ContextMenu => {
                if event.origin.is_inside() {
                    Verdict::Pass
                } else {
                    Verdict::Suppress
                }
            }
            InputKind::Click => match event.origin {
                // The notice has no dismiss affordance
                Origin::Notice(NoticePart::Backdrop) => Verdict::Suppress,
                Origin::Notice(_) => Verdict::Pass,
                Origin::Outside => Verdict::SuppressImmediate,
            },
        }
    }
}

fn filter_key(key: KeyEvent, origin: Origin) -> Verdict {
    let Origin::Notice(part) = origin else {
        return Verdict::SuppressImmediate;
    };

    let activates = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
    if activates && part == NoticePart::DownloadControl {
        return Verdict::Pass;
    }

    if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
        Verdict::Pass
    } else {
        Verdict::Suppress
    }
}
