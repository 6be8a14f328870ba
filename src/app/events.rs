//! Event handling
//!
//! Every terminal event is offered to the update guard first. Only what the
//! guard lets through reaches the notice or the shell.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Focus, Mode};
use crate::update::{ActionKind, InputEvent, InputKind, NoticePart, Origin, Verdict};

/// Handle any terminal event, returning an optional async command
pub fn handle_event(state: &mut AppState, event: &Event) -> Option<AsyncCommand> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, *key),
        Event::Mouse(mouse) => handle_mouse(state, *mouse),
        _ => None,
    }
}

/// Run an event through the window-level filters; `true` if it may proceed
fn admit(state: &AppState, input: &InputEvent) -> bool {
    let verdict = state.controller().guard().filter(input);
    if !verdict.stops_immediate() {
        tracing::trace!(kind = ?input.kind, origin = ?input.origin, ?verdict, "input");
    }
    verdict == Verdict::Pass
}

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    if !admit(state, &InputEvent::key(key, state.key_origin())) {
        return None;
    }

    if let Focus::Notice(part) = state.focus
        && state.controller().is_notice_visible()
    {
        return handle_notice_key(state, part, key);
    }

    match state.mode {
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            None
        }
        Mode::Normal => handle_shell_key(state, key),
    }
}

fn handle_notice_key(state: &mut AppState, part: NoticePart, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Tab => {
            state.cycle_notice_focus(true);
            None
        }
        KeyCode::BackTab => {
            state.cycle_notice_focus(false);
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') if part == NoticePart::DownloadControl => {
            start_action(state, ActionKind::ManualDownload)
        }
        _ => None,
    }
}

fn handle_shell_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            None
        }
        (_, KeyCode::Char('?') | KeyCode::F(1)) => {
            state.mode = Mode::Help;
            None
        }
        (_, KeyCode::Char('t')) => {
            state.next_theme();
            state.set_status(format!("Theme: {}", state.theme));
            None
        }
        (_, KeyCode::Char('u')) => request_check(state),
        (_, KeyCode::Char('j') | KeyCode::Down) => {
            state.select_next_item();
            None
        }
        (_, KeyCode::Char('k') | KeyCode::Up) => {
            state.select_prev_item();
            None
        }
        _ => None,
    }
}

/// Handle mouse events, returning an optional async command
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) -> Option<AsyncCommand> {
    let origin = state.controller().guard().locate(mouse.column, mouse.row);
    let input = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => InputEvent::click(origin),
        MouseEventKind::Down(MouseButton::Right) => InputEvent::context_menu(origin),
        MouseEventKind::ScrollDown if !state.interface_blocked() => {
            state.select_next_item();
            return None;
        }
        MouseEventKind::ScrollUp if !state.interface_blocked() => {
            state.select_prev_item();
            return None;
        }
        _ => return None,
    };

    if !admit(state, &input) || input.kind != InputKind::Click {
        return None;
    }

    match origin {
        Origin::Notice(NoticePart::InstallControl) => start_action(state, ActionKind::Install),
        Origin::Notice(NoticePart::DownloadControl) => {
            start_action(state, ActionKind::ManualDownload)
        }
        Origin::Notice(part) => {
            state.focus = Focus::Notice(part);
            None
        }
        Origin::Outside => None,
    }
}

fn start_action(state: &mut AppState, kind: ActionKind) -> Option<AsyncCommand> {
    state.begin_action(kind).then_some(AsyncCommand::Run(kind))
}

/// Start an on-demand update check unless one is already running
pub fn request_check(state: &mut AppState) -> Option<AsyncCommand> {
    if state.checking {
        return None;
    }
    state.checking = true;
    state.set_status("Checking for updates...");
    Some(AsyncCommand::CheckForUpdates)
}
