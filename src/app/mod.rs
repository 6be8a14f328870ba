//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::{AppState, Focus, Mode};
pub use ui::notice_layout;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::bridge::SimulatedBridge;
use crate::config::Config;

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};

/// Run the TUI application
pub fn run(config: Config) -> Result<()> {
    // Create tokio runtime
    let rt = Runtime::new().context("Failed to start async runtime")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("Failed to install signal handler")?;
    }

    let bridge = SimulatedBridge::from_config(&config);
    let mut state = AppState::new(config);
    state.controller_mut().init(&bridge);

    // Spawn async worker
    let worker_bridge = bridge.clone();
    let async_handle = rt.block_on(async move { spawn_worker(worker_bridge) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Check for updates on launch
    if let Some(cmd) = events::request_check(&mut state) {
        submit(&mut state, &async_handle, cmd);
    }

    // Main loop
    let result = run_app(&mut terminal, &mut state, async_handle, &interrupted);

    state.controller_mut().teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if bridge.exit_requested() {
        tracing::info!("Exiting for update");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
    interrupted: &AtomicBool,
) -> Result<()> {
    let tick_rate = Duration::from_millis(state.config.tick_rate_ms);

    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            handle_async_result(state, result);
        }

        // Apply bridge events in arrival order
        state.pump_updates();

        // Draw UI
        terminal.draw(|frame| ui::render(frame, state))?;

        // The final label has been drawn; hand control back to the updater
        if state.exit_pending || interrupted.load(Ordering::SeqCst) {
            state.should_quit = true;
        }

        // Handle events
        if !state.should_quit && event::poll(tick_rate)? {
            let event = event::read()?;
            if let Some(cmd) = events::handle_event(state, &event) {
                submit(state, &async_handle, cmd);
            }
        }

        // Tick for animations
        state.tick();

        if state.should_quit {
            // Shutdown async worker
            let _ = async_handle.submit(AsyncCommand::Shutdown);
            break;
        }
    }

    // Save config on exit
    if let Err(e) = state.config.save() {
        tracing::warn!("Failed to save config: {e:#}");
    }

    Ok(())
}

/// Hand `cmd` to the worker, undoing what the caller started if it is gone
fn submit(state: &mut AppState, async_handle: &AsyncHandle, cmd: AsyncCommand) {
    let Err(e) = async_handle.submit(cmd) else {
        return;
    };
    match cmd {
        AsyncCommand::CheckForUpdates => state.checking = false,
        AsyncCommand::Run(kind) => state.controller_mut().finish_action(kind, Err(e.clone())),
        AsyncCommand::Shutdown => {}
    }
    state.set_status(e.to_string());
}

fn handle_async_result(state: &mut AppState, result: AsyncResult) {
    match result {
        AsyncResult::Checked(result) => {
            state.checking = false;
            let response = state.controller_mut().apply_check_result(result);
            state.sync_focus();
            if response.update_available {
                state.set_status(format!(
                    "Update found: v{}",
                    response.info().new_display()
                ));
            } else {
                state.set_status("You're up to date");
            }
        }
        AsyncResult::ActionFinished { kind, result } => {
            let succeeded = result.is_ok();
            state.controller_mut().finish_action(kind, result);
            state.exit_pending |= succeeded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::update::{ActionKind, ActionPhase, CheckResponse, LifecycleState, UpdateInfo};
    use tokio::sync::mpsc;

    #[test]
    fn test_check_result_opens_notice() {
        let mut state = AppState::new(Config::default());
        state.checking = true;
        handle_async_result(
            &mut state,
            AsyncResult::Checked(Ok(CheckResponse {
                update_available: true,
                current_version: Some("1.0.0".to_string()),
                new_version: Some("1.1.0".to_string()),
                ..CheckResponse::default()
            })),
        );

        assert!(!state.checking);
        assert_eq!(state.status, "Update found: v1.1.0");
        assert!(state.controller().is_notice_visible());
        assert_eq!(state.focus, Focus::Notice(crate::update::NoticePart::Panel));
    }

    #[test]
    fn test_failed_check_looks_like_no_update() {
        let mut state = AppState::new(Config::default());
        handle_async_result(
            &mut state,
            AsyncResult::Checked(Err(BridgeError::rejected("network down"))),
        );
        assert_eq!(state.status, "You're up to date");
        assert!(!state.controller().is_notice_visible());
    }

    #[test]
    fn test_failed_action_reenables_control() {
        let mut state = AppState::new(Config::default());
        state
            .controller_mut()
            .show_notice(&UpdateInfo::new("1.0.0", "1.1.0"));
        state.controller_mut().mark_downloaded();
        assert!(state.begin_action(ActionKind::Install));

        handle_async_result(
            &mut state,
            AsyncResult::ActionFinished {
                kind: ActionKind::Install,
                result: Err(BridgeError::rejected("disk full")),
            },
        );

        let LifecycleState::ReadyToInstall { install, .. } = state.controller().state() else {
            panic!("expected ready-to-install");
        };
        assert_eq!(install.phase, ActionPhase::Ready);
        assert!(!state.exit_pending);
    }

    #[test]
    fn test_successful_action_exits_after_label_update() {
        let mut state = AppState::new(Config::default());
        state
            .controller_mut()
            .show_notice(&UpdateInfo::new("1.0.0", "1.1.0"));
        state.controller_mut().mark_downloaded();
        assert!(state.begin_action(ActionKind::ManualDownload));
        assert!(!state.exit_pending);

        handle_async_result(
            &mut state,
            AsyncResult::ActionFinished {
                kind: ActionKind::ManualDownload,
                result: Ok(()),
            },
        );

        assert!(state.exit_pending);
        let view = state.controller().view().unwrap();
        assert_eq!(
            view.actions.as_ref().unwrap().manual_download.label,
            "Closing application..."
        );
    }

    fn disconnected_handle() -> AsyncHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        let (_result_tx, result_rx) = mpsc::channel(1);
        drop(cmd_rx);
        AsyncHandle { cmd_tx, result_rx }
    }

    #[test]
    fn test_startup_check_without_worker_stops_spinner() {
        let mut state = AppState::new(Config::default());
        let handle = disconnected_handle();

        let cmd = events::request_check(&mut state).unwrap();
        assert!(state.checking);
        submit(&mut state, &handle, cmd);

        assert!(!state.checking);
        assert_eq!(state.status, "update bridge disconnected");
        assert_eq!(
            events::request_check(&mut state),
            Some(AsyncCommand::CheckForUpdates)
        );
    }

    #[test]
    fn test_action_without_worker_reenables_control() {
        let mut state = AppState::new(Config::default());
        state
            .controller_mut()
            .show_notice(&UpdateInfo::new("1.0.0", "1.1.0"));
        state.controller_mut().mark_downloaded();
        let handle = disconnected_handle();

        assert!(state.begin_action(ActionKind::Install));
        submit(&mut state, &handle, AsyncCommand::Run(ActionKind::Install));

        let LifecycleState::ReadyToInstall { install, .. } = state.controller().state() else {
            panic!("expected ready-to-install");
        };
        assert_eq!(install.phase, ActionPhase::Ready);
        assert!(!state.exit_pending);
    }
}
