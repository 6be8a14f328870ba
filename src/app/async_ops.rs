//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and the update
//! bridge, whose calls are futures.

use tokio::sync::mpsc;

use crate::bridge::UpdateBridge;
use crate::error::BridgeError;
use crate::update::{ActionKind, CheckResponse};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncCommand {
    /// Ask the bridge whether an update exists
    CheckForUpdates,
    /// Run one of the notice's actions
    Run(ActionKind),
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// Update check finished
    Checked(Result<CheckResponse, BridgeError>),
    /// A notice action finished
    ActionFinished {
        /// Which action
        kind: ActionKind,
        /// Bridge outcome
        result: Result<(), BridgeError>,
    },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

impl AsyncHandle {
    /// Queue a command from synchronous code.
    ///
    /// A full or closed channel is reported as a disconnected bridge.
    pub fn submit(&self, cmd: AsyncCommand) -> Result<(), BridgeError> {
        self.cmd_tx.try_send(cmd).map_err(|e| {
            tracing::error!(?cmd, error = %e, "Async worker unavailable");
            BridgeError::Disconnected
        })
    }
}

/// Spawn the async worker around `bridge` and return handles
pub fn spawn_worker<B>(bridge: B) -> AsyncHandle
where
    B: UpdateBridge + Send + Sync + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    // Spawn the worker task
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let result = match cmd {
                AsyncCommand::Shutdown => break,
                AsyncCommand::CheckForUpdates => {
                    AsyncResult::Checked(bridge.check_for_updates().await)
                }
                AsyncCommand::Run(kind) => AsyncResult::ActionFinished {
                    kind,
                    result: run_action(&bridge, kind).await,
                },
            };
            if result_tx.send(result).await.is_err() {
                break;
            }
        }
        tracing::debug!("Async worker stopped");
    });

    AsyncHandle { cmd_tx, result_rx }
}

async fn run_action<B: UpdateBridge>(bridge: &B, kind: ActionKind) -> Result<(), BridgeError> {
    match kind {
        ActionKind::Install => bridge.quit_and_install_update().await,
        ActionKind::ManualDownload => bridge.open_download_page().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fake::FakeBridge;

    #[tokio::test]
    async fn test_worker_answers_each_command() {
        let bridge = FakeBridge::with_check(Err(BridgeError::rejected("offline")));
        bridge.push_install(Err(BridgeError::rejected("disk full")));
        let mut handle = spawn_worker(bridge);

        handle.cmd_tx.send(AsyncCommand::CheckForUpdates).await.unwrap();
        handle
            .cmd_tx
            .send(AsyncCommand::Run(ActionKind::Install))
            .await
            .unwrap();
        handle
            .cmd_tx
            .send(AsyncCommand::Run(ActionKind::ManualDownload))
            .await
            .unwrap();

        match handle.result_rx.recv().await.unwrap() {
            AsyncResult::Checked(Err(e)) => assert_eq!(e.to_string(), "offline"),
            other => panic!("unexpected result {other:?}"),
        }
        match handle.result_rx.recv().await.unwrap() {
            AsyncResult::ActionFinished { kind, result } => {
                assert_eq!(kind, ActionKind::Install);
                assert!(result.is_err());
            }
            other => panic!("unexpected result {other:?}"),
        }
        match handle.result_rx.recv().await.unwrap() {
            AsyncResult::ActionFinished { kind, result } => {
                assert_eq!(kind, ActionKind::ManualDownload);
                assert!(result.is_ok());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_results() {
        let mut handle = spawn_worker(FakeBridge::default());
        handle.submit(AsyncCommand::Shutdown).unwrap();
        assert!(handle.result_rx.recv().await.is_none());
    }
}
