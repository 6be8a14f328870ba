//! Errors surfaced by the update service bridge

use thiserror::Error;

/// Failure of an asynchronous bridge call.
///
/// The display form of [`BridgeError::Rejected`] is the bare message, so it can
/// be handed back to callers verbatim (e.g. in a neutral check response).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The bridge rejected the call
    #[error("{0}")]
    Rejected(String),

    /// The worker driving bridge calls is gone
    #[error("update bridge disconnected")]
    Disconnected,
}

impl BridgeError {
    /// Build a rejection from anything printable
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_bare_message() {
        assert_eq!(BridgeError::rejected("network down").to_string(), "network down");
    }

    #[test]
    fn test_disconnected_message() {
        assert_eq!(
            BridgeError::Disconnected.to_string(),
            "update bridge disconnected"
        );
    }
}
