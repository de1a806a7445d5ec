//! Connection state machine.

use std::fmt;

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The lifecycle state of the client's single connection.
///
/// ```text
///            connect                 handshake ok
///  Closed ───────────→ Connecting ───────────────→ Open
///    ↑                     │                        │ disconnect / close frame /
///    │   handshake failed  │                        │ receive error
///    ├─────────────────────┘                        ↓
///    └──────────────── teardown done ────────── Closing
/// ```
///
/// - **Closed**: No socket. The only state in which `connect` may begin.
/// - **Connecting**: Handshake in flight. Nothing can be sent yet.
/// - **Open**: Frames flow both ways. Sends are accepted.
/// - **Closing**: Close handshake and task teardown in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Connecting,
    Open,
    Closing,
}

impl ConnectionState {
    /// Returns `true` if frames can be sent.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Closed, Self::Connecting)
                | (Self::Connecting, Self::Open)
                | (Self::Connecting, Self::Closed)
                | (Self::Open, Self::Closing)
                | (Self::Closing, Self::Closed)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Open => write!(f, "Open"),
            Self::Closing => write!(f, "Closing"),
        }
    }
}

/// Applies `target` if it is a legal move from the current state.
///
/// The check and the write happen under the channel's lock, so the consumer
/// and a terminating receive task can race on the state without either one
/// applying a stale transition. Returns whether the state changed.
pub(crate) fn transition(
    state: &watch::Sender<ConnectionState>,
    target: ConnectionState,
) -> bool {
    state.send_if_modified(|current| {
        if current.can_transition_to(target) {
            tracing::trace!(from = %current, to = %target, "connection state");
            *current = target;
            true
        } else {
            false
        }
    })
}

/// Walks `Open → Closing → Closed`. Used when the receive task ends on its
/// own. Returns `false` if someone else already moved the state off `Open`.
pub(crate) fn settle_closed(state: &watch::Sender<ConnectionState>) -> bool {
    transition(state, ConnectionState::Closing) && transition(state, ConnectionState::Closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        assert_eq!(ConnectionState::default(), ConnectionState::Closed);
    }

    #[test]
    fn test_happy_path_transitions() {
        use ConnectionState::*;
        assert!(Closed.can_transition_to(Connecting));
        assert!(Connecting.can_transition_to(Open));
        assert!(Open.can_transition_to(Closing));
        assert!(Closing.can_transition_to(Closed));
    }

    #[test]
    fn test_failed_handshake_returns_to_closed() {
        assert!(ConnectionState::Connecting.can_transition_to(ConnectionState::Closed));
    }

    #[test]
    fn test_no_skipping_states() {
        use ConnectionState::*;
        assert!(!Closed.can_transition_to(Open));
        assert!(!Open.can_transition_to(Closed));
        assert!(!Closing.can_transition_to(Open));
        assert!(!Closed.can_transition_to(Closing));
        assert!(!Closed.can_transition_to(Closed));
    }

    #[test]
    fn test_is_open() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Closing.is_open());
        assert!(!ConnectionState::Closed.is_open());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "Connecting");
        assert_eq!(ConnectionState::Closing.to_string(), "Closing");
    }

    #[test]
    fn test_transition_rejects_illegal_move() {
        let (tx, rx) = watch::channel(ConnectionState::Closed);
        assert!(!transition(&tx, ConnectionState::Open));
        assert_eq!(*rx.borrow(), ConnectionState::Closed);

        assert!(transition(&tx, ConnectionState::Connecting));
        assert!(transition(&tx, ConnectionState::Open));
        assert_eq!(*rx.borrow(), ConnectionState::Open);
    }

    #[test]
    fn test_settle_closed_from_open() {
        let (tx, rx) = watch::channel(ConnectionState::Open);
        assert!(settle_closed(&tx));
        assert_eq!(*rx.borrow(), ConnectionState::Closed);
    }

    #[test]
    fn test_settle_closed_is_a_no_op_once_closing() {
        let (tx, rx) = watch::channel(ConnectionState::Closing);
        assert!(!settle_closed(&tx));
        assert_eq!(*rx.borrow(), ConnectionState::Closing);
    }
}
