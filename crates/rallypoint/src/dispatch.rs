//! Hand-off between the receive task and the consumer's tick.
//!
//! The receive task pushes into two unbounded channels (chat lines and
//! matchmaking notifications); the consumer drains both once per tick.
//! Neither side ever waits on the other: `send` and `try_recv` never block.

use rallypoint_protocol::ChatMessage;
use tokio::sync::mpsc;

/// Callback invoked with an opponent id when a match is found.
pub type MatchFoundHandler = Box<dyn FnMut(&str) + Send + 'static>;

/// Producer side, cloned into every receive task.
#[derive(Debug, Clone)]
pub(crate) struct Inbox {
    chat: mpsc::UnboundedSender<ChatMessage>,
    matches: mpsc::UnboundedSender<String>,
}

impl Inbox {
    pub(crate) fn push_chat(&self, message: ChatMessage) {
        // Fails only once the client (and its dispatcher) is gone.
        let _ = self.chat.send(message);
    }

    pub(crate) fn push_match(&self, opponent_id: String) {
        let _ = self.matches.send(opponent_id);
    }
}

/// Consumer side: owns both queues and the registered handlers.
pub(crate) struct Dispatcher {
    chat: mpsc::UnboundedReceiver<ChatMessage>,
    matches: mpsc::UnboundedReceiver<String>,
    handlers: Vec<MatchFoundHandler>,
}

impl Dispatcher {
    /// Creates an empty dispatcher and the inbox that feeds it.
    pub(crate) fn new() -> (Inbox, Self) {
        let (chat_tx, chat_rx) = mpsc::unbounded_channel();
        let (match_tx, match_rx) = mpsc::unbounded_channel();
        (
            Inbox {
                chat: chat_tx,
                matches: match_tx,
            },
            Self {
                chat: chat_rx,
                matches: match_rx,
                handlers: Vec::new(),
            },
        )
    }

    pub(crate) fn on_match_found(&mut self, handler: MatchFoundHandler) {
        self.handlers.push(handler);
    }

    /// Empties both queues: matchmaking first (each handler once per id, in
    /// arrival order), then chat into `out`, replacing its contents.
    ///
    /// Each queue is drained up to the depth observed when its drain starts,
    /// so items pushed concurrently wait for the next tick instead of
    /// stretching this one.
    pub(crate) fn drain(&mut self, out: &mut Vec<ChatMessage>) {
        out.clear();

        for _ in 0..self.matches.len() {
            let Ok(opponent_id) = self.matches.try_recv() else {
                break;
            };
            tracing::debug!(%opponent_id, "dispatching match found");
            for handler in &mut self.handlers {
                handler(&opponent_id);
            }
        }

        let pending = self.chat.len();
        out.reserve(pending);
        for _ in 0..pending {
            let Ok(message) = self.chat.try_recv() else {
                break;
            };
            out.push(message);
        }
    }
}
