//! Per-connection background tasks: the receive loop and the outbound writer.
//!
//! Each open connection runs exactly one of each. Both are bound to the
//! connection's cancellation token; cancelling it is the only way a pending
//! receive is interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rallypoint_protocol::{Frame, FrameCodec};
use rallypoint_transport::{ConnectionId, FrameReceiver, FrameSender};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::dispatch::Inbox;
use crate::state::{settle_closed, ConnectionState};

/// Everything the receive loop needs, moved into its task.
pub(crate) struct ReceiveContext {
    pub(crate) id: ConnectionId,
    pub(crate) cancel: CancellationToken,
    pub(crate) enabled: Arc<AtomicBool>,
    pub(crate) state: Arc<watch::Sender<ConnectionState>>,
    pub(crate) codec: Arc<dyn FrameCodec>,
    pub(crate) inbox: Inbox,
}

/// Pulls frames off the connection until it closes, fails, or is cancelled.
///
/// - cancellation or a cleared `enabled` flag: disconnect is driving
///   teardown, exit without touching state.
/// - close frame / end of stream: exit quietly, settle state to `Closed`.
/// - transport error: log, settle state to `Closed`. No resumption.
/// - unreadable frame: log, drop, keep going.
pub(crate) async fn receive_loop<R: FrameReceiver>(mut receiver: R, ctx: ReceiveContext) {
    let id = ctx.id;

    loop {
        if !ctx.enabled.load(Ordering::Acquire) {
            return;
        }

        let result = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                tracing::trace!(%id, "receive cancelled");
                return;
            }
            result = receiver.recv() => result,
        };

        match result {
            Ok(Some(data)) => {
                if !data.is_empty() {
                    route(&ctx, &data);
                }
            }
            Ok(None) => {
                tracing::info!(%id, "server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "receive failed, connection lost");
                break;
            }
        }
    }

    // The loop ended on its own. If disconnect already cleared the flag it
    // owns the teardown; otherwise close out the connection here.
    if ctx.enabled.swap(false, Ordering::AcqRel) {
        settle_closed(&ctx.state);
        ctx.cancel.cancel();
    }
}

/// Classifies one frame and pushes it onto the matching queue.
fn route(ctx: &ReceiveContext, data: &[u8]) {
    match ctx.codec.decode_frame(data) {
        Ok(Frame::MatchFound { opponent_id }) => {
            tracing::debug!(id = %ctx.id, %opponent_id, "match found");
            ctx.inbox.push_match(opponent_id);
        }
        Ok(Frame::Chat(message)) => {
            tracing::trace!(id = %ctx.id, sender = message.sender_name(), "chat received");
            ctx.inbox.push_chat(message);
        }
        Err(e) => {
            tracing::debug!(
                id = %ctx.id,
                error = %e,
                len = data.len(),
                "dropping unreadable frame"
            );
        }
    }
}

/// A command for the writer task.
#[derive(Debug)]
pub(crate) enum Outbound {
    Text(String),
    /// Send the close handshake, then stop.
    Close,
}

/// Writes queued frames in the order they were queued.
///
/// The writer owns the send half, so it is released as soon as this task
/// ends: on [`Outbound::Close`], on cancellation, or when the receive loop
/// gives up on the connection. A failed write is logged and the frame
/// dropped; the connection stays up and the next frame is attempted.
pub(crate) async fn write_loop<S: FrameSender>(
    id: ConnectionId,
    mut sender: S,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    cancel: CancellationToken,
) {
    loop {
        let command = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = outbound.recv() => match next {
                Some(command) => command,
                None => break,
            },
        };

        match command {
            Outbound::Text(text) => {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    result = sender.send_text(text) => result,
                };
                if let Err(e) = result {
                    tracing::warn!(%id, error = %e, "send failed, frame dropped");
                }
            }
            Outbound::Close => {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    result = sender.close() => result,
                };
                if let Err(e) = result {
                    tracing::debug!(%id, error = %e, "close handshake failed");
                }
                break;
            }
        }
    }

    tracing::trace!(%id, "writer stopped");
}
