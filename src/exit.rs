//! The exit conduit: a small signaling primitive that lets the `exit`
//! builtin request loop termination without blocking, and lets the run loop
//! poll for that request between reads.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

/// Create a connected requester/listener pair.
///
/// The underlying channel is bounded with capacity one: a single signal is
/// enough to stop the loop, and repeat signals are absorbed without
/// blocking the sender.
pub fn conduit() -> (ExitRequester, ExitListener) {
    let (tx, rx) = mpsc::sync_channel(1);
    (
        ExitRequester { tx },
        ExitListener { rx, observed: false },
    )
}

/// Sending half of the exit conduit, held by the `exit` builtin.
#[derive(Clone)]
pub struct ExitRequester {
    tx: SyncSender<()>,
}

impl ExitRequester {
    /// Request loop termination. Never blocks; requests after the first
    /// (or after the listener is gone) are harmless no-ops.
    pub fn request(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => {}
        }
    }
}

/// Receiving half of the exit conduit, owned by the run loop.
pub struct ExitListener {
    rx: Receiver<()>,
    observed: bool,
}

impl ExitListener {
    /// Poll for a pending exit request. Never blocks. Once a request has
    /// been observed this keeps returning `true`.
    pub fn is_requested(&mut self) -> bool {
        if !self.observed {
            self.observed = self.rx.try_recv().is_ok();
        }
        self.observed
    }
}
