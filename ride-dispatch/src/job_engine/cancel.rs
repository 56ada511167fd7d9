// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use async_channel::{Receiver, Sender};

/// One-way cancellation signal.
///
/// Nothing is ever sent on the inner channel: cancelling closes it, which
/// wakes every task parked in [`CancelToken::cancelled`]. Clones share the
/// same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::bounded(1);
        Self { tx, rx }
    }

    pub fn cancel(&self) {
        self.tx.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&self) {
        // Only ever resolves with `Err(RecvError)`, i.e. when closed.
        let _ = self.rx.recv().await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
