/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! The unacknowledged-message countdown.
//!
//! Every enqueue adds the batch size *before* any message of the batch reaches
//! the mailbox, and every terminal disposition (success, failure, drained)
//! removes exactly one. Because of that ordering a zero reading means the
//! mailbox is empty and no producer is mid-insert, which is what lets `stop`
//! close the mailbox without stranding a message.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LedgerState {
    outstanding: usize,
    closed: bool,
}

/// Returned by [`MessageLedger::increment`] once the ledger has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LedgerClosed;

/// A count-down latch that can be re-armed by increments until it is closed.
#[derive(Debug)]
pub(crate) struct MessageLedger {
    state: watch::Sender<LedgerState>,
}

impl Default for MessageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLedger {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(LedgerState::default());
        Self { state }
    }

    /// Adds `count` outstanding messages.
    ///
    /// Fails without changing anything if the ledger was closed.
    pub(crate) fn increment(&self, count: usize) -> Result<(), LedgerClosed> {
        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            accepted = true;
            state.outstanding += count;
            count > 0
        });
        if accepted {
            Ok(())
        } else {
            Err(LedgerClosed)
        }
    }

    /// Acknowledges one message.
    ///
    /// # Panics
    ///
    /// Panics if nothing is outstanding.
    pub(crate) fn decrement_one(&self) {
        let mut underflow = false;
        self.state.send_if_modified(|state| {
            if state.outstanding == 0 {
                underflow = true;
                return false;
            }
            state.outstanding -= 1;
            true
        });
        assert!(!underflow, "message ledger went negative");
    }

    /// Resolves once nothing is outstanding.
    pub(crate) async fn settled(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = receiver.wait_for(|state| state.outstanding == 0).await;
    }

    /// Closes the ledger if nothing is outstanding. Returns whether it is now closed.
    pub(crate) fn close_if_settled(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.closed || state.outstanding > 0 {
                return false;
            }
            state.closed = true;
            true
        });
        self.is_closed()
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.state.borrow().outstanding
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}
