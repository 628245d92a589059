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
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::common::{MailboxSender, MessageLedger};
use crate::message::Message;

/// What a worker gets back from [`Mailbox::next`].
#[derive(Debug)]
pub(crate) enum Delivery {
    /// A message was dequeued and must be processed.
    Message(Message),
    /// The actor's cancellation token fired, or the mailbox was closed.
    Cancelled,
}

/// Bounded FIFO shared by every worker of one actor.
///
/// Tokio's MPSC receiver has a single consumer, so workers take turns holding
/// it behind an async mutex while they wait. The wait races the actor's
/// cancellation token without priority, so a worker may leave while messages
/// remain; those are picked up by [`Mailbox::drain`].
#[derive(Debug)]
pub(crate) struct Mailbox {
    sender: MailboxSender,
    receiver: Mutex<mpsc::Receiver<Message>>,
    capacity: usize,
}

impl Mailbox {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Mutex::new(receiver),
            capacity,
        }
    }

    pub(crate) fn sender(&self) -> MailboxSender {
        self.sender.clone()
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waits for either the next message or cancellation, whichever comes first.
    pub(crate) async fn next(&self, cancellation: &CancellationToken) -> Delivery {
        tokio::select! {
            () = cancellation.cancelled() => Delivery::Cancelled,
            incoming = async { self.receiver.lock().await.recv().await } => match incoming {
                Some(message) => Delivery::Message(message),
                None => Delivery::Cancelled,
            },
        }
    }

    /// Reads every remaining message until `ledger` settles, then closes both
    /// the ledger and the channel.
    ///
    /// Must only run once all workers have exited. Messages whose enqueue was
    /// still in progress are waited for, since their ledger increment already
    /// happened.
    pub(crate) async fn drain(&self, ledger: &MessageLedger) -> Vec<Message> {
        let mut receiver = self.receiver.lock().await;
        let mut pending = Vec::new();
        loop {
            tokio::select! {
                biased;
                incoming = receiver.recv() => match incoming {
                    Some(message) => {
                        trace!(?message, "drained pending message");
                        pending.push(message);
                        ledger.decrement_one();
                    }
                    None => break,
                },
                () = ledger.settled() => {
                    if ledger.close_if_settled() {
                        break;
                    }
                }
            }
        }
        receiver.close();
        pending
    }
}
