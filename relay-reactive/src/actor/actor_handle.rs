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
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use static_assertions::assert_impl_all;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, instrument, trace, warn};

use crate::actor::actor_state::{StateCell, StatsCounters};
use crate::actor::{worker, ActorConfig, ActorState, ActorStats};
use crate::common::{Mailbox, MessageLedger, CONFIG};
use crate::message::{MailboxError, Message, RelayMessage};
use crate::traits::{ExceptionHandler, Processor};

/// Crate-internal: everything shared between an actor's handles and its workers.
pub(crate) struct ActorCell {
    pub(crate) name: String,
    pub(crate) workers: usize,
    pub(crate) mailbox: Mailbox,
    pub(crate) ledger: MessageLedger,
    pub(crate) processor: Box<dyn Processor>,
    pub(crate) exception_handler: Option<Box<dyn ExceptionHandler>>,
    /// Downstream actor, published atomically so `direct` can rewire it.
    pub(crate) outbox: ArcSwapOption<Outbox>,
    pub(crate) cancellation_token: CancellationToken,
    /// Tracks the worker tasks; its count is the in-flight-worker count.
    tracker: TaskTracker,
    pub(crate) state: StateCell,
    pub(crate) stats: StatsCounters,
    stop_warning: Duration,
}

/// Crate-internal: a weak reference to the downstream actor.
pub(crate) struct Outbox {
    actor: Weak<ActorCell>,
}

impl Outbox {
    pub(crate) fn upgrade(&self) -> Option<ActorHandle> {
        self.actor.upgrade().map(|inner| ActorHandle { inner })
    }
}

/// A clonable reference to a running actor.
///
/// The actor owns a bounded mailbox, a pool of worker tasks, a [`Processor`],
/// an optional [`ExceptionHandler`] and an optional outbox (another actor that
/// receives every successful result). All clones refer to the same actor.
///
/// Lifecycle: [`create`](Self::create) starts the workers immediately; the
/// actor runs until [`stop`](Self::stop) is called, after which it is terminal.
/// Enqueuing into a stopped actor and stopping twice are programming errors
/// and panic.
///
/// Equality and hashing are by identity: two handles are equal when they refer
/// to the same actor, regardless of name.
#[derive(Clone)]
pub struct ActorHandle {
    pub(crate) inner: Arc<ActorCell>,
}

assert_impl_all!(ActorHandle: Send, Sync, Clone);

impl ActorHandle {
    /// Creates an actor and starts its worker pool.
    ///
    /// Exactly `workers` tasks are spawned before this returns. The mailbox
    /// exists before any worker runs, so a message queued right after `create`
    /// is never lost to a late-starting worker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[instrument(skip(processor, exception_handler, config))]
    pub fn create<P, H>(processor: P, exception_handler: Option<H>, config: ActorConfig) -> Self
    where
        P: Processor,
        H: ExceptionHandler,
    {
        let name = config.resolved_name(&CONFIG);
        let workers = config.resolved_workers(&CONFIG);
        let capacity = config.resolved_mailbox_capacity(workers, &CONFIG);

        let actor = Self {
            inner: Arc::new(ActorCell {
                name,
                workers,
                mailbox: Mailbox::new(capacity),
                ledger: MessageLedger::new(),
                processor: Box::new(processor),
                exception_handler: exception_handler
                    .map(|handler| Box::new(handler) as Box<dyn ExceptionHandler>),
                outbox: ArcSwapOption::empty(),
                cancellation_token: CancellationToken::new(),
                tracker: TaskTracker::new(),
                state: StateCell::default(),
                stats: StatsCounters::default(),
                stop_warning: CONFIG.stop_warning(),
            }),
        };
        actor.set_outbox(config.outbox());

        for index in 1..=workers {
            actor.inner.tracker.spawn(worker::run(actor.clone(), index));
        }
        actor.inner.tracker.close();

        debug!(actor = %actor.name(), workers, capacity, "actor started");
        actor
    }

    /// Enqueues a batch of messages without waiting for them to be processed.
    ///
    /// The unacknowledged-message count grows by the batch size before any
    /// message reaches the mailbox; the batch is then inserted in order by a
    /// background task, which waits only while the mailbox is full.
    ///
    /// # Panics
    ///
    /// Panics if the actor has been stopped, or if called outside a Tokio runtime.
    pub fn queue<I, M>(&self, messages: I)
    where
        I: IntoIterator<Item = M>,
        M: RelayMessage,
    {
        let batch: Vec<Message> = messages.into_iter().map(Message::new).collect();
        if batch.is_empty() {
            return;
        }
        self.reserve(batch.len());
        self.spawn_insert(batch);
    }

    /// Enqueues a single message. See [`queue`](Self::queue).
    ///
    /// # Panics
    ///
    /// Panics if the actor has been stopped.
    pub fn tell(&self, message: impl RelayMessage) {
        self.queue(std::iter::once(message));
    }

    /// Enqueues a single message unless the actor has been stopped.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] if the mailbox no longer accepts
    /// messages. Nothing is enqueued in that case.
    pub fn try_tell(&self, message: impl RelayMessage) -> Result<(), MailboxError> {
        if self.inner.ledger.increment(1).is_err() {
            return Err(MailboxError::Closed(self.inner.name.clone()));
        }
        self.inner.stats.enqueued.fetch_add(1, Ordering::AcqRel);
        self.spawn_insert(vec![Message::new(message)]);
        Ok(())
    }

    /// Enqueues a single message and waits until it is in the mailbox.
    ///
    /// Accounting is identical to [`queue`](Self::queue); the difference is
    /// that the caller observes the mailbox's back-pressure.
    ///
    /// # Cancel safety
    ///
    /// Dropping the returned future before the message reaches the mailbox
    /// withdraws the message and its accounting.
    ///
    /// # Panics
    ///
    /// Panics if the actor has been stopped.
    pub async fn send(&self, message: impl RelayMessage) {
        self.reserve(1);
        let reservation = Reservation { actor: self };
        if let Err(e) = self.inner.mailbox.sender().send(Message::new(message)).await {
            error!(actor = %self.inner.name, "Mailbox rejected an accounted message: {}", e);
            return;
        }
        std::mem::forget(reservation);
    }

    /// Stops the actor and returns every message that was never processed.
    ///
    /// 1. Broadcasts cancellation to all workers.
    /// 2. Waits until every worker has exited.
    /// 3. Drains the mailbox, acknowledging each drained message.
    /// 4. Waits until the unacknowledged count reaches zero, which captures
    ///    messages whose enqueue was still in progress.
    /// 5. Closes the mailbox.
    /// 6. Returns the drained messages.
    ///
    /// Stop upstream actors before their outboxes: results routed into an
    /// already stopped actor are logged and discarded.
    ///
    /// # Panics
    ///
    /// Panics if the actor is already stopping or stopped.
    #[instrument(skip(self), fields(actor = %self.inner.name))]
    pub async fn stop(&self) -> Vec<Message> {
        self.inner.state.begin_stop(&self.inner.name);
        debug!("Broadcasting cancellation to {} worker(s)", self.inner.workers);
        self.inner.cancellation_token.cancel();

        self.inner.tracker.wait().await;
        trace!("All workers exited, draining mailbox");

        let drain = self.inner.mailbox.drain(&self.inner.ledger);
        tokio::pin!(drain);
        let pending = match tokio::time::timeout(self.inner.stop_warning, &mut drain).await {
            Ok(pending) => pending,
            Err(_) => {
                warn!(
                    outstanding = self.inner.ledger.outstanding(),
                    "Stop still waiting on outstanding messages after {:?}",
                    self.inner.stop_warning
                );
                drain.await
            }
        };

        self.inner
            .stats
            .drained
            .fetch_add(pending.len(), Ordering::AcqRel);
        self.inner.state.finish_stop();
        debug!(pending = pending.len(), "Actor stopped");
        pending
    }

    /// Returns the actor's diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the number of workers in the pool.
    #[inline]
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.inner.workers
    }

    /// Returns the mailbox capacity.
    #[inline]
    #[must_use]
    pub fn mailbox_capacity(&self) -> usize {
        self.inner.mailbox.capacity()
    }

    /// Returns the downstream actor, if one is wired and still alive.
    #[must_use]
    pub fn outbox(&self) -> Option<Self> {
        self.inner
            .outbox
            .load_full()
            .and_then(|outbox| outbox.upgrade())
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ActorState {
        self.inner.state.get()
    }

    /// Returns how many enqueued messages have not yet been accounted for.
    #[inline]
    #[must_use]
    pub fn unacknowledged(&self) -> usize {
        self.inner.ledger.outstanding()
    }

    /// Returns a snapshot of the accounting counters.
    #[must_use]
    pub fn stats(&self) -> ActorStats {
        self.inner.stats.snapshot()
    }

    /// Publishes a new outbox, or clears it with `None`.
    pub(crate) fn set_outbox(&self, outbox: Option<&Self>) {
        self.inner.outbox.store(outbox.map(|target| {
            Arc::new(Outbox {
                actor: Arc::downgrade(&target.inner),
            })
        }));
    }

    fn reserve(&self, count: usize) {
        if self.inner.ledger.increment(count).is_err() {
            panic!(
                "queued {count} message(s) to stopped actor {}",
                self.inner.name
            );
        }
        self.inner.stats.enqueued.fetch_add(count, Ordering::AcqRel);
    }

    fn spawn_insert(&self, batch: Vec<Message>) {
        let sender = self.inner.mailbox.sender();
        let name = self.inner.name.clone();
        tokio::spawn(async move {
            for message in batch {
                trace!(actor = %name, ?message, "Inserting message");
                if let Err(e) = sender.send(message).await {
                    error!(actor = %name, "Mailbox rejected an accounted message: {}", e);
                }
            }
        });
    }
}

/// Withdraws one reserved message if `send` is dropped before insertion.
struct Reservation<'a> {
    actor: &'a ActorHandle,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        trace!(actor = %self.actor.inner.name, "Send abandoned before insertion");
        self.actor
            .inner
            .stats
            .enqueued
            .fetch_sub(1, Ordering::AcqRel);
        self.actor.inner.ledger.decrement_one();
    }
}

impl fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("name", &self.inner.name)
            .field("workers", &self.inner.workers)
            .field("state", &self.state())
            .finish()
    }
}

impl PartialEq for ActorHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ActorHandle {}

impl Hash for ActorHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state);
    }
}
