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
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Lifecycle of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Workers are polling the mailbox.
    Running,
    /// Cancellation has been broadcast; workers are exiting or the mailbox is draining.
    Stopping,
    /// The mailbox is drained and closed. The actor is terminal.
    Stopped,
}

impl ActorState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Crate-internal: atomically updated `ActorState`.
#[derive(Debug, Default)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn get(&self) -> ActorState {
        ActorState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves `Running` to `Stopping`.
    ///
    /// # Panics
    ///
    /// Panics if the actor is not running; `stop` may only be called once.
    pub(crate) fn begin_stop(&self, actor: &str) {
        let previous = self
            .0
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire);
        if let Err(current) = previous {
            panic!(
                "stop called twice on actor {actor} (already {})",
                ActorState::from_u8(current)
            );
        }
    }

    pub(crate) fn finish_stop(&self) {
        self.0.store(2, Ordering::Release);
    }
}

/// A snapshot of an actor's message accounting.
///
/// Every enqueued message ends up in exactly one of `succeeded`, `failed` or
/// `drained`; until then it is still in the mailbox or being processed. Once
/// `stop` has returned, `enqueued == succeeded + failed + drained`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorStats {
    /// Messages accepted by `queue`, `tell`, `try_tell`, `send`, or routed in from an upstream actor.
    pub enqueued: usize,
    /// Messages the processor returned `Ok` for.
    pub succeeded: usize,
    /// Messages the processor returned `Err` for, or panicked on.
    pub failed: usize,
    /// Messages handed back by `stop` without being processed.
    pub drained: usize,
}

impl ActorStats {
    /// Messages with a terminal disposition.
    #[must_use]
    pub const fn accounted(&self) -> usize {
        self.succeeded + self.failed + self.drained
    }
}

/// Crate-internal: the live counters behind `ActorStats`.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) enqueued: AtomicUsize,
    pub(crate) succeeded: AtomicUsize,
    pub(crate) failed: AtomicUsize,
    pub(crate) drained: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn snapshot(&self) -> ActorStats {
        ActorStats {
            enqueued: self.enqueued.load(Ordering::Acquire),
            succeeded: self.succeeded.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
            drained: self.drained.load(Ordering::Acquire),
        }
    }
}
