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

use crate::actor::ActorHandle;
use crate::common::RelayConfig;

/// Configuration parameters used to create a new actor.
///
/// Every field is optional. Unset fields are resolved against the global
/// [`RelayConfig`] when the actor is created:
///
/// * `workers` falls back to `defaults.workers`; zero becomes 1 either way.
/// * `name` falls back to `defaults.actor_name`. Names are diagnostic only and
///   need not be unique.
/// * `mailbox_capacity` falls back to `limits.mailbox_capacity`, and when that
///   is 0, to the worker count.
/// * `outbox` is the downstream actor receiving successful results. The actor
///   keeps only a weak reference to it.
#[derive(Default, Debug, Clone)]
pub struct ActorConfig {
    name: Option<String>,
    workers: Option<usize>,
    outbox: Option<ActorHandle>,
    mailbox_capacity: Option<usize>,
}

impl ActorConfig {
    /// Creates an empty configuration; every value comes from the global defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with the given diagnostic name.
    #[must_use]
    pub fn new_with_name(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    /// Sets the diagnostic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the number of workers. Zero is normalized to 1.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Routes successful results into `outbox`.
    #[must_use]
    pub fn with_outbox(mut self, outbox: &ActorHandle) -> Self {
        self.outbox = Some(outbox.clone());
        self
    }

    /// Overrides the mailbox capacity. Zero is normalized to 1.
    #[must_use]
    pub const fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = Some(capacity);
        self
    }

    pub(crate) fn resolved_name(&self, config: &RelayConfig) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| config.defaults.actor_name.clone())
    }

    pub(crate) fn resolved_workers(&self, config: &RelayConfig) -> usize {
        self.workers
            .map_or_else(|| config.default_workers(), |workers| workers.max(1))
    }

    pub(crate) fn resolved_mailbox_capacity(&self, workers: usize, config: &RelayConfig) -> usize {
        self.mailbox_capacity
            .map_or_else(|| config.mailbox_capacity_for(workers), |capacity| capacity.max(1))
    }

    pub(crate) fn outbox(&self) -> Option<&ActorHandle> {
        self.outbox.as_ref()
    }
}
