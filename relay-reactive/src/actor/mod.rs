//! Defines the actor: a bounded mailbox serviced by a pool of worker tasks.
//!
//! # Key Components
//!
//! *   [`ActorHandle`]: The actor itself. Created fully configured with
//!     [`ActorHandle::create`], fed with `queue`/`tell`/`send`, and terminated with
//!     [`ActorHandle::stop`], which returns the messages that were never processed.
//! *   [`ActorConfig`]: Worker count, optional outbox, name and mailbox capacity.
//! *   [`ActorState`]: `Running`, `Stopping` or `Stopped`.
//! *   [`ActorStats`]: A snapshot of the per-actor message accounting.

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

pub use actor_config::ActorConfig;
pub use actor_handle::ActorHandle;
pub use actor_state::{ActorState, ActorStats};

/// Contains the `ActorConfig` builder.
mod actor_config;

/// Contains `ActorHandle` and its shared cell.
mod actor_handle;

/// Contains the lifecycle state machine and accounting counters.
mod actor_state;

/// Contains the worker loop run by every task of the pool.
mod worker;
