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

#![forbid(unsafe_code)]
#![forbid(missing_docs)]

//! # Relay Reactive
//!
//! A small actor runtime built on Tokio. Each actor owns a bounded mailbox that
//! is serviced by a pool of worker tasks, can forward its results to one
//! downstream actor, and can be stopped without losing or double-counting any
//! message that was in flight.
//!
//! ## Key Concepts
//!
//! - **Actors (`ActorHandle`)**: clonable references to a running worker pool.
//!   Messages are enqueued with `queue`, `tell` or `send`; `stop` drains the
//!   mailbox and hands back whatever was never processed.
//! - **Capabilities (`Processor`, `ExceptionHandler`)**: user-supplied logic run
//!   by every worker. Closures are adapted with [`prelude::process_with`] and
//!   [`prelude::handle_with`].
//! - **Pipelines (`direct`)**: chain actors so the successful result of one is
//!   enqueued into the next.
//! - **Accounting**: every enqueued message ends up exactly once as succeeded,
//!   failed, or drained. [`prelude::ActorStats`] exposes the counters.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_reactive::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let echo = ActorHandle::create(
//!         process_with(|_worker, _actor, message: Message| async move { anyhow::Ok(message) }),
//!         None::<NoExceptionHandler>,
//!         ActorConfig::new().with_workers(2),
//!     );
//!     echo.queue(["hello", "world"]);
//!     let pending = echo.stop().await;
//!     println!("{} left unprocessed", pending.len());
//! }
//! ```

/// Mailbox, ledger, configuration and shared type aliases.
pub(crate) mod common;

/// The actor, its configuration, state and worker loop.
pub(crate) mod actor;

/// Message marker trait and mailbox errors.
pub(crate) mod message;

/// Capability traits implemented by user code.
pub(crate) mod traits;

/// Pipeline wiring.
pub(crate) mod director;

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// *   [`crate::actor::ActorHandle`]: The actor itself; create, queue, stop.
/// *   [`crate::actor::ActorConfig`]: Worker count, outbox, name and mailbox capacity.
/// *   [`crate::actor::ActorState`] / [`crate::actor::ActorStats`]: Lifecycle and accounting snapshots.
/// *   [`crate::common::RelayConfig`]: Global defaults loaded from XDG locations.
/// *   [`crate::director::direct`]: Chains actors into a pipeline.
/// *   [`crate::message::RelayMessage`] / [`crate::message::Message`]: Message marker trait and boxed form.
/// *   [`crate::traits::Processor`] / [`crate::traits::ExceptionHandler`]: Capability traits.
/// *   [`async_trait::async_trait`]: For implementing the capability traits on user types.
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::actor::{ActorConfig, ActorHandle, ActorState, ActorStats};
    pub use crate::common::{
        DefaultsConfig, LimitsConfig, RelayConfig, TimeoutConfig, WorkerIndex, CONFIG,
    };
    pub use crate::director::direct;
    pub use crate::message::{MailboxError, Message, RelayMessage};
    pub use crate::traits::{
        handle_with, process_with, ExceptionHandler, FnExceptionHandler, FnProcessor,
        NoExceptionHandler, Processor,
    };
}
