//! Provides the shared building blocks used by every actor.
//!
//! # Key Components:
//!
//! *   [`Mailbox`]: The bounded, cancellation-aware queue shared by all workers of one actor.
//! *   [`MessageLedger`]: The countdown of enqueued messages not yet accounted for.
//! *   [`RelayConfig`]: Global defaults loaded from XDG-compliant locations.

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

// --- Public Re-exports ---
pub use config::{DefaultsConfig, LimitsConfig, RelayConfig, TimeoutConfig, CONFIG};
pub use types::*;

// --- Crate-Internal Re-exports ---
pub(crate) use ledger::MessageLedger;
pub(crate) use mailbox::{Delivery, Mailbox};

/// Defines common type aliases.
mod types;

/// Defines the configuration system.
pub mod config;
/// Defines the `MessageLedger` countdown latch.
mod ledger;
/// Defines the `Mailbox` wrapper around a Tokio MPSC channel.
mod mailbox;
