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

//! Message types carried through actor mailboxes.
//!
//! Mailboxes are untyped: any `'static` value that is `Send + Sync + Debug`
//! implements [`RelayMessage`] and can be boxed into a [`Message`]. Processors
//! recover the concrete type with [`Message::downcast_ref`] or
//! [`Message::downcast`].

pub use mailbox_error::MailboxError;
pub use relay_message::{Message, RelayMessage};

/// Defines the `MailboxError` type returned by non-panicking enqueue probes.
mod mailbox_error;
/// Defines the `RelayMessage` marker trait and the boxed `Message` wrapper.
mod relay_message;
