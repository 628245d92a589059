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
/// Errors reported when a message cannot be placed into a mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxError {
    /// The actor has been stopped and its mailbox no longer accepts writers.
    Closed(String),
}

impl std::fmt::Display for MailboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailboxError::Closed(actor) => write!(f, "Mailbox of actor {actor} is closed"),
        }
    }
}

impl std::error::Error for MailboxError {}

/// Converts a `SendError` from Tokio's MPSC channel to a `MailboxError`.
impl<T> From<tokio::sync::mpsc::error::SendError<T>> for MailboxError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        MailboxError::Closed("channel closed".into())
    }
}
