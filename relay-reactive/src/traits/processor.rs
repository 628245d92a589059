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
use std::future::Future;

use async_trait::async_trait;

use crate::actor::ActorHandle;
use crate::common::WorkerIndex;
use crate::message::Message;

/// The processing function run by every worker of an actor.
///
/// `worker` is the 1-based index of the calling worker and `actor` is the
/// actor that dequeued the message. On `Ok`, the result is enqueued into the
/// actor's outbox if one is wired, otherwise it is discarded. On `Err`, the
/// actor's [`ExceptionHandler`](crate::traits::ExceptionHandler) is invoked
/// and nothing is routed.
///
/// Failures are terminal for the message. A processor that wants a retry can
/// re-queue the message itself through `actor`.
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Processes one message.
    async fn process(
        &self,
        worker: WorkerIndex,
        actor: &ActorHandle,
        message: Message,
    ) -> anyhow::Result<Message>;
}

/// A [`Processor`] backed by an async closure. Built with [`process_with`].
pub struct FnProcessor<F> {
    function: F,
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").finish_non_exhaustive()
    }
}

/// Adapts an async closure into a [`Processor`].
///
/// ```rust,ignore
/// let upper = process_with(|_worker, _actor, message: Message| async move {
///     let text = message.downcast::<String>().map_err(|m| anyhow::anyhow!("not text: {m:?}"))?;
///     anyhow::Ok(Message::new(text.to_uppercase()))
/// });
/// ```
pub fn process_with<F, Fut>(function: F) -> FnProcessor<F>
where
    F: Fn(WorkerIndex, ActorHandle, Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Message>> + Send + 'static,
{
    FnProcessor { function }
}

#[async_trait]
impl<F, Fut> Processor for FnProcessor<F>
where
    F: Fn(WorkerIndex, ActorHandle, Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Message>> + Send + 'static,
{
    async fn process(
        &self,
        worker: WorkerIndex,
        actor: &ActorHandle,
        message: Message,
    ) -> anyhow::Result<Message> {
        (self.function)(worker, actor.clone(), message).await
    }
}
