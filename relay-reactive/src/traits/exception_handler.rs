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

/// Invoked with the failure whenever an actor's processor returns `Err`.
///
/// The runtime imposes no logging or surfacing policy of its own; whatever
/// should happen to a failed message happens here.
#[async_trait]
pub trait ExceptionHandler: Send + Sync + 'static {
    /// Handles one processing failure.
    async fn handle(&self, worker: WorkerIndex, actor: &ActorHandle, failure: anyhow::Error);
}

/// An [`ExceptionHandler`] backed by an async closure. Built with [`handle_with`].
pub struct FnExceptionHandler<F> {
    function: F,
}

impl<F> fmt::Debug for FnExceptionHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExceptionHandler").finish_non_exhaustive()
    }
}

/// Adapts an async closure into an [`ExceptionHandler`].
pub fn handle_with<F, Fut>(function: F) -> FnExceptionHandler<F>
where
    F: Fn(WorkerIndex, ActorHandle, anyhow::Error) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    FnExceptionHandler { function }
}

#[async_trait]
impl<F, Fut> ExceptionHandler for FnExceptionHandler<F>
where
    F: Fn(WorkerIndex, ActorHandle, anyhow::Error) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, worker: WorkerIndex, actor: &ActorHandle, failure: anyhow::Error) {
        (self.function)(worker, actor.clone(), failure).await;
    }
}

/// Names the handler type when an actor is created without one.
///
/// ```rust,ignore
/// ActorHandle::create(processor, None::<NoExceptionHandler>, ActorConfig::new());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum NoExceptionHandler {}

#[async_trait]
impl ExceptionHandler for NoExceptionHandler {
    async fn handle(&self, _worker: WorkerIndex, _actor: &ActorHandle, _failure: anyhow::Error) {
        match *self {}
    }
}
