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
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use tracing::{debug, error, instrument, trace};

use crate::actor::ActorHandle;
use crate::common::{Delivery, WorkerIndex};
use crate::message::Message;

/// The loop run by each worker task until the actor's cancellation fires.
#[instrument(skip(actor), fields(actor = %actor.name()))]
pub(crate) async fn run(actor: ActorHandle, worker: WorkerIndex) {
    trace!("Worker started");
    loop {
        match actor
            .inner
            .mailbox
            .next(&actor.inner.cancellation_token)
            .await
        {
            Delivery::Message(message) => dispatch(&actor, worker, message).await,
            Delivery::Cancelled => break,
        }
    }
    trace!("Worker exited");
}

/// Processes one message, routes or reports the outcome, then acknowledges it.
async fn dispatch(actor: &ActorHandle, worker: WorkerIndex, message: Message) {
    trace!(?message, "Processing message");
    let outcome = AssertUnwindSafe(actor.inner.processor.process(worker, actor, message))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            Err(anyhow::anyhow!(
                "processor panicked: {}",
                panic_message(payload.as_ref())
            ))
        });

    match outcome {
        Ok(result) => {
            actor.inner.stats.succeeded.fetch_add(1, Ordering::AcqRel);
            route(actor, result);
        }
        Err(failure) => {
            actor.inner.stats.failed.fetch_add(1, Ordering::AcqRel);
            report(actor, worker, failure).await;
        }
    }

    actor.inner.ledger.decrement_one();
}

fn route(actor: &ActorHandle, result: Message) {
    let Some(outbox) = actor.inner.outbox.load_full() else {
        trace!(?result, "No outbox, result discarded");
        return;
    };
    match outbox.upgrade() {
        Some(next) => {
            trace!(outbox = %next.name(), "Routing result");
            if let Err(e) = next.try_tell(result) {
                error!("{}, result discarded", e);
            }
        }
        None => {
            error!(?result, "Outbox actor was dropped, result discarded");
        }
    }
}

async fn report(actor: &ActorHandle, worker: WorkerIndex, failure: anyhow::Error) {
    let Some(handler) = actor.inner.exception_handler.as_ref() else {
        debug!("Processing failed with no exception handler: {:?}", failure);
        return;
    };
    let handled = AssertUnwindSafe(handler.handle(worker, actor, failure))
        .catch_unwind()
        .await;
    if let Err(payload) = handled {
        error!(
            "Exception handler panicked: {}",
            panic_message(payload.as_ref())
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
