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
#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use relay_reactive::prelude::*;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for tests.
///
/// Logs go to `logs/relay_tests.txt` through a non-blocking writer so that
/// worker tasks are never slowed down by terminal output.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        std::fs::create_dir_all("logs").expect("could not create logs dir");

        let file_appender = RollingFileAppender::new(Rotation::NEVER, "logs", "relay_tests.txt");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the non-blocking writer is not dropped before process exit
        Box::leak(Box::new(guard));

        let filter = EnvFilter::new("info")
            .add_directive("relay_reactive::actor=trace".parse().unwrap())
            .add_directive("relay_reactive::common::mailbox=trace".parse().unwrap())
            .add_directive("relay_reactive::director=trace".parse().unwrap())
            .add_directive("actor_tests=trace".parse().unwrap())
            .add_directive("pipeline_tests=trace".parse().unwrap())
            .add_directive("shutdown_tests=trace".parse().unwrap());

        let subscriber = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_max_level(Level::TRACE)
            .compact()
            .with_line_number(true)
            .without_time()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/// Values seen by a processor, shared with the test body.
pub type Seen<T> = Arc<Mutex<Vec<T>>>;

/// A processor that passes every message through unchanged.
pub fn identity() -> FnProcessor<
    impl Fn(WorkerIndex, ActorHandle, Message) -> futures::future::Ready<anyhow::Result<Message>>
        + Send
        + Sync
        + 'static,
> {
    process_with(|_worker, _actor, message: Message| futures::future::ready(anyhow::Ok(message)))
}

/// A processor that records every `u64` it receives and echoes it.
pub fn recording(
    seen: Seen<u64>,
    delay: Duration,
) -> FnProcessor<
    impl Fn(WorkerIndex, ActorHandle, Message) -> futures::future::BoxFuture<'static, anyhow::Result<Message>>
        + Send
        + Sync
        + 'static,
> {
    process_with(move |_worker, _actor, message: Message| {
        let seen = seen.clone();
        let work: futures::future::BoxFuture<'static, anyhow::Result<Message>> =
            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let value = *message
                    .downcast_ref::<u64>()
                    .ok_or_else(|| anyhow::anyhow!("expected u64, got {message:?}"))?;
                seen.lock().unwrap().push(value);
                Ok(message)
            });
        work
    })
}

/// Collects `u64` values out of drained messages.
pub fn values(pending: Vec<Message>) -> Vec<u64> {
    pending
        .into_iter()
        .map(|message| {
            message
                .downcast::<u64>()
                .unwrap_or_else(|other| panic!("unexpected pending message {other:?}"))
        })
        .collect()
}

/// Polls `condition` every few milliseconds until it holds or `timeout` passes.
pub async fn eventually(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
