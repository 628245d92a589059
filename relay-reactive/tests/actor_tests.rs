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
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use relay_reactive::prelude::*;
use tokio::sync::{Notify, Semaphore};
use tracing::info;

use crate::setup::*;

mod setup;

/// Tells 1..=100 from concurrent tasks to a slow pool and stops immediately.
/// Returns what the processor saw and what `stop` handed back.
async fn tell_and_stop(workers: usize) -> (Vec<u64>, Vec<u64>, ActorStats) {
    let seen: Seen<u64> = Arc::default();
    let actor = ActorHandle::create(
        recording(seen.clone(), Duration::from_millis(2)),
        None::<NoExceptionHandler>,
        ActorConfig::new_with_name("adder").with_workers(workers),
    );

    let senders = (1..=100u64).map(|value| {
        let actor = actor.clone();
        tokio::spawn(async move { actor.tell(value) })
    });
    for sender in join_all(senders).await {
        sender.expect("sender task panicked");
    }

    let pending = values(actor.stop().await);
    let processed = seen.lock().unwrap().clone();
    (processed, pending, actor.stats())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_message_is_lost() -> anyhow::Result<()> {
    initialize_tracing();

    let (processed, pending, stats) = tell_and_stop(5).await;
    info!(
        processed = processed.len(),
        pending = pending.len(),
        "Adder stopped"
    );

    let total: u64 = processed.iter().sum::<u64>() + pending.iter().sum::<u64>();
    assert_eq!(total, 5050);
    assert_eq!(stats.enqueued, 100);
    assert_eq!(stats.accounted(), 100);
    assert_eq!(stats.drained, pending.len());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_message_is_counted_twice() -> anyhow::Result<()> {
    initialize_tracing();

    let (processed, pending, _) = tell_and_stop(5).await;
    let processed_set: BTreeSet<u64> = processed.iter().copied().collect();
    let pending_set: BTreeSet<u64> = pending.iter().copied().collect();

    assert_eq!(processed_set.len(), processed.len(), "a message was processed twice");
    assert_eq!(pending_set.len(), pending.len(), "a message was drained twice");
    assert!(processed_set.is_disjoint(&pending_set));
    let union: BTreeSet<u64> = processed_set.union(&pending_set).copied().collect();
    assert_eq!(union, (1..=100).collect());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_accounting_is_stable_across_runs() -> anyhow::Result<()> {
    initialize_tracing();

    for run in 0..3 {
        let (processed, pending, stats) = tell_and_stop(3).await;
        info!(run, drained = stats.drained, "Run finished");
        let mut all: Vec<u64> = processed.into_iter().chain(pending).collect();
        all.sort_unstable();
        assert_eq!(all, (1..=100).collect::<Vec<_>>());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_workers_is_raised_to_one() -> anyhow::Result<()> {
    initialize_tracing();

    let indices: Seen<WorkerIndex> = Arc::default();
    let recorder = indices.clone();
    let actor = ActorHandle::create(
        process_with(move |worker, _actor, message: Message| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(worker);
                anyhow::Ok(message)
            }
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new().with_workers(0),
    );

    assert_eq!(actor.worker_count(), 1);
    assert_eq!(actor.mailbox_capacity(), 1);

    actor.queue(0..10u64);
    assert!(eventually(Duration::from_secs(5), || indices.lock().unwrap().len() == 10).await);
    assert!(actor.stop().await.is_empty());
    assert!(indices.lock().unwrap().iter().all(|worker| *worker == 1));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_indices_are_one_based() -> anyhow::Result<()> {
    initialize_tracing();

    let indices: Seen<WorkerIndex> = Arc::default();
    let recorder = indices.clone();
    let actor = ActorHandle::create(
        process_with(move |worker, _actor, message: Message| {
            let recorder = recorder.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                recorder.lock().unwrap().push(worker);
                anyhow::Ok(message)
            }
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new_with_name("pool").with_workers(3),
    );
    assert_eq!(actor.name(), "pool");
    assert_eq!(actor.worker_count(), 3);

    actor.queue(0..30u64);
    assert!(eventually(Duration::from_secs(5), || indices.lock().unwrap().len() == 30).await);
    actor.stop().await;

    let indices = indices.lock().unwrap();
    assert!(indices.iter().all(|worker| (1..=3).contains(worker)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_exception_handler_receives_failures() -> anyhow::Result<()> {
    initialize_tracing();

    let failures: Seen<String> = Arc::default();
    let recorder = failures.clone();
    let actor = ActorHandle::create(
        process_with(|_worker, _actor, message: Message| async move {
            let value = message.downcast_ref::<u64>().copied();
            match value {
                Some(value) if value % 2 == 0 => anyhow::Ok(message),
                Some(value) => anyhow::bail!("odd value {value}"),
                None => anyhow::bail!("unexpected {message:?}"),
            }
        }),
        Some(handle_with(move |worker, actor, failure| {
            let recorder = recorder.clone();
            async move {
                assert!(worker >= 1);
                assert_eq!(actor.name(), "evens");
                recorder.lock().unwrap().push(failure.to_string());
            }
        })),
        ActorConfig::new_with_name("evens").with_workers(2),
    );

    actor.queue(1..=6u64);
    assert!(eventually(Duration::from_secs(5), || actor.unacknowledged() == 0).await);
    assert!(actor.stop().await.is_empty());

    let mut failures = failures.lock().unwrap().clone();
    failures.sort();
    assert_eq!(failures, vec!["odd value 1", "odd value 3", "odd value 5"]);

    let stats = actor.stats();
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failures_without_handler_are_counted() -> anyhow::Result<()> {
    initialize_tracing();

    let actor = ActorHandle::create(
        process_with(|_worker, _actor, _message: Message| async move {
            Err::<Message, _>(anyhow::anyhow!("always fails"))
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new(),
    );

    actor.queue(["a", "b", "c"]);
    assert!(eventually(Duration::from_secs(5), || actor.stats().failed == 3).await);
    assert!(actor.stop().await.is_empty());
    assert_eq!(actor.stats().accounted(), 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_processor_panic_is_a_failure() -> anyhow::Result<()> {
    initialize_tracing();

    let handled = Arc::new(AtomicUsize::new(0));
    let counter = handled.clone();
    let actor = ActorHandle::create(
        process_with(|_worker, _actor, message: Message| async move {
            if message.downcast_ref::<&str>() == Some(&"boom") {
                panic!("boom");
            }
            anyhow::Ok(message)
        }),
        Some(handle_with(move |_worker, _actor, failure| {
            let counter = counter.clone();
            async move {
                assert!(failure.to_string().contains("boom"));
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })),
        ActorConfig::new().with_workers(1),
    );

    actor.queue(["fine", "boom", "fine"]);
    assert!(eventually(Duration::from_secs(5), || actor.stats().accounted() == 3).await);
    assert!(actor.stop().await.is_empty());

    let stats = actor.stats();
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(handled.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_send_observes_backpressure() -> anyhow::Result<()> {
    initialize_tracing();

    let gate = Arc::new(Semaphore::new(0));
    let started = Arc::new(Notify::new());
    let (worker_gate, worker_started) = (gate.clone(), started.clone());
    let actor = ActorHandle::create(
        process_with(move |_worker, _actor, message: Message| {
            let (gate, started) = (worker_gate.clone(), worker_started.clone());
            async move {
                started.notify_one();
                gate.acquire().await?.forget();
                anyhow::Ok(message)
            }
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new().with_workers(1).with_mailbox_capacity(1),
    );

    actor.send(1u64).await;
    started.notified().await;
    // The worker is blocked on the first message; the second fills the mailbox.
    actor.send(2u64).await;
    let third = tokio::time::timeout(Duration::from_millis(50), actor.send(3u64)).await;
    assert!(third.is_err(), "send should wait while the mailbox is full");
    assert_eq!(actor.stats().enqueued, 2, "abandoned send must be withdrawn");
    assert_eq!(actor.unacknowledged(), 2);

    gate.add_permits(2);
    let pending = values(actor.stop().await);
    assert!(pending.is_empty() || pending == vec![2]);

    let stats = actor.stats();
    assert_eq!(stats.succeeded + stats.drained, 2);
    assert_eq!(stats.enqueued, stats.accounted());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_processor_can_requeue_for_retry() -> anyhow::Result<()> {
    initialize_tracing();

    let delivered: Seen<u32> = Arc::default();
    let recorder = delivered.clone();
    let actor = ActorHandle::create(
        process_with(move |_worker, actor, message: Message| {
            let recorder = recorder.clone();
            async move {
                let attempt = message
                    .downcast::<u32>()
                    .map_err(|other| anyhow::anyhow!("unexpected {other:?}"))?;
                if attempt < 2 {
                    actor.tell(attempt + 1);
                    anyhow::bail!("attempt {attempt} failed, retrying");
                }
                recorder.lock().unwrap().push(attempt);
                anyhow::Ok(Message::new(attempt))
            }
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new_with_name("retrier"),
    );

    actor.tell(0u32);
    assert!(eventually(Duration::from_secs(5), || !delivered.lock().unwrap().is_empty()).await);
    assert!(actor.stop().await.is_empty());

    assert_eq!(*delivered.lock().unwrap(), vec![2]);
    let stats = actor.stats();
    assert_eq!(stats.enqueued, 3);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.succeeded, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_handles_compare_by_identity() -> anyhow::Result<()> {
    initialize_tracing();

    let first = ActorHandle::create(identity(), None::<NoExceptionHandler>, ActorConfig::new_with_name("twin"));
    let second = ActorHandle::create(identity(), None::<NoExceptionHandler>, ActorConfig::new_with_name("twin"));

    assert_eq!(first, first.clone());
    assert_ne!(first, second);
    assert_eq!(first.state(), ActorState::Running);

    let mut set = std::collections::HashSet::new();
    set.insert(first.clone());
    set.insert(first.clone());
    set.insert(second.clone());
    assert_eq!(set.len(), 2);

    first.stop().await;
    second.stop().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unacknowledged_tracks_in_flight_messages() -> anyhow::Result<()> {
    initialize_tracing();

    let gate = Arc::new(Semaphore::new(0));
    let worker_gate = gate.clone();
    let actor = ActorHandle::create(
        process_with(move |_worker, _actor, message: Message| {
            let gate = worker_gate.clone();
            async move {
                gate.acquire().await?.forget();
                anyhow::Ok(message)
            }
        }),
        None::<NoExceptionHandler>,
        ActorConfig::new().with_mailbox_capacity(8),
    );

    actor.queue(1..=3u64);
    assert_eq!(actor.unacknowledged(), 3);

    gate.add_permits(3);
    assert!(eventually(Duration::from_secs(5), || actor.unacknowledged() == 0).await);
    assert_eq!(actor.stats().succeeded, 3);
    assert!(actor.stop().await.is_empty());
    Ok(())
}
