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

//! A three-stage pipeline: Bale repeats every line, Bane answers the ones he
//! recognizes, and the printer writes out whatever reaches it.
//!
//! Run with `cargo run --example batman`.

use std::time::Duration;

use relay_reactive::prelude::*;
use tracing::{info, warn};

/// Bane only has answers for three lines.
#[derive(Debug)]
struct Bane;

#[async_trait]
impl Processor for Bane {
    async fn process(
        &self,
        _worker: WorkerIndex,
        _actor: &ActorHandle,
        message: Message,
    ) -> anyhow::Result<Message> {
        let line = message
            .downcast::<&'static str>()
            .map_err(|other| anyhow::anyhow!("Bane does not understand {other:?}"))?;
        let reply = match line {
            "I AM VENGEANCE" => "I AM INEVITABLE",
            "I AM THE NIGHT" => "I AM BANE",
            "I'M BATMAN" => "I WILL BREAK YOU",
            other => anyhow::bail!("WHATEVER YOU SAY ({other})"),
        };
        Ok(Message::new(reply))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let complain = || {
        handle_with(|worker, actor: ActorHandle, failure| async move {
            warn!(worker, actor = %actor.name(), "{failure}");
        })
    };

    let bale = ActorHandle::create(
        process_with(|_worker, _actor, message: Message| async move { anyhow::Ok(message) }),
        Some(complain()),
        ActorConfig::new_with_name("Bale").with_workers(3),
    );
    let bane = ActorHandle::create(
        Bane,
        Some(complain()),
        ActorConfig::new_with_name("Bane").with_workers(3),
    );
    let printer = ActorHandle::create(
        process_with(|worker, _actor, message: Message| async move {
            info!(worker, "Printer heard {message:?}");
            anyhow::Ok(message)
        }),
        Some(complain()),
        ActorConfig::new_with_name("Printer").with_workers(3),
    );

    direct(&[&bale, &bane, &printer]);

    bale.queue(["I AM VENGEANCE", "I AM THE NIGHT", "I'M BATMAN", "HEY HO!"]);
    tokio::time::sleep(Duration::from_secs(1)).await;

    for actor in [&bale, &bane, &printer] {
        let pending = actor.stop().await;
        info!(actor = %actor.name(), pending = pending.len(), stats = ?actor.stats(), "Stopped");
    }
    Ok(())
}
