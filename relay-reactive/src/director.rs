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

use tracing::{trace, warn};

use crate::actor::ActorHandle;

/// Chains `actors` into a pipeline.
///
/// Each actor's outbox is set to the next one, so the first actor becomes the
/// source and the last the sink. The sink's own outbox is left untouched.
/// Outboxes are published atomically, so a worker reads either the old or the
/// new target, never a torn one.
///
/// Rewiring is only supported on freshly created actors. Messages already in
/// flight through an actor being rewired may be routed to either target; a
/// warning is logged when that is the case. Wiring is a plain assignment and
/// is not undone automatically.
pub fn direct(actors: &[&ActorHandle]) {
    for pair in actors.windows(2) {
        let (source, target) = (pair[0], pair[1]);
        if source.unacknowledged() > 0 {
            warn!(
                source = %source.name(),
                outstanding = source.unacknowledged(),
                "Rewiring an actor that still has messages in flight"
            );
        }
        trace!(source = %source.name(), target = %target.name(), "Directing outbox");
        source.set_outbox(Some(target));
    }
}
