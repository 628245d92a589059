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

//! Capability traits supplied by user code when creating an actor.
//!
//! *   [`Processor`]: turns one message into a result or a failure.
//! *   [`ExceptionHandler`]: reacts to a failure returned by the processor.
//!
//! Both are invoked concurrently from every worker of the actor, so any
//! caller-owned state they touch must be synchronized by the caller.

pub use exception_handler::{handle_with, ExceptionHandler, FnExceptionHandler, NoExceptionHandler};
pub use processor::{process_with, FnProcessor, Processor};

mod exception_handler;
mod processor;
