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
use std::fmt;
use std::fmt::Debug;

/// A marker trait for values that can travel through an actor's mailbox.
///
/// The trait combines `Any`, `Send`, `Sync` and `Debug` so that messages can
/// cross worker tasks, be logged, and be downcast back to their concrete type.
///
/// A blanket implementation is provided, so any type `T` that satisfies the
/// bounds implements `RelayMessage` without further ceremony.
pub trait RelayMessage: Any + Send + Sync + Debug {
    /// Returns a reference to the message as a dynamic [`Any`] trait object.
    fn as_any(&self) -> &dyn Any;

    /// Converts the boxed message into a boxed [`Any`] for by-value downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T> RelayMessage for T
where
    T: Any + Send + Sync + Debug,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// A type-erased message as stored in a mailbox and handed to processors.
///
/// `Message::new` never nests: wrapping a value that is already a `Message`
/// returns it unchanged, so a processor may re-queue what it received.
pub struct Message(Box<dyn RelayMessage>);

impl Message {
    /// Boxes `message` into a `Message`.
    pub fn new<M: RelayMessage>(message: M) -> Self {
        let mut slot = Some(message);
        if let Some(existing) = (&mut slot as &mut dyn Any).downcast_mut::<Option<Message>>() {
            if let Some(message) = existing.take() {
                return message;
            }
        }
        match slot {
            Some(message) => Self(Box::new(message)),
            None => unreachable!("message slot is only emptied when it already held a Message"),
        }
    }

    /// Returns `true` if the boxed value is of type `T`.
    #[inline]
    #[must_use]
    pub fn is<T: RelayMessage>(&self) -> bool {
        self.inner().as_any().is::<T>()
    }

    /// Returns a reference to the boxed value if it is of type `T`.
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: RelayMessage>(&self) -> Option<&T> {
        self.inner().as_any().downcast_ref::<T>()
    }

    /// Takes the boxed value out if it is of type `T`, otherwise hands the
    /// message back untouched.
    ///
    /// # Errors
    ///
    /// Returns the original `Message` when it does not hold a `T`.
    pub fn downcast<T: RelayMessage>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        match RelayMessage::into_any(self.0).downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("message type was checked before downcasting"),
        }
    }

    // `Box<dyn RelayMessage>` is itself a `RelayMessage`; always dispatch on the contents.
    fn inner(&self) -> &dyn RelayMessage {
        &*self.0
    }
}

impl Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.inner(), f)
    }
}
