/*
 *     Copyright (C) 2023  Fritz Ochsmann
 *
 *     This program is free software: you can redistribute it and/or modify
 *     it under the terms of the GNU Affero General Public License as published
 *     by the Free Software Foundation, either version 3 of the License, or
 *     (at your option) any later version.
 *
 *     This program is distributed in the hope that it will be useful,
 *     but WITHOUT ANY WARRANTY; without even the implied warranty of
 *     MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *     GNU Affero General Public License for more details.
 *
 *     You should have received a copy of the GNU Affero General Public License
 *     along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use kanal::{AsyncReceiver, AsyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A value that can be observed. New subscribers receive the current value immediately and every
/// value published afterwards, in publication order.
pub struct Signal<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    value: T,
    subscribers: Vec<AsyncSender<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn set(&self, value: T) {
        let mut inner = self.lock();
        inner.value = value;
        inner.broadcast();
    }

    /// Derives the next value from the current one. Returning `None` leaves the value untouched
    /// and publishes nothing. The lock is held throughout, so concurrent updates are applied and
    /// delivered one after another.
    pub fn update<F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let mut inner = self.lock();
        let next = f(&inner.value)?;
        inner.value = next.clone();
        inner.broadcast();

        Some(next)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = kanal::unbounded_async();
        let mut inner = self.lock();

        // replay the current value before anything else can be published
        if sender.try_send(inner.value.clone()).is_ok() {
            inner.subscribers.push(sender);
        }

        Subscription { receiver }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|sender| !sender.is_closed() && !sender.is_disconnected());
        inner.subscribers.len()
    }
}

impl<T: Clone> Inner<T> {
    fn broadcast(&mut self) {
        let value = &self.value;
        // dropped subscriptions close their channel, which removes them here
        self.subscribers
            .retain(|sender| sender.try_send(value.clone()).is_ok());
    }
}

/// Receiving end of a [`Signal`]. Dropping it unsubscribes.
pub struct Subscription<T> {
    receiver: AsyncReceiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next published value. Only returns `None` once the signal itself is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await.ok()
    }

    /// Takes the next already published value without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok().flatten()
    }

    /// Skips to the most recent already published value.
    pub fn latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Some(value) = self.try_next() {
            latest = Some(value);
        }
        latest
    }

    pub fn unsubscribe(self) {
        self.receiver.close();
    }
}
