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

use crate::cache::Entity;
use crate::signal::Subscription;
use kanal::{AsyncReceiver, AsyncSender};
use std::ops::Deref;
use tokio::task::JoinHandle;

pub mod comment;
pub mod task;

pub use comment::comments_for_task;
pub use task::{
    resolved_tasks, status_counts, tasks_by_department, tasks_by_status, tasks_for_employee,
    ResolvedTask, StatusCounts,
};

/// A read only projection that yields a freshly computed value whenever one of its sources
/// publishes. Nothing is computed until [`View::next`] is awaited.
#[async_trait]
pub trait View: Send {
    type Output: Send;

    /// Waits for the next value. Returns `None` once the sources are gone.
    async fn next(&mut self) -> Option<Self::Output>;

    fn map<O, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Output) -> O + Send,
        O: Send,
    {
        Map { view: self, f }
    }
}

#[async_trait]
impl<T: Send> View for Subscription<T> {
    type Output = T;

    async fn next(&mut self) -> Option<T> {
        self.recv().await
    }
}

pub struct Map<V, F> {
    view: V,
    f: F,
}

#[async_trait]
impl<V, F, O> View for Map<V, F>
where
    V: View,
    F: FnMut(V::Output) -> O + Send,
    O: Send,
{
    type Output = O;

    async fn next(&mut self) -> Option<O> {
        let value = self.view.next().await?;
        Some((self.f)(value))
    }
}

enum Side<L, R> {
    Left(L),
    Right(R),
}

struct Forwarders(Vec<JoinHandle<()>>);

impl Drop for Forwarders {
    fn drop(&mut self) {
        self.0.iter().for_each(JoinHandle::abort);
    }
}

fn forward<V, S>(mut view: V, sender: AsyncSender<S>, wrap: fn(V::Output) -> S) -> JoinHandle<()>
where
    V: View + 'static,
    S: Send + 'static,
{
    tokio::spawn(async move {
        while let Some(value) = view.next().await {
            if sender.send(wrap(value)).await.is_err() {
                break;
            }
        }
    })
}

/// Latest values of two views merged through a combiner. See [`combine`].
pub struct Combine<L, R, F> {
    receiver: AsyncReceiver<Side<L, R>>,
    left: Option<L>,
    right: Option<R>,
    combiner: F,
    _forwarders: Forwarders,
}

#[async_trait]
impl<L, R, F, O> View for Combine<L, R, F>
where
    L: Send,
    R: Send,
    F: FnMut(&L, &R) -> O + Send,
    O: Send,
{
    type Output = O;

    async fn next(&mut self) -> Option<O> {
        loop {
            match self.receiver.recv().await.ok()? {
                Side::Left(value) => self.left = Some(value),
                Side::Right(value) => self.right = Some(value),
            }

            if let (Some(left), Some(right)) = (&self.left, &self.right) {
                return Some((self.combiner)(left, right));
            }
        }
    }
}

/// Combines the latest values of two views. The first value is produced once both sides have
/// published, every later change of either side produces another one. Both sources are driven
/// by background tasks that stop when the returned view is dropped.
pub fn combine<A, B, F, O>(left: A, right: B, combiner: F) -> Combine<A::Output, B::Output, F>
where
    A: View + 'static,
    B: View + 'static,
    A::Output: 'static,
    B::Output: 'static,
    F: FnMut(&A::Output, &B::Output) -> O + Send,
    O: Send,
{
    let (sender, receiver) = kanal::unbounded_async();
    let forwarders = Forwarders(vec![
        forward(left, sender.clone(), Side::Left),
        forward(right, sender, Side::Right),
    ]);

    Combine {
        receiver,
        left: None,
        right: None,
        combiner,
        _forwarders: forwarders,
    }
}

/// Keeps the items matching `predicate`, in source order. Every source value is evaluated in
/// full.
pub fn filter_by<V, T, P>(source: V, predicate: P) -> impl View<Output = Vec<T>>
where
    V: View,
    V::Output: Deref<Target = [T]>,
    T: Clone + Send,
    P: Fn(&T) -> bool + Send,
{
    source.map(move |items| items.iter().filter(|item| predicate(item)).cloned().collect())
}

pub fn find_by_id<V, T>(source: V, id: i64) -> impl View<Output = Option<T>>
where
    V: View,
    V::Output: Deref<Target = [T]>,
    T: Entity,
{
    source.map(move |items| items.iter().find(|item| item.id() == id).cloned())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::signal::Signal;
    use std::time::Duration;

    /// Reads from `view` until `accept` matches, failing after a second.
    pub(crate) async fn until<V, P>(view: &mut V, accept: P) -> Option<V::Output>
    where
        V: View,
        P: Fn(&V::Output) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(1), async {
            while let Some(value) = view.next().await {
                if accept(&value) {
                    return Some(value);
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
    }

    #[tokio::test]
    async fn test_map_and_filter() -> Result<()> {
        let signal = Signal::new(vec![1, 2, 3, 4]);
        let mut even = filter_by(signal.subscribe(), |value: &i32| value % 2 == 0);
        assert_eq!(Some(vec![2, 4]), even.next().await);

        signal.set(vec![6, 5, 8]);
        assert_eq!(Some(vec![6, 8]), even.next().await);

        let mut sizes = signal.subscribe().map(|values| values.len());
        assert_eq!(Some(3), sizes.next().await);

        Ok(())
    }

    #[tokio::test]
    async fn test_combine_latest() -> Result<()> {
        let numbers = Signal::new(1);
        let words = Signal::new("a".to_owned());
        let mut combined = combine(numbers.subscribe(), words.subscribe(), |n, w| {
            format!("{}{}", w, n)
        });

        assert_eq!(Some("a1".to_owned()), combined.next().await);

        numbers.set(2);
        assert_eq!(Some("a2".to_owned()), until(&mut combined, |v| v == "a2").await);

        words.set("b".to_owned());
        assert_eq!(Some("b2".to_owned()), until(&mut combined, |v| v == "b2").await);

        Ok(())
    }

    #[tokio::test]
    async fn test_combine_waits_for_both_sides() -> Result<()> {
        let numbers = Signal::new(1);
        let other = Signal::new(0);
        let mut subscription = other.subscribe();
        // drain the replayed value so the right side stays silent
        assert_eq!(Some(0), subscription.try_next());

        let mut combined = combine(numbers.subscribe(), subscription, |a, b| a + b);
        let pending = tokio::time::timeout(Duration::from_millis(50), combined.next()).await;
        assert!(pending.is_err());

        other.set(10);
        assert_eq!(Some(11), combined.next().await);

        Ok(())
    }

    #[tokio::test]
    async fn test_dropping_combine_unsubscribes() -> Result<()> {
        let numbers = Signal::new(1);
        let words = Signal::new(2);
        let mut combined = combine(numbers.subscribe(), words.subscribe(), |a, b| a * b);
        assert_eq!(Some(2), combined.next().await);
        assert_eq!(1, numbers.subscriber_count());

        drop(combined);
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        numbers.set(3);
        assert_eq!(0, numbers.subscriber_count());

        Ok(())
    }
}
