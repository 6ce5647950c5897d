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

use crate::prelude::*;
use crate::signal::{Signal, Subscription};
use crate::view::{self, View};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub mod snapshot;

pub use snapshot::Snapshot;

/// A record kept in an [`EntityCache`].
pub trait Entity: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Name of the remote resource holding the records.
    const RESOURCE: &'static str;

    fn id(&self) -> i64;
}

/// Checks a write body before it is sent to the remote.
pub trait Validate {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl Validate for Value {}

fn decode<D: DeserializeOwned>(value: Value) -> Result<D> {
    Ok(serde_json::from_value(value)?)
}

/// The authoritative in-memory copy of one remote resource.
///
/// Clones share the same state, so a cache is constructed once per entity type and handed to
/// every consumer. Writes go to the remote first and only patch the cached snapshot once the
/// remote confirmed them.
pub struct EntityCache<T> {
    remote: Arc<dyn Remote>,
    snapshot: Signal<Snapshot<T>>,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

impl<T> Clone for EntityCache<T> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            snapshot: self.snapshot.clone(),
            loading: self.loading.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T: Entity> EntityCache<T> {
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self {
            remote,
            snapshot: Signal::new(Snapshot::empty()),
            loading: Signal::new(false),
            error: Signal::new(None),
        }
    }

    /// Replaces the snapshot with the remote collection matching `filters`. Failures are kept in
    /// the error slot and leave the previous snapshot in place. Concurrent loads are not
    /// coalesced, the response arriving last wins.
    #[instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn load(&self, filters: Filters) {
        self.loading.set(true);
        self.error.set(None);

        match self.fetch_all(&filters).await {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), T::RESOURCE);
                self.snapshot.update(|current| Some(current.next(items)));
            }
            Err(error) => {
                error!("Error loading {}: {}", T::RESOURCE, error);
                self.error
                    .set(Some(format!("Failed to load {}: {}", T::RESOURCE, error)));
            }
        }

        self.loading.set(false);
    }

    pub async fn refresh(&self, filters: Filters) {
        self.load(filters).await
    }

    /// Decodes every record on its own, so a single malformed record does not hide the rest of
    /// the collection.
    async fn fetch_all(&self, filters: &Filters) -> Result<Vec<T>> {
        let records: Vec<Value> = decode(self.remote.list(T::RESOURCE, filters).await?)?;

        Ok(records
            .into_iter()
            .filter_map(|record| match decode::<T>(record) {
                Ok(item) => Some(item),
                Err(error) => {
                    warn!("Skipping malformed {} record: {}", T::RESOURCE, error);
                    None
                }
            })
            .collect())
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.get()
    }

    pub fn observe(&self) -> Subscription<Snapshot<T>> {
        self.snapshot.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub fn observe_loading(&self) -> Subscription<bool> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn observe_error(&self) -> Subscription<Option<String>> {
        self.error.subscribe()
    }

    /// The cached entity with `id`, without consulting the remote.
    pub fn find(&self, id: i64) -> Option<T> {
        self.snapshot().iter().find(|item| item.id() == id).cloned()
    }

    /// Live lookup re-evaluated on every snapshot.
    pub fn get_by_id(&self, id: i64) -> impl View<Output = Option<T>> {
        view::find_by_id(self.observe(), id)
    }

    /// Fetches a single entity from the remote without touching the snapshot.
    #[instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<T>> {
        match self.remote.get(T::RESOURCE, id).await {
            Ok(value) => Ok(Some(decode(value)?)),
            Err(error) if error.status() == Some(404) => Ok(None),
            Err(error) => Err(error),
        }
    }

    #[instrument(skip_all, fields(resource = T::RESOURCE))]
    pub async fn create<B>(&self, body: &B) -> Result<T>
    where
        B: Serialize + Validate + Sync + ?Sized,
    {
        body.validate()?;
        let body = serde_json::to_value(body)?;

        let created = match self
            .remote
            .create(T::RESOURCE, body)
            .await
            .and_then(decode::<T>)
        {
            Ok(created) => created,
            Err(error) => {
                error!("Failed to create {}: {}", T::RESOURCE, error);
                return Err(error);
            }
        };

        self.snapshot.update(|current| {
            let mut items = current.to_vec();
            match items.iter().position(|item| item.id() == created.id()) {
                Some(index) => items[index] = created.clone(),
                None => items.push(created.clone()),
            }
            Some(current.next(items))
        });
        info!("Created {} {}", T::RESOURCE, created.id());

        Ok(created)
    }

    /// Sends a partial patch. The confirmed entity replaces the cached one with the same id; when
    /// the snapshot holds no such entity the confirmed write is not reflected in the cache.
    #[instrument(skip(self, patch), fields(resource = T::RESOURCE))]
    pub async fn update<B>(&self, id: i64, patch: &B) -> Result<T>
    where
        B: Serialize + Validate + Sync + ?Sized,
    {
        patch.validate()?;
        let patch = serde_json::to_value(patch)?;

        let updated = match self
            .remote
            .update(T::RESOURCE, id, patch)
            .await
            .and_then(decode::<T>)
        {
            Ok(updated) => updated,
            Err(error) => {
                error!("Failed to update {} {}: {}", T::RESOURCE, id, error);
                return Err(error);
            }
        };

        let published = self.snapshot.update(|current| {
            let index = current.iter().position(|item| item.id() == id)?;
            let mut items = current.to_vec();
            items[index] = updated.clone();
            Some(current.next(items))
        });

        if published.is_none() {
            warn!(
                "{} {} is not cached, the confirmed update is dropped from the cache",
                T::RESOURCE,
                id
            );
        }

        Ok(updated)
    }

    #[instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        if let Err(error) = self.remote.delete(T::RESOURCE, id).await {
            error!("Failed to delete {} {}: {}", T::RESOURCE, id, error);
            return Err(error);
        }

        self.snapshot.update(|current| {
            let items = current
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect();
            Some(current.next(items))
        });

        Ok(())
    }
}
