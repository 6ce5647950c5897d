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
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// In-process remote keeping every resource as a list of JSON records. Ids are assigned on
/// create, relations written as `{field}_id` are expanded into the related record on the way
/// back, and failures or latency can be scheduled per resource.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    store: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    records: HashMap<String, Vec<Value>>,
    relations: Vec<Relation>,
    failures: HashMap<String, VecDeque<u16>>,
    delays: HashMap<String, VecDeque<Duration>>,
    requests: usize,
}

struct Relation {
    resource: String,
    field: String,
    target: String,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed(&self, resource: &str, records: Vec<Value>) -> &Self {
        self.lock()
            .records
            .entry(resource.to_owned())
            .or_default()
            .extend(records);
        self
    }

    /// Declares that `{field}_id` on `resource` writes refers to a record of `target`.
    pub fn relate(&self, resource: &str, field: &str, target: &str) -> &Self {
        self.lock().relations.push(Relation {
            resource: resource.to_owned(),
            field: field.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    /// Lets the next request on `resource` fail with the given status.
    pub fn fail_next(&self, resource: &str, status: u16) -> &Self {
        self.lock()
            .failures
            .entry(resource.to_owned())
            .or_default()
            .push_back(status);
        self
    }

    /// Delays the response of the next request on `resource`.
    pub fn delay_next(&self, resource: &str, delay: Duration) -> &Self {
        self.lock()
            .delays
            .entry(resource.to_owned())
            .or_default()
            .push_back(delay);
        self
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.lock()
            .records
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> usize {
        self.lock().requests
    }

    /// Counts the request, then waits for a scheduled delay and reports a scheduled failure.
    /// The state is read before the response is produced, so a delayed request observes the
    /// records as they were when it was issued.
    async fn admit(&self, resource: &str) -> Result<()> {
        let (delay, failure) = {
            let mut store = self.lock();
            store.requests += 1;
            let delay = store
                .delays
                .get_mut(resource)
                .and_then(VecDeque::pop_front);
            let failure = store
                .failures
                .get_mut(resource)
                .and_then(VecDeque::pop_front);
            (delay, failure)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match failure {
            Some(status) => Err(ApplicationError::Status {
                resource: resource.to_owned(),
                status,
            }),
            None => Ok(()),
        }
    }

    fn not_found(resource: &str) -> ApplicationError {
        ApplicationError::Status {
            resource: resource.to_owned(),
            status: 404,
        }
    }
}

impl Store {
    fn expand(&self, resource: &str, object: &mut Map<String, Value>) {
        for relation in self.relations.iter().filter(|r| r.resource == resource) {
            let key = format!("{}_id", relation.field);
            let Some(reference) = object.remove(&key) else {
                continue;
            };

            let related = reference
                .as_i64()
                .and_then(|id| {
                    self.records
                        .get(&relation.target)?
                        .iter()
                        .find(|record| record_id(record) == Some(id))
                        .cloned()
                })
                .unwrap_or(Value::Null);
            object.insert(relation.field.clone(), related);
        }
    }
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(string) => Some(string.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(_) => value.get("id").and_then(scalar),
        _ => None,
    }
}

fn matches(record: &Value, key: &str, expected: &str) -> bool {
    let value = record.get(key).or_else(|| {
        key.strip_suffix("_id")
            .and_then(|field| record.get(field))
    });

    value.and_then(scalar).as_deref() == Some(expected)
}

#[async_trait]
impl Remote for MemoryRemote {
    async fn list(&self, resource: &str, filters: &Filters) -> Result<Value> {
        let records = self
            .records(resource)
            .into_iter()
            .filter(|record| {
                filters
                    .iter()
                    .all(|(key, expected)| matches(record, key, expected))
            })
            .collect::<Vec<_>>();
        self.admit(resource).await?;

        Ok(Value::Array(records))
    }

    async fn get(&self, resource: &str, id: i64) -> Result<Value> {
        let record = self
            .records(resource)
            .into_iter()
            .find(|record| record_id(record) == Some(id));
        self.admit(resource).await?;

        record.ok_or_else(|| Self::not_found(resource))
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value> {
        self.admit(resource).await?;

        let Value::Object(mut object) = body else {
            return Err(ApplicationError::Status {
                resource: resource.to_owned(),
                status: 400,
            });
        };

        let mut store = self.lock();
        store.expand(resource, &mut object);

        let records = store.records.entry(resource.to_owned()).or_default();
        let id = records.iter().filter_map(record_id).max().unwrap_or(0) + 1;
        object.insert("id".to_owned(), json!(id));

        let record = Value::Object(object);
        records.push(record.clone());

        Ok(record)
    }

    async fn update(&self, resource: &str, id: i64, patch: Value) -> Result<Value> {
        self.admit(resource).await?;

        let Value::Object(mut patch) = patch else {
            return Err(ApplicationError::Status {
                resource: resource.to_owned(),
                status: 400,
            });
        };

        let mut store = self.lock();
        store.expand(resource, &mut patch);

        let record = store
            .records
            .get_mut(resource)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|record| record_id(record) == Some(id))
            })
            .ok_or_else(|| Self::not_found(resource))?;

        if let Value::Object(object) = &mut *record {
            for (key, value) in patch {
                if key != "id" {
                    object.insert(key, value);
                }
            }
        }

        Ok(record.clone())
    }

    async fn delete(&self, resource: &str, id: i64) -> Result<()> {
        self.admit(resource).await?;

        let mut store = self.lock();
        let records = store
            .records
            .get_mut(resource)
            .ok_or_else(|| Self::not_found(resource))?;
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));

        if records.len() == before {
            return Err(Self::not_found(resource));
        }

        Ok(())
    }
}
