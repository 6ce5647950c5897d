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
use serde_json::Value;
use std::collections::BTreeMap;

pub mod http;
pub mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

/// Query parameters of a collection request. Empty values are dropped.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.0.insert(key.into(), value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The persistent store behind the caches. Resources are addressed by name (`tasks`,
/// `employees`, `comments`), entities travel as JSON.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn list(&self, resource: &str, filters: &Filters) -> Result<Value>;

    async fn get(&self, resource: &str, id: i64) -> Result<Value>;

    async fn create(&self, resource: &str, body: Value) -> Result<Value>;

    async fn update(&self, resource: &str, id: i64, patch: Value) -> Result<Value>;

    async fn delete(&self, resource: &str, id: i64) -> Result<()>;
}

#[macro_export]
macro_rules! remote_span {
    ($expr: expr) => {{
        use ::tracing::Instrument;
        $expr.instrument(::tracing::info_span!("Remote Request"))
    }};
    ($expr: expr, $title: expr) => {{
        use ::tracing::Instrument;
        $expr.instrument(::tracing::info_span!(concat!("Remote Request: ", $title)))
    }};
}
