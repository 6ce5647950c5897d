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
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Reference to an entity of another collection, held by id only. The referenced entity is
/// looked up in its own cache when needed and never owned by the referencing entity.
pub struct Relation<T> {
    id: i64,
    target: PhantomData<fn() -> T>,
}

impl<T> Relation<T> {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            target: PhantomData,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl<T: Entity> Relation<T> {
    pub fn resolve<'a>(&self, items: &'a [T]) -> Option<&'a T> {
        items.iter().find(|item| item.id() == self.id)
    }
}

impl<T> From<i64> for Relation<T> {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl<T> Clone for Relation<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Relation<T> {}

impl<T> PartialEq for Relation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Relation<T> {}

impl<T> Debug for Relation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Relation").field(&self.id).finish()
    }
}

impl<'de, T> Deserialize<'de> for Relation<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_value = serde_json::value::Value::deserialize(deserializer)?;

        if let Some(id) = raw_value.as_i64() {
            return Ok(Self::new(id));
        }

        if raw_value.is_object() {
            return raw_value
                .get("id")
                .and_then(serde_json::Value::as_i64)
                .map(Self::new)
                .ok_or(serde::de::Error::custom("Related object without id"));
        }

        Err(serde::de::Error::custom("Invalid datatype"))
    }
}

impl<T> Serialize for Relation<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.id)
    }
}
