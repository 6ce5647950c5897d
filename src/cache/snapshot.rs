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

use std::ops::Deref;
use std::sync::Arc;

/// An immutable, versioned copy of a cached collection. Cloning is cheap.
#[derive(Debug)]
pub struct Snapshot<T> {
    version: u64,
    items: Arc<Vec<T>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: self.items.clone(),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn empty() -> Self {
        Self {
            version: 0,
            items: Arc::new(Vec::new()),
        }
    }

    /// Successor of this snapshot holding `items`.
    pub fn next(&self, items: Vec<T>) -> Self {
        Self {
            version: self.version + 1,
            items: Arc::new(items),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.items()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions() {
        let empty = Snapshot::<i64>::empty();
        assert_eq!(0, empty.version());
        assert!(empty.is_empty());

        let next = empty.next(vec![1, 2]);
        assert_eq!(1, next.version());
        assert_eq!(&[1, 2], next.items());

        let shared = next.clone();
        assert!(Arc::ptr_eq(&shared.items, &next.items));
        assert_eq!(2, next.next(vec![]).version());
    }
}
