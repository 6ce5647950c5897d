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

use super::View;
use crate::definitions::comment::Comment;
use std::cmp::Reverse;
use std::ops::Deref;

/// Comments written on `task_id`, newest first. Comments without a creation time sort last.
pub fn comments_for_task<V>(source: V, task_id: i64) -> impl View<Output = Vec<Comment>>
where
    V: View,
    V::Output: Deref<Target = [Comment]>,
{
    source.map(move |comments| {
        let mut comments: Vec<Comment> = comments
            .iter()
            .filter(|comment| *comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| Reverse((*comment.created_at(), *comment.id())));
        comments
    })
}
