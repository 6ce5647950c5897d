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

use crate::cache::EntityCache;
use crate::config::Config;
use crate::definitions::comment::Comment;
use crate::definitions::employee::Employee;
use crate::definitions::task::Task;
use crate::prelude::*;
use crate::remote::HttpRemote;
use crate::timeline::{layout_for_employee, TaskSpan, Timeline};
use crate::view::StatusCounts;
use chrono::NaiveDate;
use std::sync::Arc;

/// One cache per entity type plus the timeline, all sharing the same remote. Cloning hands out
/// the same caches.
#[derive(Clone, Getters)]
#[get = "pub"]
pub struct ClientState {
    tasks: EntityCache<Task>,
    employees: EntityCache<Employee>,
    comments: EntityCache<Comment>,
    timeline: Timeline,
}

impl ClientState {
    pub fn new(remote: Arc<dyn Remote>, today: NaiveDate) -> Self {
        Self {
            tasks: EntityCache::new(remote.clone()),
            employees: EntityCache::new(remote.clone()),
            comments: EntityCache::new(remote),
            timeline: Timeline::new(today),
        }
    }

    pub fn from_config(config: &Config, today: NaiveDate) -> Result<Self> {
        let remote = HttpRemote::new(config)?;
        Ok(Self::new(Arc::new(remote), today))
    }

    /// Loads the employees and every task. Comments are loaded per task.
    pub async fn load(&self) {
        tokio::join!(
            self.employees.load(Filters::new()),
            self.tasks.load(Filters::new()),
        );
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::of(&self.tasks.snapshot())
    }

    /// Spans of `employee_id` in the current window, from the cached tasks.
    pub fn layout_for_employee(&self, employee_id: i64) -> Vec<TaskSpan> {
        layout_for_employee(
            employee_id,
            &self.tasks.snapshot(),
            self.timeline.window().columns(),
        )
    }
}
