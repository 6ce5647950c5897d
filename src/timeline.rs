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

use crate::date;
use crate::definitions::task::Task;
use crate::signal::{Signal, Subscription};
use crate::view::{combine, View};
use chrono::{Datelike, NaiveDate, Weekday};
use std::ops::Deref;

/// Number of day columns shown at once.
pub const WINDOW_LENGTH: usize = 10;
/// Days shown before the focused day.
pub const LEADING_DAYS: i64 = 2;

/// Ten contiguous days around a focused day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[get = "pub"]
pub struct Window {
    focus: NaiveDate,
    columns: Vec<NaiveDate>,
}

impl Window {
    /// The window focused on `focus`. A focus too close to either end of the representable dates
    /// is moved inwards until every column exists.
    pub fn around(focus: NaiveDate) -> Self {
        let (earliest, latest) = focus_range();
        let focus = focus.clamp(earliest, latest);
        let first = date::offset(focus, -LEADING_DAYS).unwrap_or(focus);
        let columns = (0..WINDOW_LENGTH as i64)
            .filter_map(|offset| date::offset(first, offset))
            .collect();

        Self { focus, columns }
    }

    /// The window focused on `focus`, or `None` when `focus` leaves no room for every column.
    pub fn checked_around(focus: NaiveDate) -> Option<Self> {
        let (earliest, latest) = focus_range();
        (earliest..=latest)
            .contains(&focus)
            .then(|| Self::around(focus))
    }

    /// The window whose first column is `first`.
    pub fn starting_at(first: NaiveDate) -> Self {
        Self::around(date::offset(first, LEADING_DAYS).unwrap_or(first))
    }

    pub fn first(&self) -> NaiveDate {
        self.columns.first().copied().unwrap_or(self.focus)
    }

    pub fn last(&self) -> NaiveDate {
        self.columns.last().copied().unwrap_or(self.focus)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first() <= day && day <= self.last()
    }

    pub fn headers(&self, locale: &str) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|day| ColumnHeader {
                date: *day,
                label: day.format("%d.%m").to_string(),
                weekday: weekday_label(day.weekday(), locale),
                is_focus: *day == self.focus,
                is_weekend: matches!(day.weekday(), Weekday::Sat | Weekday::Sun),
            })
            .collect()
    }
}

/// Earliest and latest focus with a full window around it.
fn focus_range() -> (NaiveDate, NaiveDate) {
    let trailing = WINDOW_LENGTH as i64 - 1 - LEADING_DAYS;

    (
        date::offset(NaiveDate::MIN, LEADING_DAYS).unwrap_or(NaiveDate::MIN),
        date::offset(NaiveDate::MAX, -trailing).unwrap_or(NaiveDate::MAX),
    )
}

fn weekday_label(weekday: Weekday, locale: &str) -> String {
    t!(
        format!("weekday.{}", weekday.to_string().to_lowercase()).as_str(),
        locale = locale
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[get = "pub"]
pub struct ColumnHeader {
    date: NaiveDate,
    label: String,
    weekday: String,
    is_focus: bool,
    is_weekend: bool,
}

/// Placement of one task on the grid. Columns are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
#[get = "pub"]
pub struct TaskSpan {
    task: Task,
    grid_column_start: usize,
    grid_column_span: usize,
    is_truncated_left: bool,
    is_truncated_right: bool,
}

/// Lays out the tasks assigned to `employee_id` on `columns`, keeping their order. Tasks
/// entirely outside the columns are left out, tasks reaching past either edge are clipped and
/// flagged.
pub fn layout_for_employee(
    employee_id: i64,
    tasks: &[Task],
    columns: &[NaiveDate],
) -> Vec<TaskSpan> {
    let Some((first, last)) = date::bounds(columns) else {
        return Vec::new();
    };

    tasks
        .iter()
        .filter(|task| task.is_assigned_to(employee_id))
        .filter_map(|task| {
            let start = date::start_column(*task.start_date(), columns)?;
            let end = date::end_column(*task.end_date(), columns)?;
            if end < start {
                debug!("Task {} has no visible span", task.id());
                return None;
            }

            Some(TaskSpan {
                task: task.clone(),
                grid_column_start: start + 1,
                grid_column_span: end - start + 1,
                is_truncated_left: *task.start_date() < first,
                is_truncated_right: *task.end_date() > last,
            })
        })
        .collect()
}

/// The scrollable timeline. The window is rebuilt whenever the focus moves and every layout
/// view follows it.
#[derive(Clone)]
pub struct Timeline {
    window: Signal<Window>,
}

impl Timeline {
    pub fn new(focus: NaiveDate) -> Self {
        Self {
            window: Signal::new(Window::around(focus)),
        }
    }

    pub fn window(&self) -> Window {
        self.window.get()
    }

    pub fn observe(&self) -> Subscription<Window> {
        self.window.subscribe()
    }

    pub fn select_day(&self, day: NaiveDate) {
        self.window.set(Window::around(day));
    }

    pub fn scroll_backward(&self, days: i64) {
        self.shift(days.saturating_neg())
    }

    pub fn scroll_forward(&self, days: i64) {
        self.shift(days)
    }

    /// Moves the focus by `days`. The window stays in place when the new focus is out of range.
    fn shift(&self, days: i64) {
        let shifted = self.window.update(|window| {
            date::offset(window.focus, days).and_then(Window::checked_around)
        });

        if shifted.is_none() {
            warn!("Cannot move the timeline by {} days", days);
        }
    }

    /// Spans of one employee, recomputed when the tasks or the window change.
    pub fn layout_view<V>(&self, tasks: V, employee_id: i64) -> impl View<Output = Vec<TaskSpan>>
    where
        V: View + 'static,
        V::Output: Deref<Target = [Task]> + 'static,
    {
        combine(tasks, self.observe(), move |tasks, window| {
            layout_for_employee(employee_id, tasks, window.columns())
        })
    }
}

/// A month of the overview calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct Calendar {
    year: i32,
    month: u32,
}

impl Calendar {
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year.saturating_sub(1),
                month: 12,
            },
            month => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    pub fn next(&self) -> Self {
        match self.month {
            12 => Self {
                year: self.year.saturating_add(1),
                month: 1,
            },
            month => Self {
                year: self.year,
                month: month + 1,
            },
        }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        date::month_grid(self.year, self.month)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day.year() == self.year && day.month() == self.month
    }
}
