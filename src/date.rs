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

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Parses either `DD.MM.YYYY` or `YYYY-MM-DD` into a date without time of day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    let parts = if value.contains('.') {
        let mut split = value.split('.');
        let (day, month, year) = (split.next()?, split.next()?, split.next()?);
        if split.next().is_some() {
            return None;
        }
        (year, month, day)
    } else if value.contains('-') {
        let mut split = value.split('-');
        let (year, month, day) = (split.next()?, split.next()?, split.next()?);
        if split.next().is_some() {
            return None;
        }
        (year, month, day)
    } else {
        return None;
    };

    let year = parts.0.parse::<i32>().ok()?;
    let month = parts.1.parse::<u32>().ok()?;
    let day = parts.2.parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Inclusive day count of the range, `None` when `end` precedes `start`.
pub fn duration(start: NaiveDate, end: NaiveDate) -> Option<i64> {
    let days = (end - start).num_days();
    (days >= 0).then_some(days + 1)
}

pub fn duration_between(start: &str, end: &str) -> Option<i64> {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => duration(start, end),
        _ => {
            warn!("Invalid date format: start={:?} end={:?}", start, end);
            None
        }
    }
}

/// `day` moved by `days`, `None` when the result is not representable.
pub fn offset(day: NaiveDate, days: i64) -> Option<NaiveDate> {
    let distance = Days::new(days.unsigned_abs());
    if days < 0 {
        day.checked_sub_days(distance)
    } else {
        day.checked_add_days(distance)
    }
}

/// Exact position of `date` inside `columns`.
pub fn column_index(date: NaiveDate, columns: &[NaiveDate]) -> Option<usize> {
    columns.iter().position(|column| *column == date)
}

/// Column a task starting at `date` begins in. Starts before the window clip to the first
/// column, starts after the window are invisible.
pub fn start_column(date: NaiveDate, columns: &[NaiveDate]) -> Option<usize> {
    let (first, last) = bounds(columns)?;

    if date < first {
        Some(0)
    } else if date > last {
        None
    } else {
        column_index(date, columns)
    }
}

/// Column a task ending at `date` ends in. Ends after the window clip to the last column,
/// ends before the window are invisible.
pub fn end_column(date: NaiveDate, columns: &[NaiveDate]) -> Option<usize> {
    let (first, last) = bounds(columns)?;

    if date > last {
        Some(columns.len() - 1)
    } else if date < first {
        None
    } else {
        column_index(date, columns)
    }
}

pub(crate) fn bounds(columns: &[NaiveDate]) -> Option<(NaiveDate, NaiveDate)> {
    Some((*columns.first()?, *columns.last()?))
}

/// Monday-first calendar grid of a month: the trailing days of the previous month that fill up
/// the first week, followed by every day of the month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let leading = first.weekday().num_days_from_monday() as i64;

    let mut days = (1..=leading)
        .rev()
        .filter_map(|distance| offset(first, -distance))
        .collect::<Vec<_>>();

    let mut current = Some(first);
    while let Some(day) = current.filter(|day| day.month() == month) {
        days.push(day);
        current = offset(day, 1);
    }

    days
}

/// Deserializes a date given in either supported textual format.
pub fn deserialize_flexible<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(raw.as_str())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date {raw:?}")))
}
