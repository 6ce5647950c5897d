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

/// Lifecycle of a task. The wire values are the german identifiers the backend uses.
#[derive(
    Deserialize,
    Serialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "nicht_zugewiesen", alias = "nicht-zugewiesen")]
    #[strum(to_string = "nicht_zugewiesen", serialize = "nicht-zugewiesen")]
    Unassigned,
    #[serde(rename = "offen")]
    #[strum(serialize = "offen")]
    Open,
    #[serde(rename = "abgeschlossen")]
    #[strum(serialize = "abgeschlossen")]
    Done,
    #[serde(rename = "archiviert")]
    #[strum(serialize = "archiviert")]
    Archived,
}

impl TaskStatus {
    pub fn color(&self) -> &'static str {
        match self {
            TaskStatus::Unassigned => "#9CA3AF",
            TaskStatus::Open => "#3B82F6",
            TaskStatus::Done => "#22C55E",
            TaskStatus::Archived => "#6B7280",
        }
    }

    pub fn label(&self, locale: &str) -> String {
        t!(format!("status.{}", self).as_str(), locale = locale)
    }
}

#[derive(
    Deserialize,
    Serialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn label(&self, locale: &str) -> String {
        t!(format!("priority.{}", self).as_str(), locale = locale)
    }
}
