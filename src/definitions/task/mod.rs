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
use crate::date;
use crate::definitions::comment::Comment;
use crate::definitions::employee::Employee;
use crate::definitions::relation::Relation;
use crate::prelude::*;
use chrono::{DateTime, NaiveDate, Utc};

pub mod state;

pub use state::{TaskPriority, TaskStatus};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, DataWriter)]
#[serde(try_from = "TaskRecord")]
#[writer(validate = "validate_write_task")]
#[get = "pub"]
pub struct Task {
    #[writer(skip)]
    id: i64,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[writer(rename = "employee_id")]
    employee: Option<Relation<Employee>>,
    #[writer(rename = "tester_id")]
    tester: Option<Relation<Employee>>,
    #[writer(skip)]
    comments: Vec<Comment>,
    #[writer(skip)]
    version: Option<String>,
    #[writer(skip)]
    created_at: Option<DateTime<Utc>>,
    #[writer(skip)]
    updated_at: Option<DateTime<Utc>>,
}

/// A task as the remote sends it. Only records with a valid date range become a [`Task`].
#[derive(Deserialize)]
struct TaskRecord {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(deserialize_with = "date::deserialize_flexible")]
    start_date: NaiveDate,
    #[serde(deserialize_with = "date::deserialize_flexible")]
    end_date: NaiveDate,
    #[serde(default)]
    employee: Option<Relation<Employee>>,
    #[serde(default)]
    tester: Option<Relation<Employee>>,
    #[serde(default)]
    comments: Option<Vec<Comment>>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = ApplicationError;

    fn try_from(record: TaskRecord) -> Result<Self> {
        if record.end_date < record.start_date {
            return Err(ApplicationError::Validation(format!(
                "Task {} ends on {} before it starts on {}",
                record.id, record.end_date, record.start_date
            )));
        }

        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description.unwrap_or_default(),
            status: record.status,
            priority: record.priority,
            start_date: record.start_date,
            end_date: record.end_date,
            employee: record.employee,
            tester: record.tester,
            comments: record.comments.unwrap_or_default(),
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

fn validate_write_task(task: &WriteTask) -> Result<()> {
    if let Some(title) = task.title() {
        if title.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "A task needs a title".to_owned(),
            ));
        }
    }

    // a patch carrying one date is checked against the other date of the cached task
    let cached = task.target().and_then(|id| task.cache().find(id));
    let start = task
        .start_date()
        .or_else(|| cached.as_ref().map(|cached| cached.start_date));
    let end = task
        .end_date()
        .or_else(|| cached.as_ref().map(|cached| cached.end_date));

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApplicationError::Validation(format!(
                "The end date {} is before the start date {}",
                end, start
            )));
        }
    }

    Ok(())
}

impl Task {
    /// Inclusive number of days the task spans.
    pub fn duration(&self) -> i64 {
        date::duration(self.start_date, self.end_date).unwrap_or_default()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    pub fn status_color(&self) -> &'static str {
        self.status.color()
    }

    pub fn employee_id(&self) -> Option<i64> {
        self.employee.as_ref().map(Relation::id)
    }

    pub fn tester_id(&self) -> Option<i64> {
        self.tester.as_ref().map(Relation::id)
    }

    pub fn is_assigned_to(&self, employee_id: i64) -> bool {
        self.employee_id() == Some(employee_id)
    }
}

impl Entity for Task {
    const RESOURCE: &'static str = "tasks";

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EntityCache;
    use crate::remote::memory::MemoryRemote;
    use crate::tests::TestSuite;
    use std::sync::Arc;

    fn day(value: &str) -> NaiveDate {
        date::parse_date(value).unwrap()
    }

    #[test]
    fn test_read() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Quarterly report",
            "description": null,
            "status": "nicht-zugewiesen",
            "priority": "high",
            "start_date": "20.10.2025",
            "end_date": "2025-10-24",
            "employee": { "id": 3, "firstname": "Lisa", "lastname": "Bauer" },
            "tester": 4,
            "comments": null,
        }))
        .unwrap();

        assert_eq!(TaskStatus::Unassigned, *task.status());
        assert_eq!(TaskPriority::High, *task.priority());
        assert_eq!("", task.description());
        assert!(task.comments().is_empty());
        assert_eq!(Some(3), task.employee_id());
        assert_eq!(Some(4), task.tester_id());
        assert_eq!(5, task.duration());
        assert_eq!("#9CA3AF", task.status_color());
        assert!(task.is_assigned_to(3));
        assert!(!task.is_overdue(day("2025-10-24")));
        assert!(task.is_overdue(day("2025-10-25")));

        let written = serde_json::to_value(&task).unwrap();
        assert_eq!(json!("2025-10-20"), written["start_date"]);
        assert_eq!(json!(3), written["employee"]);
        assert_eq!(task, serde_json::from_value::<Task>(written).unwrap());
    }

    #[test]
    fn test_reject_invalid_records() {
        let inverted = json!({
            "id": 1,
            "start_date": "2025-10-24",
            "end_date": "2025-10-20",
        });
        assert!(serde_json::from_value::<Task>(inverted).is_err());

        let malformed = json!({
            "id": 1,
            "start_date": "24/10/2025",
            "end_date": "2025-10-20",
        });
        assert!(serde_json::from_value::<Task>(malformed).is_err());

        let single_day: Task = serde_json::from_value(json!({
            "id": 1,
            "start_date": "2025-10-20",
            "end_date": "2025-10-20",
        }))
        .unwrap();
        assert_eq!(1, single_day.duration());
        assert_eq!(TaskStatus::Unassigned, *single_day.status());
        assert_eq!(TaskPriority::Medium, *single_day.priority());
    }

    #[tokio::test]
    async fn test_write_validation() -> Result<()> {
        let remote = MemoryRemote::new();
        remote.relate(Task::RESOURCE, "employee", "employees").seed(
            "employees",
            vec![json!({ "id": 1, "firstname": "Anna", "lastname": "Schmidt" })],
        );
        let tasks = EntityCache::<Task>::new(Arc::new(remote.clone()));

        let mut writer = WriteTask::from(&tasks);
        writer
            .set_title(Some("Report".to_owned()))
            .set_start_date(Some(day("2025-10-24")))
            .set_end_date(Some(day("2025-10-20")));
        assert!(matches!(
            writer.await,
            Err(ApplicationError::Validation(_))
        ));
        assert_eq!(0, remote.requests());
        assert!(tasks.snapshot().is_empty());

        let mut writer = WriteTask::from(&tasks);
        writer
            .set_title(Some("Report".to_owned()))
            .set_description(Some(String::new()))
            .set_status(Some(TaskStatus::Open))
            .set_start_date(Some(day("2025-10-20")))
            .set_end_date(Some(day("2025-10-22")))
            .set_employee(Some(Some(Relation::new(1))));
        let created = writer.await?;

        assert_eq!(Some(1), created.employee_id());
        assert_eq!(3, created.duration());
        assert_eq!(vec![created.clone()], tasks.snapshot().to_vec());

        // a single date is checked against the cached task
        let mut writer = WriteTask::from(&tasks);
        writer
            .set_target(Some(created.id))
            .set_end_date(Some(day("2025-10-21")))
            .set_employee(Some(None));
        let updated = writer.await?;

        assert_eq!(None, updated.employee_id());
        assert_eq!(2, updated.duration());
        assert_eq!("Report", updated.title());

        Ok(())
    }

    #[tokio::test]
    async fn test_reject_single_date_patch_before_start() -> Result<()> {
        let suite = TestSuite::loaded().await;
        let tasks = suite.state().tasks();
        let requests = suite.remote().requests();

        let mut writer = WriteTask::from(tasks);
        writer
            .set_target(Some(1))
            .set_end_date(Some(day("2025-10-01")));
        assert!(matches!(
            writer.await,
            Err(ApplicationError::Validation(_))
        ));

        let mut writer = WriteTask::from(tasks);
        writer
            .set_target(Some(1))
            .set_start_date(Some(day("2025-10-30")));
        assert!(matches!(
            writer.await,
            Err(ApplicationError::Validation(_))
        ));

        assert_eq!(requests, suite.remote().requests());
        let stored = suite
            .remote()
            .records(Task::RESOURCE)
            .into_iter()
            .find(|record| record["id"] == json!(1))
            .unwrap_or_default();
        assert_eq!(json!("21.10.2025"), stored["end_date"]);

        // still a valid range once the cached start date is taken into account
        let mut writer = WriteTask::from(tasks);
        writer.set_target(Some(1)).set_end_date(Some(day("2025-10-19")));
        let updated = writer.await?;
        assert_eq!(2, updated.duration());
        assert_eq!(Some(updated), tasks.find(1));

        Ok(())
    }
}
