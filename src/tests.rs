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

use crate::date::parse_date;
use crate::remote::MemoryRemote;
use crate::state::ClientState;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

/// The day every suite is opened on.
pub const TODAY: &str = "2025-10-22";

#[derive(Getters)]
#[get = "pub"]
pub struct TestSuite {
    remote: MemoryRemote,
    state: ClientState,
}

impl TestSuite {
    /// A suite with seeded records and empty caches.
    pub fn init() -> Self {
        let remote = MemoryRemote::new();
        remote
            .seed("employees", employees())
            .seed("tasks", tasks())
            .seed("comments", comments())
            .relate("tasks", "employee", "employees")
            .relate("tasks", "tester", "employees");

        let state = ClientState::new(Arc::new(remote.clone()), today());

        Self { remote, state }
    }

    /// A suite whose employee and task caches hold every seeded record.
    pub async fn loaded() -> Self {
        let suite = Self::init();
        suite.state.load().await;
        suite
    }
}

pub fn today() -> NaiveDate {
    parse_date(TODAY).expect("valid date")
}

fn employees() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "firstname": "Anna",
            "lastname": "Schmidt",
            "role": "manager",
            "department": "Marketing",
        }),
        json!({ "id": 2, "firstname": "Max", "lastname": "Müller", "department": "IT" }),
        json!({
            "id": 3,
            "firstname": "Lisa",
            "lastname": "Bauer",
            "department": "Design",
            "is_active": false,
        }),
        json!({
            "id": 4,
            "firstname": "Tom",
            "lastname": "White",
            "role": "admin",
            "department": "IT",
        }),
    ]
}

fn tasks() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Kampagne planen",
            "description": "Herbstkampagne vorbereiten",
            "status": "offen",
            "priority": "high",
            "start_date": "18.10.2025",
            "end_date": "21.10.2025",
            "employee": { "id": 1, "firstname": "Anna", "lastname": "Schmidt" },
            "tester": { "id": 2, "firstname": "Max", "lastname": "Müller" },
            "comments": null,
        }),
        json!({
            "id": 2,
            "title": "Website relaunch",
            "status": "offen",
            "start_date": "2025-10-27",
            "end_date": "2025-11-02",
            "employee": { "id": 1 },
        }),
        json!({
            "id": 3,
            "title": "Server update",
            "status": "abgeschlossen",
            "priority": "low",
            "start_date": "2025-10-01",
            "end_date": "2025-10-05",
            "employee": { "id": 2 },
            "tester": { "id": 4 },
        }),
        json!({
            "id": 4,
            "title": "Logo entwerfen",
            "status": "nicht-zugewiesen",
            "start_date": "2025-10-22",
            "end_date": "2025-10-23",
            "employee": null,
        }),
        json!({
            "id": 5,
            "title": "Datenbank migrieren",
            "status": "offen",
            "priority": "urgent",
            "start_date": "2025-10-23",
            "end_date": "2025-10-23",
            "employee": { "id": 2 },
        }),
    ]
}

fn comments() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "task_id": 1,
            "text": "Bitte bis Freitag",
            "author_id": 2,
            "author_name": "Max Müller",
            "created_at": "2025-10-19T09:00:00Z",
        }),
        json!({
            "id": 2,
            "task_id": 1,
            "text": "Entwurf liegt bereit",
            "author_id": 1,
            "author_name": "Anna Schmidt",
            "created_at": "2025-10-20T14:30:00Z",
        }),
        json!({
            "id": 3,
            "task_id": 3,
            "text": "Erledigt",
            "author_id": 4,
            "author_name": "Tom White",
            "created_at": "2025-10-05T17:00:00Z",
        }),
    ]
}

pub mod prelude {
    pub use crate::tests::{today, TestSuite, TODAY};
}
