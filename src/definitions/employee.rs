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
use crate::prelude::*;

#[derive(
    Deserialize,
    Serialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
}

fn active() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Getters, DataWriter)]
#[get = "pub"]
pub struct Employee {
    #[writer(skip)]
    id: i64,
    #[serde(default)]
    firstname: String,
    #[serde(default)]
    lastname: String,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    department: String,
    #[serde(default = "active")]
    is_active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_owned()
    }

    pub fn initials(&self) -> String {
        [&self.firstname, &self.lastname]
            .iter()
            .filter_map(|name| name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Entity for Employee {
    const RESOURCE: &'static str = "employees";

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 3,
            "firstname": "Lisa",
            "lastname": "Bauer",
        }))
        .unwrap();

        assert_eq!(&Role::Staff, employee.role());
        assert!(*employee.is_active());
        assert_eq!("", employee.department());
        assert_eq!("Lisa Bauer", employee.full_name());
        assert_eq!("LB", employee.initials());
    }

    #[test]
    fn test_role() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 1,
            "firstname": "anna",
            "role": "manager",
            "is_active": false,
        }))
        .unwrap();

        assert_eq!(&Role::Manager, employee.role());
        assert_eq!("manager", employee.role().to_string());
        assert!(!*employee.is_active());
        assert_eq!("anna", employee.full_name());
        assert_eq!("A", employee.initials());
        assert!(serde_json::from_value::<Employee>(json!({ "id": 1, "role": "boss" })).is_err());
    }
}
