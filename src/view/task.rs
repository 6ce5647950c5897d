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

use super::{combine, filter_by, View};
use crate::definitions::employee::Employee;
use crate::definitions::relation::Relation;
use crate::definitions::task::{Task, TaskStatus};
use std::collections::{BTreeMap, HashSet};
use std::ops::Deref;
use strum::IntoEnumIterator;

/// Number of tasks per status. Every status is present, with zero when no task has it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<TaskStatus, usize>);

impl StatusCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let mut counts: BTreeMap<TaskStatus, usize> =
            TaskStatus::iter().map(|status| (status, 0)).collect();
        for task in tasks {
            *counts.entry(*task.status()).or_default() += 1;
        }

        Self(counts)
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        self.0.get(&status).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, usize)> + '_ {
        self.0.iter().map(|(status, count)| (*status, *count))
    }
}

/// A task with its relations looked up in the employee collection.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
#[get = "pub"]
pub struct ResolvedTask {
    task: Task,
    employee: Option<Employee>,
    tester: Option<Employee>,
    duration: i64,
}

impl ResolvedTask {
    pub fn resolve(task: &Task, employees: &[Employee]) -> Self {
        let lookup = |relation: &Option<Relation<Employee>>| {
            relation.as_ref()?.resolve(employees).cloned()
        };

        Self {
            employee: lookup(task.employee()),
            tester: lookup(task.tester()),
            duration: task.duration(),
            task: task.clone(),
        }
    }
}

pub fn status_counts<V>(source: V) -> impl View<Output = StatusCounts>
where
    V: View,
    V::Output: Deref<Target = [Task]>,
{
    source.map(|tasks| StatusCounts::of(&tasks))
}

pub fn tasks_by_status<V>(source: V, status: TaskStatus) -> impl View<Output = Vec<Task>>
where
    V: View,
    V::Output: Deref<Target = [Task]>,
{
    filter_by(source, move |task: &Task| *task.status() == status)
}

pub fn tasks_for_employee<V>(source: V, employee_id: i64) -> impl View<Output = Vec<Task>>
where
    V: View,
    V::Output: Deref<Target = [Task]>,
{
    filter_by(source, move |task: &Task| task.is_assigned_to(employee_id))
}

/// Tasks assigned to a member of `department`. Follows changes of the tasks as well as of the
/// employees.
pub fn tasks_by_department<A, B>(
    tasks: A,
    employees: B,
    department: String,
) -> impl View<Output = Vec<Task>>
where
    A: View + 'static,
    B: View + 'static,
    A::Output: Deref<Target = [Task]> + 'static,
    B::Output: Deref<Target = [Employee]> + 'static,
{
    combine(tasks, employees, move |tasks, employees| {
        let members: HashSet<i64> = employees
            .iter()
            .filter(|employee| employee.department() == &department)
            .map(|employee| *employee.id())
            .collect();

        tasks
            .iter()
            .filter(|task| {
                task.employee_id()
                    .map_or(false, |employee_id| members.contains(&employee_id))
            })
            .cloned()
            .collect()
    })
}

pub fn resolved_tasks<A, B>(tasks: A, employees: B) -> impl View<Output = Vec<ResolvedTask>>
where
    A: View + 'static,
    B: View + 'static,
    A::Output: Deref<Target = [Task]> + 'static,
    B::Output: Deref<Target = [Employee]> + 'static,
{
    combine(tasks, employees, |tasks, employees| {
        tasks
            .iter()
            .map(|task| ResolvedTask::resolve(task, employees))
            .collect()
    })
}
