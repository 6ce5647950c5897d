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

use crate::cache::{Entity, EntityCache};
use crate::prelude::*;
use chrono::{DateTime, Utc};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Getters, DataWriter)]
#[writer(validate = "validate_write_comment")]
#[get = "pub"]
pub struct Comment {
    #[writer(skip)]
    id: i64,
    task_id: i64,
    text: String,
    #[serde(default)]
    author_id: i64,
    #[writer(skip)]
    #[serde(default)]
    author_name: String,
    #[writer(skip)]
    #[serde(default)]
    task_title: Option<String>,
    #[writer(skip)]
    #[serde(default)]
    is_edited: bool,
    #[writer(skip)]
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[writer(skip)]
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn validate_write_comment(comment: &WriteComment) -> Result<()> {
    match comment.text() {
        Some(text) if text.trim().is_empty() => Err(ApplicationError::Validation(
            "A comment must not be empty".to_owned(),
        )),
        _ => Ok(()),
    }
}

impl Entity for Comment {
    const RESOURCE: &'static str = "comments";

    fn id(&self) -> i64 {
        self.id
    }
}

impl EntityCache<Comment> {
    /// Replaces the cached comments with the ones written on `task_id`.
    pub async fn load_for_task(&self, task_id: i64) {
        self.load(Filters::new().with("task_id", task_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::memory::MemoryRemote;
    use std::sync::Arc;

    #[test]
    fn test_read() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 5,
            "task_id": 2,
            "text": "Looks good",
            "author_id": 1,
            "author_name": "Anna Schmidt",
            "created_at": "2025-10-20T08:30:00Z",
        }))
        .unwrap();

        assert_eq!(2, *comment.task_id());
        assert!(!*comment.is_edited());
        assert!(comment.task_title().is_none());
        assert!(comment.created_at().is_some());
        assert!(comment.updated_at().is_none());
    }

    #[tokio::test]
    async fn test_reject_empty_text() -> Result<()> {
        let remote = MemoryRemote::new();
        let comments = EntityCache::<Comment>::new(Arc::new(remote.clone()));

        let mut writer = WriteComment::from(&comments);
        writer.set_task_id(Some(2)).set_text(Some("   ".to_owned()));
        assert!(matches!(
            writer.await,
            Err(ApplicationError::Validation(_))
        ));
        assert_eq!(0, remote.requests());

        let mut writer = WriteComment::from(&comments);
        writer
            .set_task_id(Some(2))
            .set_text(Some("Done on friday".to_owned()))
            .set_author_id(Some(1));
        let created = writer.await?;

        assert_eq!("Done on friday", created.text());
        assert_eq!(vec![created], comments.snapshot().to_vec());

        Ok(())
    }

    #[tokio::test]
    async fn test_load_for_task() -> Result<()> {
        let remote = MemoryRemote::new();
        remote.seed(
            Comment::RESOURCE,
            vec![
                json!({ "id": 1, "task_id": 1, "text": "first" }),
                json!({ "id": 2, "task_id": 2, "text": "second" }),
                json!({ "id": 3, "task_id": 1, "text": "third" }),
            ],
        );
        let comments = EntityCache::<Comment>::new(Arc::new(remote));

        comments.load_for_task(1).await;
        let ids: Vec<i64> = comments.snapshot().iter().map(Entity::id).collect();
        assert_eq!(vec![1, 3], ids);

        Ok(())
    }
}
