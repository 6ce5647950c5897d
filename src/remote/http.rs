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

use crate::config::Config;
use crate::prelude::*;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

/// REST remote speaking to a collection style API (`/{resource}/` and `/{resource}/{id}/`).
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base: String,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base: config.api_url().trim_end_matches('/').to_owned(),
            token: config.token().clone(),
        })
    }

    pub fn collection_url(&self, resource: &str) -> String {
        format!("{}/{}/", self.base, resource)
    }

    pub fn record_url(&self, resource: &str, id: i64) -> String {
        format!("{}/{}/{}/", self.base, resource, id)
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with {}", resource, status);
            return Err(ApplicationError::Status {
                resource: resource.to_owned(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Remote for HttpRemote {
    #[instrument(skip(self))]
    async fn list(&self, resource: &str, filters: &Filters) -> Result<Value> {
        let request = self.client.get(self.collection_url(resource)).query(filters);
        let response = remote_span!(self.send(request, resource), "list").await?;

        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn get(&self, resource: &str, id: i64) -> Result<Value> {
        let request = self.client.get(self.record_url(resource, id));
        let response = remote_span!(self.send(request, resource), "get").await?;

        Ok(response.json().await?)
    }

    #[instrument(skip(self, body))]
    async fn create(&self, resource: &str, body: Value) -> Result<Value> {
        let request = self.client.post(self.collection_url(resource)).json(&body);
        let response = remote_span!(self.send(request, resource), "create").await?;

        Ok(response.json().await?)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, resource: &str, id: i64, patch: Value) -> Result<Value> {
        let request = self.client.patch(self.record_url(resource, id)).json(&patch);
        let response = remote_span!(self.send(request, resource), "update").await?;

        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, resource: &str, id: i64) -> Result<()> {
        let request = self.client.delete(self.record_url(resource, id));
        remote_span!(self.send(request, resource), "delete").await?;

        Ok(())
    }
}
