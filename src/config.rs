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
use std::time::Duration;

const PREFIX: &str = "TASKBOARD_";

#[derive(Deserialize, Debug, Clone, Getters)]
#[get = "pub"]
pub struct Config {
    #[serde(default = "default_api_url")]
    api_url: String,
    token: Option<String>,
    #[serde(default = "default_request_timeout")]
    request_timeout: u64,
    #[serde(default = "default_refresh_interval")]
    refresh_interval: u64,
    #[serde(default = "default_locale")]
    locale: String,
    employee: Option<i64>,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_owned()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_locale() -> String {
    "de".to_owned()
}

impl Config {
    /// Reads the configuration from `TASKBOARD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(PREFIX).from_env::<Config>()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(PREFIX).from_iter::<_, Config>(vars)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }
}
