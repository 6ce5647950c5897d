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

#[macro_use]
extern crate serde;
#[macro_use]
extern crate thiserror;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate tracing;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate strum;
#[macro_use]
extern crate rust_i18n;
#[macro_use]
extern crate taskboard_codegen;

i18n!("locales");

pub mod cache;
pub mod config;
pub mod date;
pub mod definitions;
pub mod error;
pub mod remote;
pub mod signal;
pub mod state;
pub mod timeline;
pub mod view;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::remote::{Filters, Remote};
    pub use crate::remote_span;
}
