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
extern crate tracing;

use chrono::Local;
use taskboard::config::Config;
use taskboard::prelude::*;
use taskboard::state::ClientState;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = ClientState::from_config(&config, Local::now().date_naive())?;
    info!("Connecting to {}", config.api_url());

    state.employees().load(Filters::new()).await;
    if let Some(error) = state.employees().error() {
        warn!("{}", error);
    }

    let (sender, receiver) = kanal::unbounded_async::<()>();

    let refresh = {
        let state = state.clone();
        let config = config.clone();

        tokio::spawn(async move {
            loop {
                state.tasks().refresh(Filters::new()).await;
                report(&state, &config);

                tokio::select! {
                    _ = tokio::time::sleep(config.interval()) => {},
                    _ = receiver.recv() => {
                        warn!("Received shutdown signal on kanal receiver");
                        break;
                    }
                }
            }
        })
    };

    match tokio::signal::ctrl_c().await {
        Ok(()) => {}
        Err(error) => error!("Unable to listen for shutdown signal: {}", error),
    }

    info!("Received shutdown signal... Shutting down...");
    sender.send(()).await?;
    refresh.await?;

    Ok(())
}

fn report(state: &ClientState, config: &Config) {
    if let Some(error) = state.tasks().error() {
        error!("{}", error);
        return;
    }

    let counts = state.status_counts();
    for (status, count) in counts.iter() {
        info!("{}: {}", status.label(config.locale()), count);
    }

    let Some(employee_id) = *config.employee() else {
        return;
    };

    let window = state.timeline().window();
    let headers = window
        .headers(config.locale())
        .iter()
        .map(|header| format!("{} {}", header.weekday(), header.label()))
        .collect::<Vec<_>>();
    info!("Timeline of employee {}: {}", employee_id, headers.join(" | "));

    for span in state.layout_for_employee(employee_id) {
        info!(
            "{:<3} {:<40} column {} span {}{}{}",
            span.task().id(),
            span.task().title(),
            span.grid_column_start(),
            span.grid_column_span(),
            if *span.is_truncated_left() { " <" } else { "" },
            if *span.is_truncated_right() { " >" } else { "" },
        );
    }
}
