use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use rollcall_core::model::DashboardData;

use crate::client::Client;
use crate::commands::POLL_INTERVAL_SECS;
use crate::filter::RecordFilter;
use crate::render::{Render, error_banner, render_table, showing_line};
use crate::session::ClientSession;

pub async fn run(
    client: &Client,
    session: &ClientSession,
    filter: &RecordFilter,
    watch: bool,
) -> Result<()> {
    let token = session.require_token()?;

    if !watch {
        let data = client.get_dashboard_data(token).await?;
        print_dashboard(&data, filter);
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        // Clear screen and move the cursor home between refreshes
        print!("\x1B[2J\x1B[H");

        match client.get_dashboard_data(token).await {
            Ok(data) => print_dashboard(&data, filter),
            Err(e) => println!("{}", error_banner(&e.to_string())),
        }

        println!(
            "\n{}",
            format!("Refreshing every {POLL_INTERVAL_SECS}s, Ctrl+C to stop").dimmed()
        );
    }

    Ok(())
}

fn print_dashboard(data: &DashboardData, filter: &RecordFilter) {
    let records = filter.apply(&data.records);

    println!("{}\n", data.render());

    if records.is_empty() {
        println!("{}", "No records found".dimmed());
    } else {
        for line in render_table(&records) {
            println!("{line}");
        }
    }

    println!("\n{}", showing_line(records.len(), data.total_count).dimmed());
}
