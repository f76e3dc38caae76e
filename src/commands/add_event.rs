use anyhow::Result;

use crate::client::Client;
use crate::render::{Render, success_banner};
use crate::session::ClientSession;

pub async fn run(client: &Client, session: &ClientSession, name: &str) -> Result<()> {
    let token = session.require_token()?;
    let name = name.trim();

    if name.is_empty() {
        anyhow::bail!("Event name required");
    }

    let event = client.add_event(token, name).await?;
    println!("{}", success_banner(&format!("Added {}", event.render())));

    Ok(())
}
