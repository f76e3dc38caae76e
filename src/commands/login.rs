use anyhow::Result;
use dialoguer::{Input, Password};

use crate::client::Client;
use crate::render::success_banner;
use crate::session::ClientSession;
use crate::utils::tui::create_spinner;

pub async fn run(
    client: &Client,
    session: &mut ClientSession,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("  Username")
            .allow_empty(true)
            .interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("  Password")
            .allow_empty_password(true)
            .interact()?,
    };

    if username.trim().is_empty() || password.trim().is_empty() {
        anyhow::bail!("Please enter username and password");
    }

    let spinner = create_spinner("Logging in...".into());
    let result = client.admin_login(&username, &password).await;
    spinner.finish_and_clear();
    let token = result?;

    session.token = Some(token);
    session.save()?;

    println!("{}", success_banner(&format!("Logged in as {username}")));
    Ok(())
}

pub fn logout(session: &mut ClientSession) -> Result<()> {
    session.clear();
    session.save()?;
    println!("Logged out.");
    Ok(())
}
