use anyhow::Result;
use dialoguer::{Input, Select};
use rollcall_core::model::{AttendanceStatus, Event};

use crate::client::Client;
use crate::form::AttendanceForm;
use crate::render::success_banner;
use crate::utils::tui::create_spinner;

/// Form fields given on the command line; anything missing is prompted for.
#[derive(Debug, Default)]
pub struct SubmitArgs {
    pub roll_number: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// Event id or exact event name
    pub event: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl SubmitArgs {
    fn is_complete(&self) -> bool {
        self.roll_number.is_some()
            && self.full_name.is_some()
            && self.email.is_some()
            && self.event.is_some()
    }
}

pub async fn run(client: &Client, args: SubmitArgs) -> Result<()> {
    let spinner = create_spinner("Loading events...".into());
    let events = client.get_events().await;
    spinner.finish_and_clear();
    let events = events?;

    let interactive = !args.is_complete();

    let roll_number = field(args.roll_number, "  Roll Number")?;
    let full_name = field(args.full_name, "  Full Name")?;
    let email = field(args.email, "  Email")?;

    let event_id = match args.event {
        Some(given) => Some(resolve_event(&events, &given)),
        None if interactive && !events.is_empty() => Some(select_event(&events)?),
        None => None,
    };

    let status = match args.status {
        Some(given) => given.parse::<AttendanceStatus>().map_err(anyhow::Error::msg)?,
        None if interactive => select_status()?,
        None => AttendanceStatus::Present,
    };

    let notes = match args.notes {
        Some(notes) => notes,
        None if interactive => Input::new()
            .with_prompt("  Notes (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
        None => String::new(),
    };

    let form = AttendanceForm {
        roll_number,
        full_name,
        email,
        event_id,
        status,
        notes,
    };
    let submission = form.into_submission()?;

    let spinner = create_spinner("Submitting...".into());
    let result = client.submit_attendance(submission).await;
    spinner.finish_and_clear();
    let message = result?;

    tracing::debug!(%message, "Submission accepted");
    println!(
        "{}",
        success_banner("Thank you for submitting your attendance")
    );

    Ok(())
}

fn field(given: Option<String>, prompt: &str) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Accept an id or an exact name. Unknown values pass through so the
/// server can reject them.
fn resolve_event(events: &[Event], given: &str) -> String {
    events
        .iter()
        .find(|event| event.id == given || event.name == given)
        .map(|event| event.id.clone())
        .unwrap_or_else(|| given.to_string())
}

fn select_event(events: &[Event]) -> Result<String> {
    let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("  Event")
        .items(&names)
        .default(0)
        .interact()?;

    Ok(events[index].id.clone())
}

fn select_status() -> Result<AttendanceStatus> {
    let labels: Vec<&str> = AttendanceStatus::ALL.iter().map(|s| s.as_str()).collect();
    let index = Select::new()
        .with_prompt("  Status")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(AttendanceStatus::ALL[index])
}
