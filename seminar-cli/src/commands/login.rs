use anyhow::Result;
use owo_colors::OwoColorize;

use crate::CliDesk;

pub fn run(desk: &CliDesk, email: String, name: Option<String>, role: Option<String>) -> Result<()> {
    let email = email.trim().to_string();
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }

    let mut session = desk.session();
    session.user_email = Some(email.clone());
    session.participant_email = Some(email.clone());
    if name.is_some() {
        session.participant_name = name;
    }
    if role.is_some() {
        session.user_role = role;
    }
    desk.save_session(&session)?;

    let role = session.user_role.as_deref().unwrap_or("participant");
    println!("Logged in as {} {}", email.bold(), format!("({role})").dimmed());

    Ok(())
}
