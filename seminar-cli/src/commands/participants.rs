use anyhow::Result;
use owo_colors::OwoColorize;
use seminar_core::{RecordId, Registration};
use serde_json::{Map, Value};

use crate::CliDesk;
use crate::render::{Render, pluralize};
use crate::utils::tui;

/// Join details from the command line. Missing values come from the session.
pub struct Join {
    pub email: Option<String>,
    pub name: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
}

pub async fn join(desk: &CliDesk, seminar: &RecordId, join: Join) -> Result<()> {
    let session = desk.session();

    let mut metadata = Map::new();
    if let Some(year) = join.year.or(session.participant_year.clone()) {
        metadata.insert("year".into(), Value::String(year));
    }
    if let Some(section) = join.section.or(session.participant_section.clone()) {
        metadata.insert("section".into(), Value::String(section));
    }

    let registration = Registration {
        participant_email: join
            .email
            .unwrap_or_else(|| session.current_email().to_string()),
        participant_name: join.name.or(session.participant_name.clone()),
        metadata: (!metadata.is_empty()).then_some(Value::Object(metadata)),
    };

    let spinner = tui::create_spinner("Joining seminar");
    let result = desk.join_seminar(seminar, registration).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let joined = result?;
    println!("{}", joined.data.render());
    println!("   {}", joined.source.render());

    Ok(())
}

pub async fn list(desk: &CliDesk, seminar: &RecordId) -> Result<()> {
    let spinner = tui::create_spinner("Loading participants");
    let result = desk.fetch_joined_participants(seminar).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let participants = result?;
    if participants.data.is_empty() {
        println!("{}", "No participants".dimmed());
        return Ok(());
    }

    for participant in &participants.data {
        println!("{}", participant.render());
    }

    println!();
    println!(
        "{} {}",
        format!(
            "{} {}",
            participants.data.len(),
            pluralize("participant", participants.data.len())
        )
        .dimmed(),
        participants.source.render()
    );

    Ok(())
}
