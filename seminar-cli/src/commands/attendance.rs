use anyhow::Result;
use owo_colors::OwoColorize;
use seminar_core::{AttendanceRecord, QrPayload, RecordId, Synced};

use crate::CliDesk;
use crate::render::{Render, pluralize};
use crate::utils::tui;

pub async fn time_in(desk: &CliDesk, seminar: &RecordId, email: Option<String>) -> Result<()> {
    let email = email.unwrap_or_else(|| desk.session().current_email().to_string());

    let spinner = tui::create_spinner("Checking in");
    let result = desk.record_time_in(seminar, &email).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    print_record(&result?);
    Ok(())
}

pub async fn time_out(desk: &CliDesk, seminar: &RecordId, email: Option<String>) -> Result<()> {
    let email = email.unwrap_or_else(|| desk.session().current_email().to_string());

    let spinner = tui::create_spinner("Checking out");
    let result = desk.record_time_out(seminar, &email).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    print_record(&result?);
    Ok(())
}

/// Check in or out with the seminar and participant taken from QR data.
pub async fn scan(desk: &CliDesk, qr: &str, out: bool) -> Result<()> {
    let payload = QrPayload::decode(qr)?;
    println!(
        "{}",
        format!(
            "Seminar #{} for {}",
            payload.seminar_id, payload.participant_email
        )
        .dimmed()
    );

    let email = Some(payload.participant_email);
    if out {
        time_out(desk, &payload.seminar_id, email).await
    } else {
        time_in(desk, &payload.seminar_id, email).await
    }
}

pub async fn list(desk: &CliDesk, seminar: &RecordId) -> Result<()> {
    let spinner = tui::create_spinner("Loading attendance");
    let result = desk.fetch_attendance(seminar).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let records = result?;
    if records.data.is_empty() {
        println!("{}", "No attendance recorded".dimmed());
        return Ok(());
    }

    for record in &records.data {
        println!("{}", record.render());
    }

    let complete = records
        .data
        .iter()
        .filter(|r| r.time_in.is_some() && r.time_out.is_some())
        .count();
    println!();
    println!(
        "{} {}",
        format!(
            "{} {}, {} checked out",
            records.data.len(),
            pluralize("participant", records.data.len()),
            complete
        )
        .dimmed(),
        records.source.render()
    );

    Ok(())
}

fn print_record(record: &Synced<AttendanceRecord>) {
    println!("{}", record.data.render());
    println!("   {}", record.source.render());
}
