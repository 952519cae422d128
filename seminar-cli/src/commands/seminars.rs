use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use seminar_core::sort::{self, SortField, SortOrder};
use seminar_core::{RecordId, Seminar, SeminarDraft};

use crate::render::{Render, pluralize};
use crate::utils::tui;
use crate::{CliDesk, SeminarArgs};

pub async fn list(desk: &CliDesk, sort_by: Option<&str>, order: &str, group: bool) -> Result<()> {
    let order: SortOrder = order.parse()?;
    let field = sort_by.map(str::parse::<SortField>).transpose()?;

    let spinner = tui::create_spinner("Loading seminars");
    let seminars = desk.fetch_seminars().await?;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    if seminars.data.is_empty() {
        println!("{}", "No seminars".dimmed());
        return Ok(());
    }

    if group {
        println!("{}", sort::group_seminars_by_year_semester(&seminars.data).render());
    } else {
        let sorted = match field {
            Some(field) => sort::sort_seminars(&seminars.data, field, order),
            None => sort::sort_seminars_by_year_semester_date(&seminars.data, order),
        };
        for seminar in &sorted {
            println!("{}", seminar.render());
        }
    }

    println!();
    println!(
        "{} {}",
        format!(
            "{} {}",
            seminars.data.len(),
            pluralize("seminar", seminars.data.len())
        )
        .dimmed(),
        seminars.source.render()
    );

    Ok(())
}

pub async fn create(desk: &CliDesk, fields: SeminarArgs) -> Result<()> {
    let spinner = tui::create_spinner("Creating seminar");
    let result = desk.create_seminar(draft_from(fields)).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let created = result?;
    println!("{}", created.data.render());
    println!("   {}", created.source.render());

    Ok(())
}

pub async fn update(desk: &CliDesk, id: RecordId, fields: SeminarArgs) -> Result<()> {
    let mut draft = draft_from(fields);

    // Fields the command line cannot express are carried over from the mirror
    if let Some(existing) = desk
        .mirror()
        .load::<Seminar>()
        .into_iter()
        .find(|s| s.has_id(&id))
    {
        draft.questions = existing.questions;
        draft.metadata = existing.metadata;
        draft.certificate_template_url = existing.certificate_template_url;
    }
    draft.id = Some(id);

    let spinner = tui::create_spinner("Updating seminar");
    let result = desk.update_seminar(draft).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let updated = result?;
    println!("{}", updated.data.render());
    println!("   {}", updated.source.render());

    Ok(())
}

pub async fn delete(desk: &CliDesk, id: Option<RecordId>, force: bool) -> Result<()> {
    if let Some(id) = &id {
        let local = desk
            .mirror()
            .load::<Seminar>()
            .into_iter()
            .find(|s| s.has_id(id));

        if let Some(seminar) = &local {
            println!("{}", seminar.render());
        }

        if !force {
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete seminar #{}?", id))
                .default(false)
                .interact()?;

            if !confirmed {
                return Ok(());
            }
        }
    }

    let spinner = tui::create_spinner("Deleting seminar");
    let result = desk.delete_seminar(id.as_ref()).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let deleted = result?;
    println!("{} {}", "Deleted".red(), deleted.source.render());

    Ok(())
}

pub async fn template(desk: &CliDesk, id: &RecordId, file: &Path) -> Result<()> {
    let seminar = desk.upload_certificate_template(id, file).await?;

    println!("{}", seminar.render());
    println!(
        "   {}",
        format!("Certificate template set from {}", file.display()).dimmed()
    );

    Ok(())
}

fn draft_from(fields: SeminarArgs) -> SeminarDraft {
    SeminarDraft {
        title: fields.title,
        date: fields.date,
        start_time: fields.start,
        end_time: fields.end,
        speaker: fields.speaker,
        duration: fields.duration,
        capacity: fields.capacity,
        semester: fields.semester,
        ..SeminarDraft::default()
    }
}
