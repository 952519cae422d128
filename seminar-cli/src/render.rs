//! Terminal rendering for seminar-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use seminar_core::sort::GroupedSeminars;
use seminar_core::{
    AttendanceRecord, Evaluation, JoinedParticipant, RecordId, Seminar, Semester, Source,
};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Source {
    fn render(&self) -> String {
        match self {
            Source::Remote => "✓ synced".green().to_string(),
            Source::Local(reason) => format!("● {}", reason).yellow().to_string(),
        }
    }
}

impl Render for Option<RecordId> {
    fn render(&self) -> String {
        match self {
            Some(id) if id.is_local() => format!("#{}", short_id(id)).yellow().to_string(),
            Some(id) => format!("#{}", id).dimmed().to_string(),
            None => "#?".dimmed().to_string(),
        }
    }
}

impl Render for Seminar {
    fn render(&self) -> String {
        let mut details = Vec::new();

        if let Some(date) = self.schedule_date() {
            let mut when = date.format("%Y-%m-%d").to_string();
            if let (Some(start), Some(end)) = (&self.start_time, &self.end_time) {
                when = format!("{when} {start} - {end}");
            }
            details.push(when);
        }
        if let Some(speaker) = &self.speaker {
            details.push(format!("by {speaker}"));
        }
        if let Some(capacity) = self.capacity {
            details.push(format!("{capacity} seats"));
        }
        if let Some(duration) = self.duration {
            details.push(format!("{duration} {}", pluralize("hour", duration as usize)));
        }

        format!(
            "{} {} {}",
            self.id.render(),
            self.title.bold(),
            details.join(", ").dimmed()
        )
    }
}

impl Render for AttendanceRecord {
    fn render(&self) -> String {
        let time_in = render_time(self.time_in);
        let time_out = render_time(self.time_out);
        format!("{}  in {}  out {}", self.participant_email, time_in, time_out)
    }
}

impl Render for JoinedParticipant {
    fn render(&self) -> String {
        let name = self
            .participant_name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default();
        let joined = self
            .joined_at
            .map(|at| format!("joined {}", local_time(at)))
            .unwrap_or_default();

        format!("{}{}  {}", self.participant_email, name, joined.dimmed())
    }
}

impl Render for Evaluation {
    fn render(&self) -> String {
        let answers: Vec<String> = self
            .answers
            .iter()
            .map(|(question, answer)| match answer.as_str() {
                Some(text) => format!("{question}: {text}"),
                None => format!("{question}: {answer}"),
            })
            .collect();

        format!("{}  {}", self.participant_email, answers.join(", ").dimmed())
    }
}

impl Render for GroupedSeminars {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for (year, semesters) in self.iter().rev() {
            lines.push(format!("{}", year.bold()));
            for semester in [Semester::Second, Semester::First] {
                let seminars = semesters.get(&semester).map(Vec::as_slice).unwrap_or_default();
                lines.push(format!("  {}", semester_label(semester).cyan()));
                if seminars.is_empty() {
                    lines.push(format!("    {}", "No seminars".dimmed()));
                }
                for seminar in seminars {
                    lines.push(format!("    {}", seminar.render()));
                }
            }
        }

        lines.join("\n")
    }
}

fn semester_label(semester: Semester) -> &'static str {
    match semester {
        Semester::First => "1st semester",
        Semester::Second => "2nd semester",
    }
}

fn short_id(id: &RecordId) -> String {
    id.to_string().chars().take(8).collect()
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %I:%M %p").to_string()
}

fn render_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => local_time(at).green().to_string(),
        None => "-".dimmed().to_string(),
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
