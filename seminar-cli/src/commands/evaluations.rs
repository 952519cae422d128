use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use seminar_core::{Answers, RecordId};
use serde_json::Value;

use crate::CliDesk;
use crate::render::Render;
use crate::utils::tui;

pub async fn submit(
    desk: &CliDesk,
    seminar: &RecordId,
    email: Option<String>,
    answers: &[String],
) -> Result<()> {
    let answers = parse_answers(answers)?;
    let email = email.unwrap_or_else(|| desk.session().current_email().to_string());

    let spinner = tui::create_spinner("Submitting evaluation");
    let result = desk.save_evaluation(seminar, &email, answers).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    let saved = result?;
    println!("{}", saved.data.render());
    println!("   {}", saved.source.render());

    Ok(())
}

pub async fn check(desk: &CliDesk, seminar: &RecordId, email: Option<String>) -> Result<()> {
    let session = desk.session();
    let email = email.unwrap_or_else(|| session.current_email().to_string());

    let spinner = tui::create_spinner("Checking evaluations");
    let evaluated = desk.has_evaluated(seminar, Some(email.as_str())).await;
    spinner.finish_and_clear();
    tui::show_notice(desk);

    if evaluated? {
        println!("{} {} has evaluated seminar #{}", "✓".green(), email, seminar);
    } else {
        println!("{} {} has not evaluated seminar #{}", "✗".red(), email, seminar);
    }

    Ok(())
}

/// Parse `key=value` pairs. Values that read as JSON (numbers, booleans)
/// keep their type; anything else is a string.
fn parse_answers(pairs: &[String]) -> Result<Answers> {
    let mut answers = Answers::new();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Answer '{pair}' is not in key=value form"))?;
        let value = serde_json::from_str::<Value>(value)
            .ok()
            .filter(|v| !v.is_object() && !v.is_array())
            .unwrap_or_else(|| Value::String(value.to_string()));
        answers.insert(key.trim().to_string(), value);
    }

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_answers_keeps_scalar_types() {
        let answers = parse_answers(&[
            "rating=5".to_string(),
            "recommend=true".to_string(),
            "comment=Very clear".to_string(),
        ])
        .unwrap();

        assert_eq!(answers["rating"], json!(5));
        assert_eq!(answers["recommend"], json!(true));
        assert_eq!(answers["comment"], json!("Very clear"));
    }

    #[test]
    fn test_parse_answers_rejects_bare_words() {
        assert!(parse_answers(&["rating".to_string()]).is_err());
    }
}
