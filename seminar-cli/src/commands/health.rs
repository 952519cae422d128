use anyhow::Result;
use owo_colors::OwoColorize;

use crate::CliDesk;
use crate::utils::tui;

pub async fn run(desk: &CliDesk) -> Result<()> {
    let spinner = tui::create_spinner("Contacting backend");
    let result = desk.health().await;
    spinner.finish_and_clear();

    match result {
        Ok(health) => {
            let storage = health.storage.unwrap_or_else(|| "unknown".into());
            println!(
                "{} {} {}",
                "✓".green(),
                health.status,
                format!("(storage: {storage})").dimmed()
            );
        }
        Err(failure) => {
            println!("{} {}", "✗".red(), failure.to_string().red());
            println!(
                "   {}",
                format!("Local mirror at {}", desk.mirror().path().display()).dimmed()
            );
        }
    }

    Ok(())
}
