use anyhow::Result;
use owo_colors::OwoColorize;
use seminar_core::DeskConfig;

pub fn run(config: &DeskConfig) -> Result<()> {
    let config_path = DeskConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Mirror:   {}", config.data_path().display());
    println!();
    println!("{}", "Backend".bold());
    println!("  API:      {}", config.api_base());
    println!("  Timeout:  {}s", config.request_timeout_secs);

    Ok(())
}
