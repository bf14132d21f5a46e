//! Interactive configuration setup

use dialoguer::{Input, theme::ColorfulTheme};

use crate::config::Config;
use crate::error::Result;

/// Run the init command: prompt for the basics and write the config file.
pub fn run(config_path: Option<&str>) -> Result<()> {
    let existing = Config::load_at(config_path).unwrap_or_default();
    let theme = ColorfulTheme::default();

    let account: String = Input::with_theme(&theme)
        .with_prompt("Account identifier")
        .with_initial_text(existing.account.clone().unwrap_or_default())
        .interact_text()?;

    let region: String = Input::with_theme(&theme)
        .with_prompt("Region")
        .default(existing.region().to_string())
        .interact_text()?;

    let profile: String = Input::with_theme(&theme)
        .with_prompt("Credential profile")
        .default(existing.profile().to_string())
        .interact_text()?;

    let endpoint: String = Input::with_theme(&theme)
        .with_prompt("Provider endpoint")
        .default(existing.endpoint())
        .interact_text()?;

    let mut config = existing;
    config.account = Some(account);
    config.region = Some(region);
    config.profile = Some(profile);
    config.endpoint = Some(endpoint);

    match config_path {
        Some(path) => config.save_to(path.into())?,
        None => config.save()?,
    }

    println!("Configuration saved.");
    Ok(())
}
