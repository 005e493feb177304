use crossprune_lib::{CrossPruneError, Result, Settings};

pub fn handle_config_command(settings: &Settings) -> Result<()> {
    let rendered = toml::to_string_pretty(&settings.redacted())
        .map_err(|e| CrossPruneError::Config(format!("Failed to render settings: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
