use anyhow::Result;

use crate::config::Config;

/// Print all configured sources and whether their credential resolves.
pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<20} {:<44} HEALTHY", "SOURCE", "STATUS");

    if config.sources.nyt.is_empty() {
        println!("{:<20} {:<44} {}", "nyt", "NOT CONFIGURED", false);
        return Ok(());
    }

    for (name, source) in &config.sources.nyt {
        let (status, healthy) = match source.resolve_api_key() {
            Ok(key) if !key.is_empty() => ("OK".to_string(), true),
            Ok(_) => ("NOT CONFIGURED (api_key is empty)".to_string(), false),
            Err(e) => (format!("NOT CONFIGURED ({e})"), false),
        };
        println!("{:<20} {:<44} {}", format!("nyt:{name}"), status, healthy);
    }

    Ok(())
}
