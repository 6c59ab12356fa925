use countdown_core::{format_mmss, Config};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.presets)?);
        return Ok(());
    }

    if config.presets.is_empty() {
        println!("no presets configured");
        return Ok(());
    }
    for preset in &config.presets {
        println!("{:<12} {}", preset.label, format_mmss(preset.seconds));
    }
    Ok(())
}
