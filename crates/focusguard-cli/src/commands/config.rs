use clap::Subcommand;
use focusguard_core::{Config, FocusPreset};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "focus.default_preset", "focus.tick_interval_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (presets: classic, deepwork, sprint; intervals in ms, > 0)
        value: String,
    },
    /// List all config values as `key = value`
    List,
    /// Show the durations behind each focus preset
    Presets,
    /// Reset config to defaults
    Reset,
}

/// Dot-separated paths of every leaf value, sorted.
fn config_keys(config: &Config) -> Result<Vec<String>, serde_json::Error> {
    fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                for (k, v) in map {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => out.push(prefix.to_string()),
        }
    }

    let mut keys = Vec::new();
    walk("", &serde_json::to_value(config)?, &mut keys);
    Ok(keys)
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    let known = config_keys(&config)?.join(", ");
                    return Err(format!("unknown key: {key} (known keys: {known})").into());
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            // Echo the stored form, e.g. "deep-work" comes back as "deepwork".
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in config_keys(&config)? {
                let value = config.get(&key).unwrap_or_default();
                println!("{key} = {value}");
            }
        }
        ConfigAction::Presets => {
            let config = Config::load_or_default();
            let presets = FocusPreset::ALL
                .iter()
                .map(|preset| {
                    serde_json::json!({
                        "preset": preset.as_str(),
                        "default": *preset == config.focus.default_preset,
                        "durations": preset.durations(),
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
