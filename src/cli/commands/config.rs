//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{HvError, HvResult};
use crate::ui::{self, UiContext};
use tokio::fs;
use toml_edit::{DocumentMut, Item};

/// Keys accepted by `config set`
const KEYS: &[&str] = &[
    "general.log_format",
    "server.host",
    "server.user",
    "server.domain",
    "server.port",
    "server.ssh_options",
    "cache.file",
    "cache.sync_interval_secs",
    "cache.lock_timeout_secs",
];

/// Upper bound for `cache.sync_interval_secs` (one year)
const MAX_SYNC_INTERVAL_SECS: i64 = 365 * 24 * 60 * 60;

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> HvResult<()> {
    let ctx = UiContext::detect();

    match args.action {
        None | Some(ConfigAction::Show) => print!("{}", toml::to_string_pretty(config)?),
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(&ctx, manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            set_value(manager, &key, &value).await?;
            ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

async fn init_config(ctx: &UiContext, manager: &ConfigManager, force: bool) -> HvResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(ctx, &format!("Configuration written to {}", path.display()));
    Ok(())
}

/// Set one key in the config file, keeping its comments and layout
async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> HvResult<()> {
    let item = parse_item(key, value)?;
    let path = manager.path();

    let mut doc = if path.exists() {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| HvError::io(format!("reading {}", path.display()), e))?;
        content
            .parse::<DocumentMut>()
            .map_err(|e| HvError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
    } else {
        DocumentMut::new()
    };

    let (section, leaf) = key
        .split_once('.')
        .ok_or_else(|| HvError::User(format!("Unknown config key: {}", key)))?;
    let table = doc
        .entry(section)
        .or_insert(toml_edit::table())
        .as_table_mut()
        .ok_or_else(|| {
            HvError::User(format!("[{}] is not a table in {}", section, path.display()))
        })?;
    table[leaf] = item;

    // Reject anything the loader would refuse next time
    let content = doc.to_string();
    let updated: Config = toml::from_str(&content).map_err(|e| HvError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate(&updated)?;

    manager.write_raw(&content).await
}

fn parse_item(key: &str, value: &str) -> HvResult<Item> {
    if !KEYS.contains(&key) {
        return Err(HvError::User(format!(
            "Unknown config key: {} (valid keys: {})",
            key,
            KEYS.join(", ")
        )));
    }

    match key {
        "server.port" | "cache.sync_interval_secs" | "cache.lock_timeout_secs" => value
            .parse::<i64>()
            .map(toml_edit::value)
            .map_err(|_| HvError::User(format!("Invalid number for {}: {}", key, value))),
        "server.ssh_options" => {
            let options: toml_edit::Array = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            Ok(toml_edit::value(options))
        }
        _ => Ok(toml_edit::value(value)),
    }
}

fn validate(config: &Config) -> HvResult<()> {
    if !matches!(config.general.log_format.as_str(), "text" | "json") {
        return Err(HvError::User(format!(
            "Invalid log format: {}. Use text or json",
            config.general.log_format
        )));
    }
    if !(0..=MAX_SYNC_INTERVAL_SECS).contains(&config.cache.sync_interval_secs) {
        return Err(HvError::User(format!(
            "cache.sync_interval_secs must be between 0 and {}",
            MAX_SYNC_INTERVAL_SECS
        )));
    }
    Ok(())
}
