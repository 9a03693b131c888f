//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::Backend;
use crate::domain::error::ConfigError;
use crate::domain::time_limit::TimeLimit;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Show => handle_show(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let mut config = store.load().await?;

    match key {
        "device_id" => config.device_id = Some(value.to_string()),
        "time_limit" => {
            value
                .parse::<TimeLimit>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
            config.time_limit = Some(value.to_string());
        }
        "backend" => {
            config.backend = Some(parse_backend(value).ok_or_else(|| {
                ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be 'local' or 'remote'".to_string(),
                }
            })?)
        }
        "remote_url" => config.remote_url = Some(value.to_string()),
        "api_token" => config.api_token = Some(value.to_string()),
        "notify" => config.notify = Some(parse_bool(key, value)?),
        "latitude" => config.latitude = Some(parse_f64(key, value)?),
        "longitude" => config.longitude = Some(parse_f64(key, value)?),
        "high_accuracy" => config.high_accuracy = Some(parse_bool(key, value)?),
        _ => unreachable!("key validated above"),
    }

    store.save(&config).await?;
    presenter.success(&format!("Set {} = {}", key, value));
    Ok(())
}

async fn handle_show<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value("device_id", &display(config.device_id.as_deref()));
    presenter.key_value("time_limit", &display(config.time_limit.as_deref()));
    let backend = config
        .backend
        .map(|b| match b {
            Backend::Local => "local",
            Backend::Remote => "remote",
        })
        .unwrap_or("(not set)");
    presenter.key_value("backend", backend);
    presenter.key_value("remote_url", &display(config.remote_url.as_deref()));
    presenter.key_value(
        "api_token",
        if config.api_token.is_some() {
            "(set)"
        } else {
            "(not set)"
        },
    );
    presenter.key_value("notify", &display_opt(config.notify));
    presenter.key_value("latitude", &display_opt(config.latitude));
    presenter.key_value("longitude", &display_opt(config.longitude));
    presenter.key_value("high_accuracy", &display_opt(config.high_accuracy));
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn display(value: Option<&str>) -> String {
    value.unwrap_or("(not set)").to_string()
}

fn display_opt<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

fn parse_backend(value: &str) -> Option<Backend> {
    match value.to_lowercase().as_str() {
        "local" => Some(Backend::Local),
        "remote" => Some(Backend::Remote),
        _ => None,
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        }),
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .map_err(|_| ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a number".to_string(),
        })
}
