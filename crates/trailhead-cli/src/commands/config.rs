//! Configuration management commands for CLI.

use clap::Subcommand;
use trailhead_core::error::ConfigError;
use trailhead_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the full configuration
    List,
    /// Get a configuration value
    Get {
        /// Key, e.g. study.quiz_questions
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key, e.g. study.quiz_questions
        key: String,
        /// New value
        value: String,
    },
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match key.as_str() {
                "study.pass_threshold_pct" => println!("{}", config.study.pass_threshold_pct),
                "study.default_daily_goal" => println!("{}", config.study.default_daily_goal),
                "study.quiz_questions" => println!("{}", config.study.quiz_questions),
                _ => return Err(invalid(&key, "unknown key").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "study.pass_threshold_pct" => {
                    config.study.pass_threshold_pct =
                        value.parse().map_err(|_| invalid(&key, "expected a number"))?;
                }
                "study.default_daily_goal" => {
                    config.study.default_daily_goal =
                        value.parse().map_err(|_| invalid(&key, "expected a number"))?;
                }
                "study.quiz_questions" => {
                    config.study.quiz_questions =
                        value.parse().map_err(|_| invalid(&key, "expected a number"))?;
                }
                _ => return Err(invalid(&key, "unknown key").into()),
            }
            config.save()?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
