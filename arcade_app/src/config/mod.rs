use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serenity::model::Color;

pub mod setup;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub bot: BotConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Whether to route panics through the logger.
    #[serde(default = "default_true")]
    pub panic: bool,
    #[serde(flatten)]
    pub log4rs: log4rs::config::RawConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            panic: true,
            log4rs: log4rs::config::RawConfig::default(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_embed_color() -> Color {
    Color::new(0xDD_A0_DD)
}

fn default_prefix() -> String {
    "!".to_owned()
}

fn default_stats_path() -> PathBuf {
    PathBuf::from("stat.json")
}

const fn default_challenge_timeout_secs() -> u64 {
    90
}

const fn default_move_timeout_secs() -> u64 {
    300
}

const fn default_notice_lifetime_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// The command prefix at startup. It can be changed at runtime.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_embed_color")]
    pub embed_color: Color,
    #[serde(default = "default_stats_path")]
    pub stats_path: PathBuf,
    #[serde(default = "default_challenge_timeout_secs")]
    pub challenge_timeout_secs: u64,
    #[serde(default = "default_move_timeout_secs")]
    pub move_timeout_secs: u64,
    #[serde(default = "default_notice_lifetime_ms")]
    pub notice_lifetime_ms: u64,
}

impl BotConfig {
    pub fn settings(&self) -> arcade_core::Settings {
        arcade_core::Settings {
            challenge_timeout: Duration::from_secs(self.challenge_timeout_secs),
            move_timeout: Duration::from_secs(self.move_timeout_secs),
            notice_lifetime: Duration::from_millis(self.notice_lifetime_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::setup::{Builder, TomlText};
    use super::*;

    const DEFAULT_CONFIG: &str = include_str!("../../assets/default_config.toml");

    #[test]
    fn defaults_fill_in() {
        let config: Config = Builder::new()
            .add_layer(TomlText::new(DEFAULT_CONFIG))
            .add_layer(TomlText::new("[discord]\ntoken = \"abc\""))
            .build()
            .expect("config must deserialize");

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.stats_path, PathBuf::from("stat.json"));
        assert!(config.log.panic);

        let settings = config.bot.settings();
        assert_eq!(settings, arcade_core::Settings::default());
    }

    #[test]
    fn later_layers_win() {
        let config: Config = Builder::new()
            .add_layer(TomlText::new(DEFAULT_CONFIG))
            .add_layer(TomlText::new(
                "[discord]\ntoken = \"abc\"\n[bot]\nprefix = \"?\"\nmove_timeout_secs = 60",
            ))
            .build()
            .expect("config must deserialize");

        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.settings().move_timeout, Duration::from_secs(60));
        assert_eq!(config.bot.challenge_timeout_secs, 90);
    }
}
