//! Defines a `"default"` [`PatternEncoder`] so the pattern isn't repeated in
//! the configuration.

use log4rs::config::{Deserialize, Deserializers};
use log4rs::encode::Encode;
use log4rs::encode::pattern::PatternEncoder;

const fn default_true() -> bool {
    true
}

#[derive(Debug, serde::Deserialize)]
pub struct DefaultPatternConfig {
    /// Whether to prefix lines with the UTC time.
    #[serde(default = "default_true")]
    time: bool,
}

pub struct DefaultPatternDeserializer;

impl DefaultPatternDeserializer {
    fn pattern(config: &DefaultPatternConfig) -> &'static str {
        if config.time {
            "[{d(%Y-%m-%d %H:%M:%S)(utc)} {h({l:<5})} {t}] {m}{n}"
        } else {
            "[{h({l:<5})} {t}] {m}{n}"
        }
    }
}

impl Deserialize for DefaultPatternDeserializer {
    type Trait = dyn Encode;
    type Config = DefaultPatternConfig;

    fn deserialize(
        &self,
        config: Self::Config,
        _deserializers: &Deserializers,
    ) -> anyhow::Result<Box<Self::Trait>> {
        Ok(Box::new(PatternEncoder::new(Self::pattern(&config))))
    }
}
