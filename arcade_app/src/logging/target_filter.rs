//! A filter on the record target, available as `"target"` in the
//! configuration.
//!
//! Can also force-accept matching targets, overriding later filters. This
//! lets an appender show everything from the arcade while a [`threshold`]
//! filter keeps other crates quiet.
//!
//! [`threshold`]: log4rs::filter::threshold

use log::Record;
use log4rs::config::{Deserialize, Deserializers};
use log4rs::filter::{Filter, Response};

#[derive(Debug)]
pub struct TargetFilter {
    config: TargetFilterConfig,
}

impl TargetFilter {
    fn respond(&self, target: &str) -> Response {
        let is_match = target.starts_with(&self.config.target);
        match (self.config.mode, is_match) {
            (TargetMode::RejectMismatch, false) | (TargetMode::RejectMatch, true) => Response::Reject,
            (TargetMode::AcceptMismatch, false) | (TargetMode::AcceptMatch, true) => Response::Accept,
            _ => Response::Neutral,
        }
    }
}

impl Filter for TargetFilter {
    fn filter(&self, record: &Record<'_>) -> Response {
        self.respond(record.target())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum TargetMode {
    RejectMismatch,
    AcceptMismatch,
    RejectMatch,
    AcceptMatch,
}

#[derive(Debug, serde::Deserialize)]
pub struct TargetFilterConfig {
    /// The target prefix to match.
    target: String,
    mode: TargetMode,
}

pub struct TargetFilterDeserializer;

impl Deserialize for TargetFilterDeserializer {
    type Trait = dyn Filter;
    type Config = TargetFilterConfig;

    fn deserialize(
        &self,
        config: Self::Config,
        _deserializers: &Deserializers,
    ) -> anyhow::Result<Box<Self::Trait>> {
        Ok(Box::new(TargetFilter { config }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(target: &str, mode: TargetMode) -> TargetFilter {
        TargetFilter {
            config: TargetFilterConfig {
                target: target.to_owned(),
                mode,
            },
        }
    }

    #[test]
    fn accept_match_overrides() {
        let f = filter("arcade_", TargetMode::AcceptMatch);
        assert!(matches!(f.respond("arcade_core::duel"), Response::Accept));
        assert!(matches!(f.respond("serenity::gateway"), Response::Neutral));
    }

    #[test]
    fn reject_mismatch() {
        let f = filter("arcade_app", TargetMode::RejectMismatch);
        assert!(matches!(f.respond("arcade_app::handler"), Response::Neutral));
        assert!(matches!(f.respond("arcade_core"), Response::Reject));
    }
}
