use log4rs::config::Deserializers;

mod default_appender;
mod default_pattern;
mod target_filter;
mod term;

/// Stack buffer size of the console writer.
const WRITE_BUF_SIZE: usize = 2048;

/// The default log4rs deserializers plus the arcade's own kinds.
///
/// Adds the `"default"` appender and encoder and the `"target"` filter.
pub fn deserializers() -> Deserializers {
    let mut d = Deserializers::new();
    d.insert("default", default_appender::DefaultAppenderDeserializer);
    d.insert("default", default_pattern::DefaultPatternDeserializer);
    d.insert("target", target_filter::TargetFilterDeserializer);
    d
}
