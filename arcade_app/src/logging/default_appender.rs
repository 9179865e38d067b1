//! A buffered console appender, available as `"default"` in the
//! configuration.
//!
//! Each record is encoded into a stack buffer and written to stderr in one
//! go, so lines from concurrent tasks don't interleave.

use std::io::{self, Write as _};

use arrayvec::ArrayVec;
use log::Record;
use log4rs::append::Append;
use log4rs::config::{Deserialize, Deserializers};
use log4rs::encode::{self, Encode, EncoderConfig, Style};

use super::{WRITE_BUF_SIZE, term};

#[derive(Debug)]
pub struct DefaultAppender {
    encoder: Box<dyn Encode>,
    color: bool,
}

impl Append for DefaultAppender {
    fn append(&self, record: &Record<'_>) -> anyhow::Result<()> {
        let mut line = RecordBuffer::new(io::stderr(), self.color);
        self.encoder.encode(&mut line, record)?;
        line.flush()?;
        Ok(())
    }

    fn flush(&self) {
        _ = io::stderr().flush();
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct DefaultAppenderConfig {
    /// Forces colors on or off. Detected from the terminal if unset.
    color: Option<bool>,
    encoder: EncoderConfig,
}

pub struct DefaultAppenderDeserializer;

impl Deserialize for DefaultAppenderDeserializer {
    type Trait = dyn Append;
    type Config = DefaultAppenderConfig;

    fn deserialize(
        &self,
        config: Self::Config,
        deserializers: &Deserializers,
    ) -> anyhow::Result<Box<Self::Trait>> {
        let DefaultAppenderConfig { color, encoder } = config;
        let encoder = deserializers.deserialize(&encoder.kind, encoder.config)?;
        let color = color.unwrap_or_else(|| term::supports_ansi_escapes(&io::stderr()));
        Ok(Box::new(DefaultAppender { encoder, color }))
    }
}

/// Collects one record and hands it to `sink` in as few writes as possible.
///
/// Output that doesn't fit the buffer spills to the sink early. Chunks
/// larger than the whole buffer bypass it.
struct RecordBuffer<W> {
    sink: W,
    color: bool,
    buf: ArrayVec<u8, WRITE_BUF_SIZE>,
}

impl<W: io::Write> RecordBuffer<W> {
    fn new(sink: W, color: bool) -> Self {
        Self {
            sink,
            color,
            buf: ArrayVec::new_const(),
        }
    }

    fn spill(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }

        Ok(())
    }

    fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.buf.remaining_capacity() < bytes.len() {
            self.spill()?;
        }

        if bytes.len() > self.buf.capacity() {
            self.sink.write_all(bytes)
        } else {
            self.buf.write_all(bytes)
        }
    }

    fn push_sgr(&mut self, code: &str, color: Option<encode::Color>) -> io::Result<()> {
        match color {
            Some(color) => write!(self, "\x1b[{code};5;{}m", term::palette_index(color)),
            None => Ok(()),
        }
    }
}

impl<W: io::Write> io::Write for RecordBuffer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.push(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.spill()?;
        self.sink.flush()
    }
}

impl<W: io::Write> encode::Write for RecordBuffer<W> {
    fn set_style(&mut self, style: &Style) -> io::Result<()> {
        if !self.color {
            return Ok(());
        }

        self.push(term::RESET.as_bytes())?;
        self.push_sgr("38", style.text)?;
        self.push_sgr("48", style.background)?;
        if style.intense == Some(true) {
            self.push(term::BOLD.as_bytes())?;
        }

        Ok(())
    }
}
