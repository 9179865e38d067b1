use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use toml::map::Entry;
use toml::{Table, Value};

/// Provides a layered builder for deserializing configuration files.
#[must_use]
pub struct Builder {
    table: Result<Table>,
}

impl Builder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            table: Ok(Table::new()),
        }
    }

    /// Adds a layer of configuration.
    ///
    /// Layers added later take precedence over earlier ones.
    pub fn add_layer<L: Layer>(mut self, source: L) -> Self {
        self.table = self.table.and_then(|mut t| {
            source.extend_table(&mut t)?;
            Ok(t)
        });
        self
    }

    /// Deserializes the configuration from the provided layers.
    pub fn build<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.table.and_then(deserialize_table)
    }
}

/// A configuration layer.
pub trait Layer {
    /// Extends a TOML table by this layer.
    fn extend_table(&self, table: &mut Table) -> Result<()>;
}

/// A TOML file configuration layer.
#[must_use]
pub struct File {
    path: PathBuf,
    required: bool,
}

impl File {
    /// Creates a new layer, loading TOML from the file at the given path.
    ///
    /// The file is required by default.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            required: true,
        }
    }

    /// Sets whether the file is required.
    ///
    /// A missing optional file is treated as empty.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A TOML text configuration layer.
#[must_use]
pub struct TomlText<'a> {
    text: &'a str,
}

impl<'a> TomlText<'a> {
    /// Creates a new layer, parsing the text as TOML.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

/// An environment variable configuration layer.
///
/// Only variables starting with the prefix are loaded. The prefix is
/// stripped and the rest of the name is lowercased. Nested values are
/// separated by `__` (two underscores), so with the prefix `ARCADE_`,
/// `ARCADE_DISCORD__TOKEN` refers to `discord.token`.
///
/// Values that look like integers or booleans are loaded as such, everything
/// else as a string.
#[must_use]
pub struct Env {
    prefix: &'static str,
}

impl Env {
    /// Creates a new layer for variables starting with `prefix`.
    pub fn prefixed(prefix: &'static str) -> Self {
        Self { prefix }
    }

    fn load<I>(&self, vars: I, table: &mut Table)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(key) = key.strip_prefix(self.prefix) else {
                continue;
            };

            let key = key.to_ascii_lowercase();
            let segments = key.split("__").collect::<SmallVec<[&str; 8]>>();
            insert_at(table, &segments, scalar_value(value));
        }
    }
}

impl Layer for File {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let file = match fs::read_to_string(&self.path) {
            Ok(content) => deserialize_str_to_table(&content)
                .with_context(|| format!("failed to load config {:?}", self.path))?,
            Err(why) => {
                if !self.required && why.kind() == io::ErrorKind::NotFound {
                    return Ok(());
                }

                return Err(why).context(format!("cannot read required config {:?}", self.path));
            },
        };

        merge_tables(table, file);
        Ok(())
    }
}

impl Layer for TomlText<'_> {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let toml = deserialize_str_to_table(self.text).context("toml str literal invalid")?;
        merge_tables(table, toml);
        Ok(())
    }
}

impl Layer for Env {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        // non-utf8 names can't match the prefix. values are converted lossily
        // so a bad one at least shows up in the deserialization error.
        let vars = env::vars_os().filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let value = value
                .into_string()
                .unwrap_or_else(|o| o.to_string_lossy().into_owned());
            Some((key, value))
        });

        self.load(vars, table);
        Ok(())
    }
}

fn scalar_value(text: String) -> Value {
    if let Ok(int) = text.parse::<i64>() {
        return Value::Integer(int);
    }

    match text.as_str() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::String(text),
    }
}

fn deserialize_str_to_table(text: &str) -> Result<Table> {
    toml::from_str(text).context("config toml is invalid")
}

fn deserialize_table<T>(table: Table) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(table).context("cannot deserialize config")
}

fn merge_tables(target: &mut Table, consume: Table) {
    for (key, value) in consume {
        match target.entry(key) {
            Entry::Vacant(entry) => _ = entry.insert(value),
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Table(a), Value::Table(b)) => merge_tables(a, b),
                (a, b) => *a = b,
            },
        }
    }
}

fn insert_at(table: &mut Table, path: &[&str], value: Value) {
    let [first, path @ ..] = path else {
        return;
    };

    match table.entry((*first).to_owned()) {
        Entry::Vacant(entry) => _ = entry.insert(nested_value(path, value)),
        Entry::Occupied(mut entry) => match entry.get_mut() {
            Value::Table(table) if !path.is_empty() => insert_at(table, path, value),
            entry => *entry = nested_value(path, value),
        },
    }
}

fn nested_value(path: &[&str], value: Value) -> Value {
    let Some((&first, rest)) = path.split_first() else {
        return value;
    };

    let mut table = Table::new();
    table.insert(first.to_owned(), nested_value(rest, value));
    Value::Table(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn env_nests_and_parses_scalars() {
        let mut table = Table::new();
        Env::prefixed("ARCADE_").load(
            vars(&[
                ("ARCADE_DISCORD__TOKEN", "secret"),
                ("ARCADE_BOT__MOVE_TIMEOUT_SECS", "60"),
                ("ARCADE_LOG__PANIC", "false"),
                ("PATH", "/usr/bin"),
            ]),
            &mut table,
        );

        assert_eq!(table["discord"]["token"].as_str(), Some("secret"));
        assert_eq!(table["bot"]["move_timeout_secs"].as_integer(), Some(60));
        assert_eq!(table["log"]["panic"].as_bool(), Some(false));
        assert!(!table.contains_key("path"), "unprefixed variables are skipped");
    }

    #[test]
    fn merge_keeps_siblings() {
        let mut table = deserialize_str_to_table("[bot]\nprefix = \"!\"\nstats_path = \"a.json\"")
            .expect("valid toml");
        let layer = deserialize_str_to_table("[bot]\nprefix = \"?\"").expect("valid toml");
        merge_tables(&mut table, layer);

        assert_eq!(table["bot"]["prefix"].as_str(), Some("?"));
        assert_eq!(table["bot"]["stats_path"].as_str(), Some("a.json"));
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let mut table = Table::new();
        File::new("definitely/not/here.toml")
            .required(false)
            .extend_table(&mut table)
            .expect("optional file may be missing");
        assert!(table.is_empty());

        let required = File::new("definitely/not/here.toml").extend_table(&mut table);
        assert!(matches!(required, Err(_)), "required file must exist");
    }
}
