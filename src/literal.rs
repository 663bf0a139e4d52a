//! Localized string store.
//!
//! Every user-facing string lives in a JSON document (`data/literals.json`). The
//! document is a map of sections; most sections are named after the command or
//! feature that uses them, and a handful of reserved sections hold command briefs,
//! help texts, cog and check descriptors and emoji aliases. The token `<P>` is
//! replaced by the configured command prefix when the store is loaded.

use std::fmt::Display;
use std::path::Path;

use dioxus_logger::tracing;
use serde_json::{Map, Value};

use crate::error::AppError;

pub const BRIEF: &str = "_brief_";
pub const HELP: &str = "_help_";
pub const COG: &str = "_cog_";
pub const CHECK: &str = "_check_";
pub const EMOJI: &str = "_emoji_";

const PREFIX_TOKEN: &str = "<P>";
const DEFAULT_LITERALS: &str = include_str!("../data/literals.json");

/// Name, emoji and description of a cog or a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<'a> {
    pub name: &'a str,
    pub emoji: &'a str,
    pub description: &'a str,
}

/// Loaded literal document with the prefix token substituted.
#[derive(Debug, Clone)]
pub struct Literals {
    root: Map<String, Value>,
}

/// View on one section of the literal document.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl Literals {
    /// Parses a literal document and substitutes `<P>` with `prefix`.
    ///
    /// # Arguments
    /// - `raw` - JSON text whose root is an object
    /// - `prefix` - Command prefix to substitute
    ///
    /// # Returns
    /// - `Ok(Literals)` - Parsed store
    /// - `Err(serde_json::Error)` - The document is not a JSON object
    pub fn parse(raw: &str, prefix: &str) -> Result<Self, serde_json::Error> {
        let mut root: Map<String, Value> = serde_json::from_str(raw)?;
        for value in root.values_mut() {
            substitute_prefix(value, prefix);
        }
        Ok(Self { root })
    }

    /// Loads the store from `path`, or the compiled-in document when `None`.
    ///
    /// # Arguments
    /// - `path` - Optional override file
    /// - `prefix` - Command prefix to substitute
    ///
    /// # Returns
    /// - `Ok(Literals)` - Loaded store
    /// - `Err(AppError::IoErr)` - The override file could not be read
    /// - `Err(AppError::JsonErr)` - The document is malformed
    pub fn load(path: Option<&Path>, prefix: &str) -> Result<Self, AppError> {
        let literals = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::parse(&raw, prefix)?
            }
            None => Self::parse(DEFAULT_LITERALS, prefix)?,
        };
        Ok(literals)
    }

    pub fn section<'a>(&'a self, name: &'a str) -> Section<'a> {
        Section {
            name,
            map: self.root.get(name).and_then(Value::as_object),
        }
    }

    /// Short description of a command by its qualified name.
    pub fn brief(&self, qualified_name: &str) -> Option<&str> {
        self.section(BRIEF).find(qualified_name)
    }

    /// Long description of a command by its qualified name.
    pub fn help(&self, qualified_name: &str) -> Option<&str> {
        self.section(HELP).find(qualified_name)
    }

    pub fn cog(&self, key: &str) -> Option<Descriptor<'_>> {
        self.descriptor(COG, key)
    }

    pub fn check(&self, key: &str) -> Option<Descriptor<'_>> {
        self.descriptor(CHECK, key)
    }

    /// Resolves an emoji alias such as `:underage:`, falling back to the alias.
    pub fn emoji<'a>(&'a self, alias: &'a str) -> &'a str {
        self.section(EMOJI).find(alias).unwrap_or(alias)
    }

    /// Top-level string array, e.g. greeting words.
    pub fn strings(&self, key: &str) -> Vec<&str> {
        self.root
            .get(key)
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn descriptor(&self, section: &str, key: &str) -> Option<Descriptor<'_>> {
        let entry = self.root.get(section)?.get(key)?;
        let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or("");
        Some(Descriptor {
            name: field("name"),
            emoji: field("emoji"),
            description: field("description"),
        })
    }
}

impl<'a> Section<'a> {
    /// Looks up a string in the section.
    pub fn find(&self, key: &str) -> Option<&'a str> {
        self.map?.get(key).and_then(Value::as_str)
    }

    /// Looks up a string, logging and returning an empty string when missing.
    pub fn get(&self, key: &str) -> &'a str {
        match self.find(key) {
            Some(value) => value,
            None => {
                tracing::warn!("Missing literal '{}' in section '{}'", key, self.name);
                ""
            }
        }
    }

    /// Looks up a string array in the section.
    pub fn list(&self, key: &str) -> Vec<&'a str> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Fills `%s` / `%d` placeholders in order; `%%` is a literal percent sign.
///
/// Placeholders without a matching argument are left as they are.
pub fn format(template: &str, args: &[&(dyn Display + Sync)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            output.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                output.push('%');
            }
            Some(&kind) if kind == 's' || kind == 'd' => {
                chars.next();
                match args.next() {
                    Some(arg) => output.push_str(&arg.to_string()),
                    None => {
                        output.push('%');
                        output.push(kind);
                    }
                }
            }
            _ => output.push('%'),
        }
    }

    output
}

fn substitute_prefix(value: &mut Value, prefix: &str) {
    match value {
        Value::String(s) if s.contains(PREFIX_TOKEN) => *s = s.replace(PREFIX_TOKEN, prefix),
        Value::Array(values) => values
            .iter_mut()
            .for_each(|value| substitute_prefix(value, prefix)),
        Value::Object(map) => map
            .values_mut()
            .for_each(|value| substitute_prefix(value, prefix)),
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"{
        "_brief_": { "핑": "<P>핑 으로 지연 시간을 확인합니다." },
        "_cog_": { "BaseCog": { "name": "기본", "emoji": "🧸", "description": "기본 기능" } },
        "_emoji_": { ":underage:": "🔞" },
        "greetings": ["안녕", "HELLO"],
        "ping": { "done": "퐁! %sms", "nested": ["<P>도움말"] }
    }"#;

    #[test]
    fn substitutes_prefix_everywhere() {
        let literals = Literals::parse(SAMPLE, "//").unwrap();

        assert_eq!(literals.brief("핑"), Some("//핑 으로 지연 시간을 확인합니다."));
        assert_eq!(literals.section("ping").list("nested"), vec!["//도움말"]);
    }

    #[test]
    fn resolves_descriptors_and_emoji() {
        let literals = Literals::parse(SAMPLE, "//").unwrap();

        let cog = literals.cog("BaseCog").unwrap();
        assert_eq!(cog.name, "기본");
        assert_eq!(cog.emoji, "🧸");
        assert_eq!(literals.emoji(":underage:"), "🔞");
        assert_eq!(literals.emoji(":unknown:"), ":unknown:");
        assert!(literals.check("owner_only").is_none());
    }

    #[test]
    fn missing_keys_fall_back_to_empty() {
        let literals = Literals::parse(SAMPLE, "//").unwrap();

        assert_eq!(literals.section("ping").get("missing"), "");
        assert_eq!(literals.section("nothing").get("done"), "");
        assert_eq!(literals.strings("greetings"), vec!["안녕", "HELLO"]);
    }

    #[test]
    fn formats_positional_placeholders() {
        assert_eq!(format("퐁! %sms", &[&42]), "퐁! 42ms");
        assert_eq!(format("%s님 %d개", &[&"켄켄", &3]), "켄켄님 3개");
        assert_eq!(format("100%% %s", &[&"done"]), "100% done");
        assert_eq!(format("%s and %s", &[&1]), "1 and %s");
    }

    #[test]
    fn compiled_in_store_parses() {
        let literals = Literals::load(None, "//").unwrap();
        assert!(literals.cog("DeckCog").is_some());
        assert!(!literals.strings("greetings").is_empty());
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(Literals::parse("[1, 2]", "//").is_err());
    }
}
