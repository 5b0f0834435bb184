//! Field tables and string coercion
//!
//! Every record type declares a static [`Shape`]: the list of fields it
//! accepts, their kind and their default. Converting a section walks that
//! table, so there is no runtime inspection of the target type.

use super::source::Section;
use crate::error::{FbmError, FbmResult};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Tokens accepted as `true`, compared case-insensitively
pub const TRUE_TOKENS: [&str; 4] = ["true", "yes", "1", "on"];

/// Tokens accepted as `false`, compared case-insensitively
pub const FALSE_TOKENS: [&str; 4] = ["false", "no", "0", "off"];

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Passed through unchanged
    Text,
    /// Parsed with [`parse_bool`]
    Flag,
}

/// What happens when a field is absent from its section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Required,
    /// Absent fields become [`Value::Absent`]
    Optional,
    Flag(bool),
}

/// What to do with keys a shape does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyPolicy {
    #[default]
    Reject,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Alternative key spellings accepted for this field
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Text,
            default: FieldDefault::Required,
        }
    }

    pub const fn optional_text(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Text,
            default: FieldDefault::Optional,
        }
    }

    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            aliases: &[],
            kind: FieldKind::Flag,
            default: FieldDefault::Flag(default),
        }
    }

    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}

/// Static description of a record type
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Shape {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.matches(key))
    }

    /// Convert one section into a [`Record`].
    ///
    /// `inherited` holds `[DEFAULT]` values; they fill fields the section
    /// leaves out and are never checked against `policy`.
    pub fn convert(
        &self,
        section_name: &str,
        section: &Section,
        inherited: &Section,
        policy: UnknownKeyPolicy,
    ) -> FbmResult<Record> {
        debug!(
            "Converting section [{}] as {} ({} keys)",
            section_name,
            self.name,
            section.len()
        );

        for key in section.keys() {
            if self.field(key).is_some() {
                continue;
            }
            match policy {
                UnknownKeyPolicy::Reject => {
                    return Err(FbmError::unknown_field(section_name, key.as_str()))
                }
                UnknownKeyPolicy::Ignore => {
                    warn!("Ignoring unknown key '{}' in section [{}]", key, section_name)
                }
            }
        }

        let mut values = IndexMap::with_capacity(self.fields.len());
        for spec in self.fields {
            let raw = match lookup(spec, section_name, section)? {
                Some(raw) => Some(raw),
                None => lookup(spec, section_name, inherited)?,
            };

            let value = match (raw, spec.kind) {
                (Some(""), FieldKind::Text) if spec.default == FieldDefault::Optional => {
                    Value::Absent
                }
                (Some(raw), FieldKind::Text) => Value::Text(raw.to_string()),
                (Some(raw), FieldKind::Flag) => Value::Flag(parse_bool(raw).ok_or_else(|| {
                    FbmError::invalid_type(section_name, spec.name, raw, "a boolean")
                })?),
                (None, _) => match spec.default {
                    FieldDefault::Required => {
                        return Err(FbmError::missing_field(section_name, spec.name))
                    }
                    FieldDefault::Optional => Value::Absent,
                    FieldDefault::Flag(flag) => Value::Flag(flag),
                },
            };
            values.insert(spec.name, value);
        }

        Ok(Record {
            section: section_name.to_string(),
            values,
        })
    }
}

/// Find the value for `spec` under its name or one of its aliases
fn lookup<'a>(
    spec: &FieldSpec,
    section_name: &str,
    section: &'a Section,
) -> FbmResult<Option<&'a str>> {
    let mut found: Option<(&str, &'a str)> = None;
    for (key, value) in section {
        if !spec.matches(key) {
            continue;
        }
        if let Some((previous, _)) = found {
            return Err(FbmError::configuration(
                format!("[{}]", section_name),
                format!(
                    "'{}' and '{}' both set field {}",
                    previous, key, spec.name
                ),
            ));
        }
        found = Some((key.as_str(), value.as_str()));
    }
    Ok(found.map(|(_, value)| value))
}

/// Convert a standalone section with no inherited values, rejecting unknown keys
pub fn convert(section_name: &str, section: &Section, shape: &Shape) -> FbmResult<Record> {
    shape.convert(
        section_name,
        section,
        &Section::new(),
        UnknownKeyPolicy::Reject,
    )
}

/// Parse a boolean token, case-insensitively
pub fn parse_bool(raw: &str) -> Option<bool> {
    let token = raw.to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Coerced field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(bool),
    Absent,
}

/// Result of converting one section; consumed by the typed record constructors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    section: String,
    values: IndexMap<&'static str, Value>,
}

impl Record {
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn take_text(&mut self, field: &'static str) -> FbmResult<String> {
        match self.take(field) {
            Value::Text(text) => Ok(text),
            _ => Err(self.mismatch(field, "text")),
        }
    }

    pub fn take_optional_text(&mut self, field: &'static str) -> FbmResult<Option<String>> {
        match self.take(field) {
            Value::Text(text) => Ok(Some(text)),
            Value::Absent => Ok(None),
            Value::Flag(_) => Err(self.mismatch(field, "text")),
        }
    }

    pub fn take_flag(&mut self, field: &'static str) -> FbmResult<bool> {
        match self.take(field) {
            Value::Flag(flag) => Ok(flag),
            _ => Err(self.mismatch(field, "flag")),
        }
    }

    fn take(&mut self, field: &str) -> Value {
        self.values
            .get_mut(field)
            .map(|value| std::mem::replace(value, Value::Absent))
            .unwrap_or(Value::Absent)
    }

    fn mismatch(&self, field: &str, kind: &str) -> FbmError {
        FbmError::configuration(
            format!("[{}]", self.section),
            format!("field {} is not declared as {} in its shape", field, kind),
        )
    }
}
