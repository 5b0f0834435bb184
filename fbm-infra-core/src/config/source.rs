//! Sectioned key/value sources
//!
//! A configuration source is an INI-style text document. [`SectionSource`]
//! resolves a configuration name to a parsed [`IniDocument`]; the loader
//! never touches the filesystem directly.

use crate::error::{FbmError, FbmResult};
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Section whose values are inherited by every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// File extension of configuration files resolved by [`DirectorySource`]
pub const CONFIG_EXTENSION: &str = "cfg";

/// Flat key/value mapping of one section, in file order
pub type Section = IndexMap<String, String>;

/// Parsed INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: Section,
    sections: IndexMap<String, Section>,
}

impl IniDocument {
    /// Parse INI text.
    ///
    /// Keys are lower-cased and trimmed, values are trimmed. Full-line
    /// comments start with `#` or `;`. An indented line directly after a
    /// key continues that key's value.
    pub fn parse(text: &str) -> FbmResult<Self> {
        let mut doc = IniDocument::default();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut seen_default = false;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if raw.starts_with(char::is_whitespace) {
                if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref()) {
                    if let Some(value) = doc.section_entry(section).get_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .ok_or_else(|| FbmError::syntax(line, "malformed section header"))?;
                if name.is_empty() {
                    return Err(FbmError::syntax(line, "empty section name"));
                }

                if name == DEFAULT_SECTION {
                    if seen_default {
                        return Err(FbmError::syntax(
                            line,
                            format!("duplicate section [{}]", name),
                        ));
                    }
                    seen_default = true;
                } else if doc.sections.contains_key(name) {
                    return Err(FbmError::syntax(
                        line,
                        format!("duplicate section [{}]", name),
                    ));
                } else {
                    doc.sections.insert(name.to_string(), Section::new());
                }

                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let section = current
                .as_deref()
                .ok_or_else(|| FbmError::syntax(line, "key/value pair before any section header"))?;
            let split = trimmed
                .find(|c| c == '=' || c == ':')
                .ok_or_else(|| FbmError::syntax(line, "expected 'key = value'"))?;

            let key = trimmed[..split].trim().to_lowercase();
            if key.is_empty() {
                return Err(FbmError::syntax(line, "empty key"));
            }
            let value = trimmed[split + 1..].trim().to_string();

            let entries = doc.section_entry(section);
            if entries.contains_key(&key) {
                return Err(FbmError::syntax(
                    line,
                    format!("duplicate key '{}' in section [{}]", key, section),
                ));
            }
            entries.insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(doc)
    }

    fn section_entry(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }

    /// Values of the `[DEFAULT]` section
    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Look up a named section (excluding `[DEFAULT]`)
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Named sections in file order (excluding `[DEFAULT]`)
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }
}

/// Resolves a configuration name to its parsed sections
pub trait SectionSource {
    /// Read the document for `name`, failing with [`FbmError::NotFound`]
    /// when no such configuration exists.
    fn read(&self, name: &str) -> FbmResult<IniDocument>;
}

/// Configuration files stored as `<root>/<name>.cfg`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a configuration name resolves to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, CONFIG_EXTENSION))
    }

    /// Names of all configurations in the directory, sorted
    pub fn available(&self) -> FbmResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| FbmError::io(&self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| FbmError::io(&self.root, e))?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(CONFIG_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl SectionSource for DirectorySource {
    fn read(&self, name: &str) -> FbmResult<IniDocument> {
        let path = self.path_for(name);
        if name.contains(std::path::is_separator) || !path.is_file() {
            return Err(FbmError::not_found(name, path));
        }

        debug!("Reading configuration '{}' from {:?}", name, path);
        let text = fs::read_to_string(&path).map_err(|e| FbmError::io(&path, e))?;
        IniDocument::parse(&text)
    }
}

/// In-memory sources keyed by configuration name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: IndexMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(name.into(), text.into());
        self
    }
}

impl SectionSource for MemorySource {
    fn read(&self, name: &str) -> FbmResult<IniDocument> {
        let text = self
            .documents
            .get(name)
            .ok_or_else(|| FbmError::not_found(name, format!("<memory>/{}", name)))?;
        IniDocument::parse(text)
    }
}
