// src/template/mod.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

static BRACE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("static regex"));

/// How placeholder keys appear inside a template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// The key itself, e.g. `pub_Year`.
    #[default]
    Bare,
    /// The key wrapped in double braces, e.g. `{{pub_Year}}`.
    Braces,
}

impl PlaceholderStyle {
    pub fn token(&self, key: &str) -> String {
        match self {
            PlaceholderStyle::Bare => key.to_string(),
            PlaceholderStyle::Braces => format!("{{{{{}}}}}", key),
        }
    }
}

/// Ordered placeholder key → replacement value, built once per row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A template document, read once and never mutated.
#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub text: String,
}

impl Template {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading template {}", path.display()))?;
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Keys whose token never occurs in this template.
    pub fn missing_placeholders<'a>(
        &self,
        keys: &[&'a str],
        style: PlaceholderStyle,
    ) -> Vec<&'a str> {
        keys.iter()
            .copied()
            .filter(|k| !self.text.contains(&style.token(k)))
            .collect()
    }

    /// `{{...}}` tokens in the template that none of `keys` fills.
    pub fn unknown_brace_tokens(&self, keys: &[&str]) -> Vec<String> {
        let mut unknown: Vec<String> = BRACE_TOKEN
            .captures_iter(&self.text)
            .map(|c| c[1].to_string())
            .filter(|name| !keys.contains(&name.as_str()))
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

/// Single-pass substitution engine for a fixed set of placeholder keys.
///
/// Tokens are matched leftmost, longest first, so no key can clobber a
/// longer key that contains it, and replacement text is never rescanned.
#[derive(Debug, Clone)]
pub struct Substituter {
    style: PlaceholderStyle,
    pattern: Regex,
}

impl Substituter {
    pub fn new<S: AsRef<str>>(keys: &[S], style: PlaceholderStyle) -> Result<Self> {
        anyhow::ensure!(!keys.is_empty(), "no placeholder keys to substitute");
        let mut tokens: Vec<String> = keys
            .iter()
            .map(|k| {
                let k = k.as_ref();
                anyhow::ensure!(!k.is_empty(), "empty placeholder key");
                Ok(style.token(k))
            })
            .collect::<Result<_>>()?;
        // Regex alternation is leftmost-first, so longer tokens go first.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).context("compiling placeholder pattern")?;
        debug!(tokens = tokens.len(), ?style, "compiled placeholder pattern");
        Ok(Self { style, pattern })
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Render `template` with `map`. Tokens without a value are left untouched.
    pub fn render(&self, template: &Template, map: &PlaceholderMap) -> String {
        let by_token: HashMap<String, &str> = map
            .entries
            .iter()
            .map(|(k, v)| (self.style.token(k), v.as_str()))
            .collect();

        let mut unfilled = 0usize;
        let out = self
            .pattern
            .replace_all(&template.text, |caps: &Captures| {
                let token = &caps[0];
                match by_token.get(token) {
                    Some(value) => (*value).to_string(),
                    None => {
                        unfilled += 1;
                        token.to_string()
                    }
                }
            })
            .into_owned();
        if unfilled > 0 {
            warn!(
                template = %template.path.display(),
                unfilled,
                "placeholders without a value were left in place"
            );
        }
        out
    }
}
