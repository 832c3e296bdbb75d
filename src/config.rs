//! Pattern tables: keyword regexes, role canonicalization, role sets and
//! URL keyword lists.
//!
//! The tables are data, not code. The default set lives in
//! `config/patterns.toml` and is embedded at build time; callers may load a
//! replacement file with [`PatternConfig::load`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_PATTERNS_TOML: &str = include_str!("../config/patterns.toml");

static DEFAULT_TABLES: LazyLock<Patterns> = LazyLock::new(|| {
    PatternConfig::from_toml_str(DEFAULT_PATTERNS_TOML)
        .and_then(|c| c.compile())
        .expect("embedded pattern tables are valid")
});

/// How the section splitter cuts raw text into candidate sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStrategy {
    /// One section per matching sentence.
    #[default]
    Sentence,
    /// A fixed window of `window_radius` bytes around every keyword match.
    Window,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    #[serde(default)]
    pub strategy: SectionStrategy,
    #[serde(default = "default_window_radius")]
    pub window_radius: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            strategy: SectionStrategy::Sentence,
            window_radius: default_window_radius(),
        }
    }
}

fn default_window_radius() -> usize {
    200
}

fn default_min_name_chars() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalRole {
    pub pattern: String,
    pub label: String,
}

/// Raw, uncompiled pattern tables as they appear on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub version: u32,
    #[serde(default = "default_min_name_chars")]
    pub min_name_chars: usize,
    pub contact_patterns: Vec<String>,
    pub management_patterns: Vec<String>,
    pub role_patterns: Vec<String>,
    pub canonical_roles: Vec<CanonicalRole>,
    pub executive_roles: Vec<String>,
    pub board_roles: Vec<String>,
    pub excluded_url_keywords: Vec<String>,
    pub executive_page_keywords: Vec<String>,
    pub board_page_keywords: Vec<String>,
    pub non_person_tokens: Vec<String>,
    #[serde(default)]
    pub name_stopwords: Vec<String>,
    #[serde(default)]
    pub name_particles: Vec<String>,
    #[serde(default)]
    pub allowed_name_tokens: Vec<String>,
    #[serde(default)]
    pub sections: SectionConfig,
}

impl PatternConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load pattern tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Compile every table into its runtime form.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid regex or when a canonical label is
    /// listed in both role sets.
    pub fn compile(&self) -> Result<Patterns, ConfigError> {
        let executive_roles: HashSet<String> = self.executive_roles.iter().cloned().collect();
        let board_roles: HashSet<String> = self.board_roles.iter().cloned().collect();
        if let Some(role) = self.executive_roles.iter().find(|r| board_roles.contains(*r)) {
            return Err(ConfigError::OverlappingRoleSets(role.clone()));
        }

        let canonical_roles = self
            .canonical_roles
            .iter()
            .map(|c| Ok((compile_one("canonical role", &c.pattern)?, c.label.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Patterns {
            version: self.version,
            contact: compile_all("contact", &self.contact_patterns)?,
            management: compile_all("management", &self.management_patterns)?,
            role: compile_all("role", &self.role_patterns)?,
            canonical_roles,
            executive_roles,
            board_roles,
            excluded_url_keywords: lowercase_all(&self.excluded_url_keywords),
            executive_page_keywords: lowercase_all(&self.executive_page_keywords),
            board_page_keywords: lowercase_all(&self.board_page_keywords),
            non_person_tokens: lowercase_all(&self.non_person_tokens).into_iter().collect(),
            name_stopwords: lowercase_all(&self.name_stopwords).into_iter().collect(),
            name_particles: lowercase_all(&self.name_particles).into_iter().collect(),
            allowed_name_tokens: lowercase_all(&self.allowed_name_tokens).into_iter().collect(),
            min_name_chars: self.min_name_chars,
            strategy: self.sections.strategy,
            window_radius: self.sections.window_radius,
        })
    }
}

fn compile_one(table: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            table,
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all(table: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_one(table, p)).collect()
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

/// Compiled, read-only pattern tables shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub version: u32,
    pub contact: Vec<Regex>,
    pub management: Vec<Regex>,
    pub role: Vec<Regex>,
    /// Ordered `(anchored pattern, canonical label)` pairs; first match wins.
    pub canonical_roles: Vec<(Regex, String)>,
    pub executive_roles: HashSet<String>,
    pub board_roles: HashSet<String>,
    pub excluded_url_keywords: Vec<String>,
    pub executive_page_keywords: Vec<String>,
    pub board_page_keywords: Vec<String>,
    pub non_person_tokens: HashSet<String>,
    pub name_stopwords: HashSet<String>,
    pub name_particles: HashSet<String>,
    /// Name tokens the validator never checks against the denylist.
    pub allowed_name_tokens: HashSet<String>,
    pub min_name_chars: usize,
    pub strategy: SectionStrategy,
    pub window_radius: usize,
}

impl Patterns {
    /// The tables embedded from `config/patterns.toml`, compiled once.
    pub fn default_tables() -> &'static Patterns {
        &DEFAULT_TABLES
    }

    /// Load and compile a pattern file in one step.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        PatternConfig::load(path)?.compile()
    }
}
