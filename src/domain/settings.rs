use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key for the persisted filter settings.
pub const SETTINGS_KEY: &str = "linkedinJobFilterSettings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    #[serde(rename = "SHOW_ALL")]
    All,
    #[serde(rename = "SHOW_PROMOTED")]
    PromotedOnly,
    #[serde(rename = "SHOW_NORMAL")]
    NormalOnly,
}

impl FilterMode {
    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::PromotedOnly => "promoted",
            FilterMode::NormalOnly => "normal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(FilterMode::All),
            "promoted" => Some(FilterMode::PromotedOnly),
            "normal" => Some(FilterMode::NormalOnly),
            _ => None,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    OnlyUnviewed,
    OnlyUnhidden,
    OnlyUnapplied,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [
        Toggle::OnlyUnviewed,
        Toggle::OnlyUnhidden,
        Toggle::OnlyUnapplied,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Toggle::OnlyUnviewed => "only unviewed",
            Toggle::OnlyUnhidden => "hide hidden",
            Toggle::OnlyUnapplied => "hide applied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "unviewed" | "viewed" => Some(Toggle::OnlyUnviewed),
            "hidden" | "unhidden" => Some(Toggle::OnlyUnhidden),
            "applied" | "unapplied" => Some(Toggle::OnlyUnapplied),
            _ => None,
        }
    }
}

/// User preferences driving the card filter.
///
/// Every field has a default so partially stored settings still decode; the
/// phrase list never holds two identical entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedConfig {
    pub active_filter: FilterMode,
    pub only_unviewed: bool,
    pub only_unhidden: bool,
    pub only_unapplied: bool,
    pub blocked_phrases: Vec<String>,
}

impl PersistedConfig {
    /// Decodes stored settings, dropping repeated phrases while keeping the
    /// first occurrence in place.
    pub fn from_stored(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: PersistedConfig = serde_json::from_str(raw)?;
        let mut seen = Vec::with_capacity(config.blocked_phrases.len());
        config.blocked_phrases.retain(|phrase| {
            if seen.contains(phrase) {
                false
            } else {
                seen.push(phrase.clone());
                true
            }
        });
        Ok(config)
    }

    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Appends `phrase` unless an identical entry exists. Returns whether the
    /// list changed.
    pub fn add_phrase(&mut self, phrase: &str) -> bool {
        if phrase.is_empty() || self.blocked_phrases.iter().any(|p| p == phrase) {
            return false;
        }
        self.blocked_phrases.push(phrase.to_string());
        true
    }

    pub fn remove_phrase(&mut self, phrase: &str) -> bool {
        let before = self.blocked_phrases.len();
        self.blocked_phrases.retain(|p| p != phrase);
        before != self.blocked_phrases.len()
    }

    /// Flips the toggle and returns its new value.
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let flag = match toggle {
            Toggle::OnlyUnviewed => &mut self.only_unviewed,
            Toggle::OnlyUnhidden => &mut self.only_unhidden,
            Toggle::OnlyUnapplied => &mut self.only_unapplied,
        };
        *flag = !*flag;
        *flag
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::OnlyUnviewed => self.only_unviewed,
            Toggle::OnlyUnhidden => self.only_unhidden,
            Toggle::OnlyUnapplied => self.only_unapplied,
        }
    }
}
