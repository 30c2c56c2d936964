//! Diagnostics for lookups that fell back to a neutral default.
//!
//! Resolvers never fail because of missing catalog data. They substitute a
//! default and record a [`Notice`] so the caller can surface a warning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an always-prepared grant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantSource {
    Class,
    Subclass,
    Species,
}

impl fmt::Display for GrantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantSource::Class => write!(f, "class"),
            GrantSource::Subclass => write!(f, "subclass"),
            GrantSource::Species => write!(f, "species"),
        }
    }
}

/// An unresolved lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    UnknownClass { id: String },
    UnknownSubclass { id: String },
    /// A subclass paired with a class it does not belong to.
    SubclassMismatch { subclass: String, class: String },
    UnknownSpecies { id: String },
    UnknownFeat { id: String },
    UnknownTool { id: String },
    UnresolvedSpell { name: String, source: GrantSource },
    MissingProgression { class: String, level: u8 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnknownClass { id } => write!(f, "unknown class '{id}'"),
            Notice::UnknownSubclass { id } => write!(f, "unknown subclass '{id}'"),
            Notice::SubclassMismatch { subclass, class } => {
                write!(f, "subclass '{subclass}' does not belong to class '{class}'")
            }
            Notice::UnknownSpecies { id } => write!(f, "unknown species '{id}'"),
            Notice::UnknownFeat { id } => write!(f, "unknown feat '{id}'"),
            Notice::UnknownTool { id } => write!(f, "unknown tool '{id}'"),
            Notice::UnresolvedSpell { name, source } => {
                write!(f, "{source} grant '{name}' is not in the spell catalog")
            }
            Notice::MissingProgression { class, level } => {
                write!(f, "no spell progression for {class} at level {level}")
            }
        }
    }
}

/// A value plus the notices raised while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    #[serde(default)]
    pub notices: Vec<Notice>,
}

impl<T> Resolved<T> {
    pub fn new(value: T, notices: Vec<Notice>) -> Self {
        Self { value, notices }
    }

    /// A value that needed no fallback.
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            notices: self.notices,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Collects notices for one resolver call and mirrors each to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, notice: Notice) {
        tracing::debug!(%notice, "catalog lookup fell back to default");
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    pub(crate) fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.push(notice);
        }
    }

    /// Take the notices of a nested result, keeping its value.
    pub(crate) fn absorb<T>(&mut self, resolved: Resolved<T>) -> T {
        self.extend(resolved.notices);
        resolved.value
    }

    pub(crate) fn finish<T>(self, value: T) -> Resolved<T> {
        Resolved::new(value, self.notices)
    }
}
