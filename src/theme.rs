// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! The light/dark presentation flag, persisted across sessions.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the theme flag lives between sessions.
///
/// The browser runtime keeps it in local storage; the CLI keeps it in a JSON
/// file next to the bundle. A missing or unreadable preference falls back to
/// the default theme rather than failing startup.
pub trait PreferenceStore {
    fn load_theme(&self) -> Option<Theme>;
    fn save_theme(&mut self, theme: Theme) -> Result<(), PreferenceError>;
}

/// File-backed preference store used by the CLI.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    theme: Theme,
}

impl PreferenceStore for FilePreferenceStore {
    fn load_theme(&self) -> Option<Theme> {
        let text = fs::read_to_string(&self.path).ok()?;
        let parsed: PreferenceFile = serde_json::from_str(&text).ok()?;
        Some(parsed.theme)
    }

    fn save_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        let body = serde_json::to_string_pretty(&PreferenceFile { theme })
            .map_err(PreferenceError::Encode)?;
        fs::write(&self.path, body).map_err(PreferenceError::Write)?;
        Ok(())
    }
}

/// In-memory store for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    theme: Option<Theme>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_theme(&self) -> Option<Theme> {
        self.theme
    }

    fn save_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.theme = Some(theme);
        Ok(())
    }
}

#[derive(Debug)]
pub enum PreferenceError {
    Encode(serde_json::Error),
    Write(io::Error),
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode preferences: {err}"),
            Self::Write(err) => write!(f, "failed to write preferences: {err}"),
        }
    }
}

impl std::error::Error for PreferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}
