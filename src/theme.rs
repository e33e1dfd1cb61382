//! Light/dark theme preference, persisted as a small TOML state file.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
struct ThemeFile {
    theme: Theme,
}

/// Read the persisted theme; a missing or malformed file yields the default.
pub fn load(path: &Path) -> Theme {
    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<ThemeFile>(&raw) {
            Ok(file) => file.theme,
            Err(err) => {
                debug!("ignoring malformed theme file {}: {}", path.display(), err);
                Theme::default()
            }
        },
        Err(err) => {
            debug!("no theme file at {}: {}", path.display(), err);
            Theme::default()
        }
    }
}

/// Persist the theme, creating the parent directory when needed.
pub fn save(path: &Path, theme: Theme) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string(&ThemeFile { theme })
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, raw)
}
