//! Device-wide display preferences.

use std::{fmt, str::FromStr};

use crate::{EngineError, ResultEngine, storage::SharedStore};

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Grey,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Grey];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Grey => "grey",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "grey" | "gray" => Ok(Self::Grey),
            other => Err(EngineError::InvalidName(format!("unknown theme: {other}"))),
        }
    }
}

/// Read the stored theme, falling back to [`Theme::Light`].
pub fn load_theme(store: &SharedStore) -> ResultEngine<Theme> {
    let Some(raw) = store.get(THEME_KEY)? else {
        return Ok(Theme::default());
    };
    Ok(raw.parse().unwrap_or_else(|err| {
        tracing::warn!("ignoring stored theme: {err}");
        Theme::default()
    }))
}

pub fn save_theme(store: &SharedStore, theme: Theme) -> ResultEngine<()> {
    store.set(THEME_KEY, theme.as_str())
}
