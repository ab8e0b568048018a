//! Display-theme preference persisted next to the brief collection.

use crate::store::kv_store::{KeyValueStore, StoreResult};
use crate::store::THEME_KEY;
use log::debug;
use std::fmt::{Display, Formatter};

/// UI theme preference. Defaults to `Dark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the stored theme; absent or unrecognized values yield `Dark`.
pub fn load_theme(store: &dyn KeyValueStore) -> StoreResult<Theme> {
    let stored = store.get(THEME_KEY)?;
    let theme = stored
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_default();
    debug!(
        "event=theme_load module=store status=ok stored={} theme={}",
        stored.is_some(),
        theme
    );
    Ok(theme)
}

/// Persists the theme preference.
pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> StoreResult<()> {
    store.set(THEME_KEY, theme.as_str())
}
