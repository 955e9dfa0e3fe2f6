use serde::{Deserialize, Serialize};
use std::cell::RefCell;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, SessionStorage, Storage};

/// Playback state persisted per tab so a reload or content swap can resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    #[serde(rename = "playbackId")]
    pub playback_id: String,
    pub title: String,
    #[serde(rename = "currentTime", default)]
    pub current_time: f64,
    #[serde(rename = "isPlaying", default)]
    pub is_playing: bool,
}

/// Single shared snapshot slot. Last writer wins.
pub trait SnapshotStore {
    fn save(&self, snapshot: &PlaybackSnapshot);
    /// Malformed stored data reads as `None`.
    fn load(&self) -> Option<PlaybackSnapshot>;
    fn clear(&self);
}

/// In-memory slot holding the serialized form, used when session storage is
/// unavailable.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: RefCell<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
        }
    }

    #[cfg(test)]
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, snapshot: &PlaybackSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => *self.slot.borrow_mut() = Some(json),
            Err(err) => tracing::warn!(error = %err, "failed to encode playback snapshot"),
        }
    }

    fn load(&self) -> Option<PlaybackSnapshot> {
        let raw = self.slot.borrow().clone()?;
        serde_json::from_str(&raw).ok()
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// `sessionStorage` slot; dies with the tab.
#[cfg(target_arch = "wasm32")]
pub struct SessionSnapshotStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl SessionSnapshotStore {
    /// `None` when the browser refuses session storage (e.g. sandboxed frames).
    pub fn open(key: &str) -> Option<Self> {
        web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self {
            key: key.to_string(),
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for SessionSnapshotStore {
    fn save(&self, snapshot: &PlaybackSnapshot) {
        if let Err(err) = SessionStorage::set(&self.key, snapshot) {
            tracing::warn!(error = %err, "failed to persist playback snapshot");
        }
    }

    fn load(&self) -> Option<PlaybackSnapshot> {
        match SessionStorage::get::<PlaybackSnapshot>(&self.key) {
            Ok(snapshot) => Some(snapshot),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                tracing::debug!(error = %err, "discarding unreadable playback snapshot");
                None
            }
        }
    }

    fn clear(&self) {
        SessionStorage::delete(&self.key);
    }
}

/// Appearance preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything but `dark` reads as light.
    pub fn from_preference(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// The theme is stored as a bare string rather than JSON so pages written
// before the player existed keep their preference.
#[cfg(target_arch = "wasm32")]
pub fn load_theme(key: &str) -> Theme {
    let stored = LocalStorage::raw().get_item(key).ok().flatten();
    Theme::from_preference(stored.as_deref())
}

#[cfg(target_arch = "wasm32")]
pub fn save_theme(key: &str, theme: Theme) {
    if LocalStorage::raw().set_item(key, theme.as_str()).is_err() {
        tracing::warn!(theme = theme.as_str(), "failed to persist theme preference");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PlaybackSnapshot {
        PlaybackSnapshot {
            playback_id: "X".to_string(),
            title: "sometimes".to_string(),
            current_time: 42.5,
            is_playing: true,
        }
    }

    #[test]
    fn wire_format_uses_camel_case_keys() {
        let store = MemorySnapshotStore::new();
        store.save(&snapshot());
        let raw = store.raw().unwrap();
        assert!(raw.contains("\"playbackId\":\"X\""));
        assert!(raw.contains("\"currentTime\":42.5"));
        assert!(raw.contains("\"isPlaying\":true"));
        assert_eq!(store.load(), Some(snapshot()));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let store = MemorySnapshotStore::new();
        store.save(&snapshot());
        let mut later = snapshot();
        later.current_time = 50.0;
        store.save(&later);
        assert_eq!(store.load().unwrap().current_time, 50.0);
    }

    #[test]
    fn malformed_data_reads_as_absent() {
        assert_eq!(MemorySnapshotStore::with_raw("{oops").load(), None);
        assert_eq!(MemorySnapshotStore::with_raw(r#"{"title":"x"}"#).load(), None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let store = MemorySnapshotStore::with_raw(r#"{"playbackId":"X","title":"t"}"#);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.current_time, 0.0);
        assert!(!loaded.is_playing);
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = MemorySnapshotStore::new();
        store.save(&snapshot());
        store.clear();
        assert_eq!(store.load(), None);
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn theme_preference_parsing() {
        assert_eq!(Theme::from_preference(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_preference(Some("light")), Theme::Light);
        assert_eq!(Theme::from_preference(Some("\"dark\"")), Theme::Light);
        assert_eq!(Theme::from_preference(None), Theme::Light);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}
