use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Site-wide settings. Pages may embed an override as
/// `<script type="application/json" id="site-config">`; every field falls back
/// to the markup the static site ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default)]
    pub storage: StorageKeys,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default = "default_subscribe_endpoint")]
    pub subscribe_endpoint: String,
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_probe_tag")]
    pub probe_tag: String,
    #[serde(default = "default_volume")]
    pub default_volume: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// DOM ids of the persistent shell and of the per-page widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub shell: String,
    pub bottom_bar: String,
    pub track_list: String,
    pub progress: String,
    pub progress_area: String,
    pub play_button: String,
    pub song_title: String,
    pub close_button: String,
    pub loading_spinner: String,
    pub media: String,
    pub volume_control: String,
    pub volume_fader: String,
    pub volume_fill: String,
    pub speaker_icon: String,
    pub entries: String,
    pub subscribe_form: String,
    pub email_input: String,
    pub status_message: String,
    pub theme_toggle: String,
    pub catalog: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            shell: "spa-content".to_string(),
            bottom_bar: "bottomBar".to_string(),
            track_list: "audioList".to_string(),
            progress: "progress".to_string(),
            progress_area: "progressBarArea".to_string(),
            play_button: "bottomPlayPause".to_string(),
            song_title: "songTitle".to_string(),
            close_button: "closeBtn".to_string(),
            loading_spinner: "loadingSpinner".to_string(),
            media: "activeMuxPlayer".to_string(),
            volume_control: "volumeControl".to_string(),
            volume_fader: "volumeFader".to_string(),
            volume_fill: "volumeFill".to_string(),
            speaker_icon: "speakerIcon".to_string(),
            entries: "entries".to_string(),
            subscribe_form: "subscribeForm".to_string(),
            email_input: "emailInput".to_string(),
            status_message: "statusMessage".to_string(),
            theme_toggle: "themeToggle".to_string(),
            catalog: "catalog".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Per-tab session storage slot holding the playback snapshot.
    pub snapshot: String,
    /// Long-lived local storage slot holding `dark` or `light`.
    pub theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            snapshot: "playbackState".to_string(),
            theme: "theme".to_string(),
        }
    }
}

/// All delays are in milliseconds except `seek_min_delta_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub snapshot_interval_ms: u32,
    pub play_retry_ms: u32,
    pub seek_frame_ms: f64,
    pub seek_min_delta_secs: f64,
    pub fader_mouse_hide_ms: u32,
    pub fader_touch_hide_ms: u32,
    pub volume_sweep_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            snapshot_interval_ms: 1000,
            play_retry_ms: 100,
            seek_frame_ms: 16.0,
            seek_min_delta_secs: 0.1,
            fader_mouse_hide_ms: 300,
            fader_touch_hide_ms: 1000,
            volume_sweep_ms: 500,
        }
    }
}

fn default_subscribe_endpoint() -> String {
    "/.netlify/functions/subscribe".to_string()
}

fn default_catalog_url() -> String {
    "/catalog.json".to_string()
}

fn default_probe_tag() -> String {
    "mux-player".to_string()
}

fn default_volume() -> f64 {
    0.75
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            storage: StorageKeys::default(),
            timings: Timings::default(),
            subscribe_endpoint: default_subscribe_endpoint(),
            catalog_url: default_catalog_url(),
            probe_tag: default_probe_tag(),
            default_volume: default_volume(),
            log_level: default_log_level(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: SiteConfig = serde_json::from_str(raw)?;
        config.default_volume = crate::utils::clamp_unit(config.default_volume);
        Ok(config)
    }

    /// Reads the embedded override. Missing means defaults; malformed is an
    /// error the caller reports once logging is up.
    #[cfg(target_arch = "wasm32")]
    pub fn from_document() -> Result<Self, ConfigError> {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.get_element_by_id("site-config"))
            .and_then(|el| el.text_content());
        match raw.filter(|text| !text.trim().is_empty()) {
            Some(raw) => Self::from_json(&raw),
            None => Ok(Self::default()),
        }
    }
}
