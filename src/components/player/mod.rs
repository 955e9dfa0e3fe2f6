use crate::components::audio_manager::PlaybackSession;
use crate::components::icons::PlayIcon;

#[cfg(target_arch = "wasm32")]
mod controls;

#[cfg(target_arch = "wasm32")]
pub use controls::*;

/// Everything `updateUI` writes, derived from the session and the element's
/// paused flag alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerViewModel {
    pub bar_visible: bool,
    pub title: String,
    pub icon: PlayIcon,
    /// List row highlighted as playing. Set only while actually playing.
    pub highlighted: Option<usize>,
}

impl PlayerViewModel {
    pub fn project(session: &PlaybackSession, paused: bool) -> Self {
        let Some(active) = session.active() else {
            return Self {
                bar_visible: false,
                title: String::new(),
                icon: PlayIcon::Play,
                highlighted: None,
            };
        };
        Self {
            bar_visible: true,
            title: active.track.title.clone(),
            icon: if paused { PlayIcon::Play } else { PlayIcon::Pause },
            highlighted: if paused { None } else { active.list_index },
        }
    }
}

/// Visible surface of the persistent bottom bar and track rows.
pub trait PlayerView {
    fn render(&self, model: &PlayerViewModel);
    fn set_progress(&self, percent: f64);
    fn show_loading(&self, visible: bool);
    fn set_volume_fill(&self, percent: f64);
    /// Best-effort volume for every other audio/video element on the page.
    fn apply_volume_to_page_media(&self, level: f64);
    /// Synthetic click on the play/pause control, dispatched after the
    /// current call stack unwinds.
    fn click_play_button(&self);
    fn focus_play_button(&self);
    fn alert(&self, message: &str);
}
