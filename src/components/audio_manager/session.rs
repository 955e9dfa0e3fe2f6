// Playback session: the track list on screen and what is loaded in the
// persistent media element.
use crate::api::models::Track;
use crate::components::app_view::PageContext;
use crate::db::PlaybackSnapshot;

/// The loaded track and where it sits in the current list, if it is listed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrack {
    pub track: Track,
    pub list_index: Option<usize>,
}

/// Position to restore once the media element reports metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResume {
    pub playback_id: String,
    pub position: f64,
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    NoSnapshot,
    /// Snapshot names a track the catalog no longer has.
    Discarded,
    /// Dated page that does not list the snapshot's track.
    Cleared,
    /// Listed nowhere on this undated page; snapshot kept.
    NotListed,
    /// Element already had the track; only the UI was synced.
    AlreadyLoaded { index: usize },
    /// Track bound and loading; position restores on metadata.
    Loading { index: usize },
}

#[derive(Debug, Clone)]
pub struct PlaybackSession {
    context: PageContext,
    tracks: Vec<Track>,
    active: Option<ActiveTrack>,
    volume: f64,
    pending_resume: Option<PendingResume>,
}

impl PlaybackSession {
    pub fn new(volume: f64) -> Self {
        Self {
            context: PageContext::AllTracks,
            tracks: Vec::new(),
            active: None,
            volume: crate::utils::clamp_unit(volume),
            pending_resume: None,
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn index_of(&self, playback_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.playback_id == playback_id)
    }

    /// Swap in a new page's list. The active track survives; only its list
    /// position is re-resolved.
    pub fn set_track_list(&mut self, context: PageContext, tracks: Vec<Track>) {
        self.context = context;
        self.tracks = tracks;
        if let Some(active) = self.active.as_mut() {
            active.list_index = self
                .tracks
                .iter()
                .position(|t| t.playback_id == active.track.playback_id);
        }
    }

    pub fn activate(&mut self, index: usize) -> Option<&ActiveTrack> {
        let track = self.tracks.get(index)?.clone();
        self.active = Some(ActiveTrack {
            track,
            list_index: Some(index),
        });
        self.active.as_ref()
    }

    pub fn clear_active(&mut self) {
        self.active = None;
        self.pending_resume = None;
    }

    pub fn active(&self) -> Option<&ActiveTrack> {
        self.active.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().and_then(|a| a.list_index)
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.volume = crate::utils::clamp_unit(volume);
        self.volume
    }

    pub fn set_pending_resume(&mut self, pending: Option<PendingResume>) {
        self.pending_resume = pending;
    }

    pub fn take_pending_resume(&mut self, bound_id: Option<&str>) -> Option<PendingResume> {
        match (&self.pending_resume, bound_id) {
            (Some(pending), Some(id)) if pending.playback_id == id => self.pending_resume.take(),
            _ => None,
        }
    }

    pub fn snapshot(&self, current_time: f64, is_playing: bool) -> Option<PlaybackSnapshot> {
        let active = self.active.as_ref()?;
        Some(PlaybackSnapshot {
            playback_id: active.track.playback_id.clone(),
            title: active.track.title.clone(),
            current_time: if current_time.is_finite() { current_time.max(0.0) } else { 0.0 },
            is_playing,
        })
    }
}
