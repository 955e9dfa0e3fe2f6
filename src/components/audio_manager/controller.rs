// Playback controller: sole owner of the persistent media element.
use std::rc::Rc;

use crate::api::models::{Catalog, Track};
use crate::components::app_view::PageContext;
use crate::components::player::{PlayerView, PlayerViewModel};
use crate::config::Timings;
use crate::db::SnapshotStore;

use super::media_sink::{MediaEvent, MediaSink};
use super::seek::{position_for, FrameOutcome, SeekCoalescer, TrackGeometry};
use super::session::{PendingResume, PlaybackSession, ResumeOutcome};
use super::volume::{FaderInput, FaderUpdate, VolumeFader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayOrigin {
    /// A row was activated; a refusal is retried through the play button.
    Track,
    /// Resumption or an explicit toggle; a refusal leaves the track paused.
    Quiet,
}

/// The outstanding `play()` request. Rejections carrying any other id
/// belong to a superseded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPlay {
    request: u64,
    origin: PlayOrigin,
}

/// Frame bookkeeping the browser binding must perform after a drag sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragFrames {
    pub cancel_outstanding: bool,
    pub request: bool,
}

pub struct PlaybackController {
    session: PlaybackSession,
    sink: Rc<dyn MediaSink>,
    view: Rc<dyn PlayerView>,
    store: Rc<dyn SnapshotStore>,
    seek: SeekCoalescer,
    fader: VolumeFader,
    pending_play: Option<PendingPlay>,
    play_requests: u64,
    seek_min_delta: f64,
}

impl PlaybackController {
    pub fn new(
        sink: Rc<dyn MediaSink>,
        view: Rc<dyn PlayerView>,
        store: Rc<dyn SnapshotStore>,
        timings: &Timings,
        default_volume: f64,
    ) -> Self {
        Self {
            session: PlaybackSession::new(default_volume),
            sink,
            view,
            store,
            seek: SeekCoalescer::new(timings.seek_frame_ms),
            fader: VolumeFader::new(timings.fader_mouse_hide_ms, timings.fader_touch_hide_ms),
            pending_play: None,
            play_requests: 0,
            seek_min_delta: timings.seek_min_delta_secs,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn active_index(&self) -> Option<usize> {
        self.session.active_index()
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    /// Replace the visible list after a page swap. Playback is untouched and
    /// focus stays on the swapped page.
    pub fn set_track_list(&mut self, context: PageContext, tracks: Vec<Track>) {
        self.session.set_track_list(context, tracks);
        self.render();
    }

    /// Session-start resumption from the stored snapshot.
    pub fn resume(&mut self, catalog: &Catalog) -> ResumeOutcome {
        let Some(snapshot) = self.store.load() else {
            return ResumeOutcome::NoSnapshot;
        };

        if !catalog.contains_playback_id(&snapshot.playback_id) {
            tracing::info!(playback_id = %snapshot.playback_id, "snapshot track not in catalog, discarding");
            self.store.clear();
            return ResumeOutcome::Discarded;
        }

        let Some(index) = self.session.index_of(&snapshot.playback_id) else {
            if self.session.context().scopes_tracks() {
                tracing::info!(playback_id = %snapshot.playback_id, "dated page does not list snapshot track, clearing");
                self.store.clear();
                return ResumeOutcome::Cleared;
            }
            return ResumeOutcome::NotListed;
        };

        self.session.activate(index);

        if self.sink.bound_playback_id().as_deref() == Some(snapshot.playback_id.as_str()) {
            tracing::debug!(index, "media element already holds snapshot track");
            self.apply_volume();
            self.refresh();
            return ResumeOutcome::AlreadyLoaded { index };
        }

        if let Some(track) = self.session.track(index).cloned() {
            self.sink.bind(&track);
            self.sink.load();
        }
        self.session.set_pending_resume(Some(PendingResume {
            playback_id: snapshot.playback_id.clone(),
            position: snapshot.current_time,
            autoplay: snapshot.is_playing,
        }));
        tracing::info!(
            index,
            position = snapshot.current_time,
            autoplay = snapshot.is_playing,
            "resuming playback"
        );
        self.refresh();
        ResumeOutcome::Loading { index }
    }

    /// Start the row at `index` from zero.
    pub fn play_track(&mut self, index: usize) -> bool {
        let Some(track) = self.session.track(index).cloned() else {
            tracing::warn!(index, "play requested for a row that does not exist");
            return false;
        };

        self.sink.pause();
        self.sink.set_current_time(0.0);
        self.sink.bind(&track);
        self.sink.load();
        self.session.set_pending_resume(None);
        self.session.activate(index);
        self.apply_volume();

        self.request_play(PlayOrigin::Track);
        self.refresh();
        true
    }

    fn request_play(&mut self, origin: PlayOrigin) {
        self.play_requests += 1;
        let request = self.play_requests;
        self.pending_play = Some(PendingPlay { request, origin });
        self.sink.play(request);
    }

    /// Second fallback after a short delay: still paused means neither the
    /// direct play nor the first synthetic click took.
    pub fn retry_if_paused(&mut self) {
        if !self.session.has_active() {
            return;
        }
        if self.sink.is_paused() {
            tracing::debug!("playback still paused, retrying through the play button");
            self.view.click_play_button();
        }
        self.view.focus_play_button();
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.session.has_active() {
            return;
        }
        if self.sink.is_paused() {
            self.request_play(PlayOrigin::Quiet);
        } else {
            self.sink.pause();
        }
        self.refresh();
        self.view.focus_play_button();
    }

    pub fn close(&mut self) {
        if !self.session.has_active() {
            return;
        }
        self.sink.pause();
        self.session.clear_active();
        self.store.clear();
        self.pending_play = None;
        self.refresh();
    }

    /// Click-to-seek. Ignored until the duration is known.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if !self.session.has_active() {
            return;
        }
        if let Some(duration) = self.sink.duration() {
            self.sink.set_current_time(position_for(fraction, duration));
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.seek.is_dragging()
    }

    pub fn begin_drag(&mut self, geometry: TrackGeometry, client_x: f64) -> DragFrames {
        if !self.session.has_active() {
            return DragFrames::default();
        }
        let cancel_outstanding = self.seek.begin(geometry);
        DragFrames {
            cancel_outstanding,
            request: self.seek.sample(client_x),
        }
    }

    pub fn drag_to(&mut self, client_x: f64) -> DragFrames {
        DragFrames {
            cancel_outstanding: false,
            request: self.seek.sample(client_x),
        }
    }

    /// Flush the pending drag sample. Returns true when another frame is
    /// needed.
    pub fn on_seek_frame(&mut self, now_ms: f64) -> bool {
        match self.seek.on_frame(now_ms) {
            FrameOutcome::Idle => false,
            FrameOutcome::Reschedule => true,
            FrameOutcome::Apply(fraction) => {
                self.apply_drag_seek(fraction);
                false
            }
        }
    }

    fn apply_drag_seek(&mut self, fraction: f64) {
        if !self.session.has_active() {
            return;
        }
        let Some(duration) = self.sink.duration() else {
            return;
        };
        let target = position_for(fraction, duration);
        if (self.sink.current_time() - target).abs() > self.seek_min_delta {
            self.sink.set_current_time(target);
        }
    }

    /// Returns true when an outstanding frame must be cancelled.
    pub fn end_drag(&mut self) -> bool {
        self.seek.end()
    }

    pub fn volume(&self) -> f64 {
        self.session.volume()
    }

    pub fn set_volume(&mut self, level: f64) {
        let level = self.session.set_volume(level);
        self.apply_volume_level(level);
        self.view.apply_volume_to_page_media(level);
    }

    /// Push the current level to the fill indicator and the media element.
    pub fn apply_volume(&self) {
        self.apply_volume_level(self.session.volume());
    }

    fn apply_volume_level(&self, level: f64) {
        self.view.set_volume_fill(level * 100.0);
        self.sink.set_volume(level);
    }

    pub fn fader_input(&mut self, input: FaderInput) -> FaderUpdate {
        self.fader.handle(input)
    }

    pub fn fader_timer_fired(&mut self, token: u64) -> bool {
        self.fader.hide_timer_fired(token)
    }

    pub fn fader_dragging(&self) -> bool {
        self.fader.is_dragging()
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => {
                if self.session.has_active() {
                    let percent = match self.sink.duration() {
                        Some(duration) => (self.sink.current_time() / duration * 100.0).clamp(0.0, 100.0),
                        None => 0.0,
                    };
                    self.view.set_progress(percent);
                }
            }
            MediaEvent::Ended => {
                self.refresh();
                self.view.set_progress(0.0);
            }
            MediaEvent::Buffering => self.view.show_loading(true),
            MediaEvent::Play => self.refresh(),
            MediaEvent::Playing => {
                self.pending_play = None;
                self.view.show_loading(false);
                self.refresh();
            }
            MediaEvent::Pause => self.refresh(),
            MediaEvent::Error => {
                if let Some(active) = self.session.active() {
                    let message = format!(
                        "Failed to load \"{}\". Please try again later.",
                        active.track.title
                    );
                    tracing::error!(playback_id = %active.track.playback_id, "media playback error");
                    self.view.alert(&message);
                    self.sink.pause();
                }
                self.view.show_loading(false);
                self.refresh();
            }
            MediaEvent::LoadedMetadata => self.finish_resume(),
            MediaEvent::PlayRejected(request) => self.play_rejected(request),
        }
    }

    fn play_rejected(&mut self, request: u64) {
        match self.pending_play {
            Some(pending) if pending.request == request => {
                self.pending_play = None;
                if pending.origin == PlayOrigin::Track {
                    tracing::info!(request, "autoplay refused, retrying through the play button");
                    self.view.click_play_button();
                } else {
                    tracing::info!(request, "autoplay refused, leaving track paused");
                    self.refresh();
                }
            }
            _ => tracing::debug!(request, "rejection for a superseded play request ignored"),
        }
    }

    fn finish_resume(&mut self) {
        let bound = self.sink.bound_playback_id();
        let Some(pending) = self.session.take_pending_resume(bound.as_deref()) else {
            return;
        };
        self.sink.set_current_time(pending.position);
        self.apply_volume();
        if pending.autoplay {
            self.request_play(PlayOrigin::Quiet);
        }
        self.refresh();
    }

    /// Persist the active track's position. No-op without an active track.
    pub fn save_snapshot(&self) {
        let paused = self.sink.is_paused();
        if let Some(snapshot) = self.session.snapshot(self.sink.current_time(), !paused) {
            self.store.save(&snapshot);
        }
    }

    /// Project session + paused state onto the bar and the list, then focus
    /// the play button while the bar is up.
    pub fn refresh(&self) {
        if self.render().bar_visible {
            self.view.focus_play_button();
        }
    }

    fn render(&self) -> PlayerViewModel {
        let model = PlayerViewModel::project(&self.session, self.sink.is_paused());
        self.view.render(&model);
        model
    }
}
