use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::api::models::{Catalog, Track};
use crate::components::app_view::PageContext;
use crate::components::player::{PlayerView, PlayerViewModel};
use crate::config::Timings;
use crate::db::{MemorySnapshotStore, SnapshotStore};

use super::controller::PlaybackController;
use super::media_sink::MediaSink;

pub fn catalog() -> Catalog {
    Catalog::from_json(
        r#"[
            { "page": "2.25.26", "tracks": [ { "title": "sometimes (2.24.26)", "playbackId": "P" } ] },
            { "page": "11.29.25", "tracks": [ { "title": "fire escape", "playbackId": "F" } ] },
            { "page": "11.28.25", "tracks": [ { "title": "sometimes", "playbackId": "X" } ] }
        ]"#,
    )
    .unwrap()
}

pub struct FakeSink {
    bound: RefCell<Option<String>>,
    title: RefCell<Option<String>>,
    loads: Cell<u32>,
    play_calls: Cell<u32>,
    last_request: Cell<Option<u64>>,
    refuse_play: Cell<bool>,
    paused: Cell<bool>,
    time: Cell<f64>,
    duration: Cell<Option<f64>>,
    volume: Cell<Option<f64>>,
}

impl Default for FakeSink {
    fn default() -> Self {
        Self {
            bound: RefCell::new(None),
            title: RefCell::new(None),
            loads: Cell::new(0),
            play_calls: Cell::new(0),
            last_request: Cell::new(None),
            refuse_play: Cell::new(false),
            paused: Cell::new(true),
            time: Cell::new(0.0),
            duration: Cell::new(None),
            volume: Cell::new(None),
        }
    }
}

impl FakeSink {
    pub fn bound(&self) -> Option<String> {
        self.bound.borrow().clone()
    }
    pub fn title(&self) -> Option<String> {
        self.title.borrow().clone()
    }
    pub fn loads(&self) -> u32 {
        self.loads.get()
    }
    pub fn play_calls(&self) -> u32 {
        self.play_calls.get()
    }
    /// Id passed to the most recent `play()`.
    pub fn last_request(&self) -> Option<u64> {
        self.last_request.get()
    }
    pub fn refuse_play(&self, refuse: bool) {
        self.refuse_play.set(refuse);
    }
    pub fn time(&self) -> f64 {
        self.time.get()
    }
    pub fn set_time(&self, seconds: f64) {
        self.time.set(seconds);
    }
    pub fn set_duration(&self, duration: Option<f64>) {
        self.duration.set(duration);
    }
    pub fn volume(&self) -> Option<f64> {
        self.volume.get()
    }
}

impl MediaSink for FakeSink {
    fn bound_playback_id(&self) -> Option<String> {
        self.bound()
    }
    fn bind(&self, track: &Track) {
        *self.bound.borrow_mut() = Some(track.playback_id.clone());
        *self.title.borrow_mut() = Some(track.title.clone());
    }
    fn load(&self) {
        self.loads.set(self.loads.get() + 1);
    }
    fn play(&self, request: u64) {
        self.play_calls.set(self.play_calls.get() + 1);
        self.last_request.set(Some(request));
        if !self.refuse_play.get() {
            self.paused.set(false);
        }
    }
    fn pause(&self) {
        self.paused.set(true);
    }
    fn is_paused(&self) -> bool {
        self.paused.get()
    }
    fn current_time(&self) -> f64 {
        self.time.get()
    }
    fn set_current_time(&self, seconds: f64) {
        self.time.set(seconds);
    }
    fn duration(&self) -> Option<f64> {
        self.duration.get()
    }
    fn set_volume(&self, level: f64) {
        self.volume.set(Some(level));
    }
}

#[derive(Default)]
pub struct FakeView {
    models: RefCell<Vec<PlayerViewModel>>,
    progress: Cell<Option<f64>>,
    loading: Cell<bool>,
    volume_fill: Cell<Option<f64>>,
    page_volume: Cell<Option<f64>>,
    play_clicks: Cell<u32>,
    focuses: Cell<u32>,
    alerts: RefCell<Vec<String>>,
}

impl FakeView {
    pub fn last_model(&self) -> Option<PlayerViewModel> {
        self.models.borrow().last().cloned()
    }
    pub fn renders(&self) -> usize {
        self.models.borrow().len()
    }
    pub fn progress(&self) -> Option<f64> {
        self.progress.get()
    }
    pub fn loading(&self) -> bool {
        self.loading.get()
    }
    pub fn volume_fill(&self) -> Option<f64> {
        self.volume_fill.get()
    }
    pub fn page_volume(&self) -> Option<f64> {
        self.page_volume.get()
    }
    pub fn play_clicks(&self) -> u32 {
        self.play_clicks.get()
    }
    pub fn focuses(&self) -> u32 {
        self.focuses.get()
    }
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl PlayerView for FakeView {
    fn render(&self, model: &PlayerViewModel) {
        self.models.borrow_mut().push(model.clone());
    }
    fn set_progress(&self, percent: f64) {
        self.progress.set(Some(percent));
    }
    fn show_loading(&self, visible: bool) {
        self.loading.set(visible);
    }
    fn set_volume_fill(&self, percent: f64) {
        self.volume_fill.set(Some(percent));
    }
    fn apply_volume_to_page_media(&self, level: f64) {
        self.page_volume.set(Some(level));
    }
    fn click_play_button(&self) {
        self.play_clicks.set(self.play_clicks.get() + 1);
    }
    fn focus_play_button(&self) {
        self.focuses.set(self.focuses.get() + 1);
    }
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

pub struct Fixture {
    pub controller: PlaybackController,
    pub sink: Rc<FakeSink>,
    pub view: Rc<FakeView>,
    pub store: Rc<MemorySnapshotStore>,
}

/// Controller showing the list a page titled `title` would show.
pub fn fixture(title: &str) -> Fixture {
    let sink = Rc::new(FakeSink::default());
    let view = Rc::new(FakeView::default());
    let store = Rc::new(MemorySnapshotStore::new());
    let sink_dyn: Rc<dyn MediaSink> = sink.clone();
    let view_dyn: Rc<dyn PlayerView> = view.clone();
    let store_dyn: Rc<dyn SnapshotStore> = store.clone();
    let mut controller =
        PlaybackController::new(sink_dyn, view_dyn, store_dyn, &Timings::default(), 0.75);
    let context = PageContext::from_title(title);
    let tracks = context.tracks(&catalog());
    controller.set_track_list(context, tracks);
    Fixture {
        controller,
        sink,
        view,
        store,
    }
}
