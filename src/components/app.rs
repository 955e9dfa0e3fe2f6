//! Browser boot: mounts the shell, builds the controller around the
//! persistent media element and hands page lifecycle to the router.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, MouseEvent};

use crate::api::models::Catalog;
use crate::api::pages::{fetch_catalog, parse_catalog, HttpPageFetcher};
use crate::components::app_view::{context_label, PageContext};
use crate::components::audio_manager::{
    ControllerHandle, MediaEvent, MediaSink, MuxMediaSink, PlaybackController, MEDIA_DOM_EVENTS,
};
use crate::components::dom::{document, html_by_id, Listener};
use crate::components::entries::populate_entries;
use crate::components::navigation::{ensure_shell, ClickInfo, PageLifecycle, Router, WebNavigationHost};
use crate::components::player::{bind_controls, DomPlayerView, PlayerControls, PlayerView};
use crate::components::subscribe_form::bind_subscribe_form;
use crate::components::theme::init_theme;
use crate::components::track_list::{
    activation_for, build_items, render_track_list, Activation, RenderedTrackList, RowTrigger,
};
use crate::config::SiteConfig;
use crate::db::{MemorySnapshotStore, SessionSnapshotStore, SnapshotStore};

/// Playback wiring; absent on pages that ship without the bottom bar.
#[derive(Clone)]
struct Playback {
    handle: ControllerHandle,
    view: Rc<DomPlayerView>,
}

/// Listeners owned by the page currently in the shell. Replaced wholesale on
/// every re-initialization.
#[derive(Default)]
struct PageBindings {
    theme: Option<Listener>,
    subscribe: Option<Listener>,
    tracks: Option<RenderedTrackList>,
}

struct SiteLifecycle {
    config: Rc<SiteConfig>,
    catalog: Rc<Catalog>,
    playback: Option<Playback>,
    bindings: RefCell<PageBindings>,
}

fn activate_row(playback: &Playback, index: usize, trigger: RowTrigger, retry_ms: u32) {
    let handle = playback.handle.clone();
    playback.handle.with(move |c| match activation_for(trigger, index, c.active_index()) {
        Activation::Toggle => c.toggle_play_pause(),
        Activation::Start(index) => {
            if c.play_track(index) {
                Timeout::new(retry_ms, move || handle.with(|c| c.retry_if_paused())).forget();
            }
        }
    });
}

impl PageLifecycle for SiteLifecycle {
    fn apply_theme(&self) {
        let ids = &self.config.elements;
        self.bindings.borrow_mut().theme = init_theme(&ids.theme_toggle, &self.config.storage.theme);
    }

    fn populate_index(&self) {
        let added = populate_entries(&self.config.elements.entries, &self.catalog);
        if added > 0 {
            tracing::debug!(added, "page index populated");
        }
    }

    fn bind_subscribe_form(&self) {
        self.bindings.borrow_mut().subscribe =
            bind_subscribe_form(&self.config.elements, &self.config.subscribe_endpoint);
    }

    fn rebuild_track_list(&self, context: &PageContext) {
        let tracks = context.tracks(&self.catalog);
        tracing::info!(context = context_label(context), tracks = tracks.len(), "rebuilding track list");

        let Some(playback) = self.playback.clone() else {
            return;
        };

        let items = build_items(&tracks);
        let retry_ms = self.config.timings.play_retry_ms;
        let on_activate = {
            let playback = playback.clone();
            Rc::new(move |index: usize, trigger: RowTrigger| activate_row(&playback, index, trigger, retry_ms))
        };
        let rendered = html_by_id(&self.config.elements.track_list).and_then(|container| {
            render_track_list(&container, &items, &self.config.probe_tag, on_activate)
        });
        playback
            .view
            .set_rows(rendered.as_ref().map(|r| r.rows().to_vec()).unwrap_or_default());
        self.bindings.borrow_mut().tracks = rendered;

        let context = context.clone();
        playback.handle.with(move |c| c.set_track_list(context, tracks));
    }
}

/// Long-lived pieces kept alive for the lifetime of the document.
struct App {
    _router: Router,
    _lifecycle: Rc<SiteLifecycle>,
    _controls: Option<PlayerControls>,
    _listeners: Vec<Listener>,
    _autosave: Option<Interval>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

async fn load_catalog(config: &SiteConfig) -> Catalog {
    let embedded = document()
        .and_then(|doc| doc.get_element_by_id(&config.elements.catalog))
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty());
    let catalog = match embedded {
        Some(raw) => parse_catalog(&raw),
        None => fetch_catalog(&config.catalog_url).await,
    };
    catalog.unwrap_or_default()
}

fn open_snapshot_store(key: &str) -> Rc<dyn SnapshotStore> {
    match SessionSnapshotStore::open(key) {
        Some(store) => Rc::new(store),
        None => {
            tracing::warn!("session storage unavailable, playback will not survive reloads");
            Rc::new(MemorySnapshotStore::new())
        }
    }
}

fn mount_playback(config: &SiteConfig, listeners: &mut Vec<Listener>) -> Option<Playback> {
    let ids = &config.elements;
    let Some(media) = html_by_id(&ids.media) else {
        tracing::warn!(id = %ids.media, "no media element, playback disabled");
        return None;
    };
    let Some(view) = DomPlayerView::mount(ids, config.timings.volume_sweep_ms) else {
        tracing::warn!(id = %ids.bottom_bar, "bottom bar incomplete, playback disabled");
        return None;
    };
    let view = Rc::new(view);
    let sink = Rc::new(MuxMediaSink::new(media.clone()));

    let sink_dyn: Rc<dyn MediaSink> = sink.clone();
    let view_dyn: Rc<dyn PlayerView> = view.clone();
    let controller = PlaybackController::new(
        sink_dyn,
        view_dyn,
        open_snapshot_store(&config.storage.snapshot),
        &config.timings,
        config.default_volume,
    );
    let handle = ControllerHandle::new(controller);

    {
        let handle = handle.clone();
        sink.set_event_handler(Rc::new(move |event: MediaEvent| {
            handle.with(move |c| c.handle_media_event(event));
        }));
    }
    for name in MEDIA_DOM_EVENTS {
        let Some(event) = MediaEvent::from_dom_event(name) else {
            continue;
        };
        let handle = handle.clone();
        listeners.push(Listener::new(&media, name, move |_| {
            handle.with(move |c| c.handle_media_event(event));
        }));
    }

    Some(Playback { handle, view })
}

async fn start(config: SiteConfig) {
    let ids = config.elements.clone();
    if let Err(err) = ensure_shell(&ids.shell, &ids.bottom_bar) {
        tracing::error!(error = %err, "could not mount content shell, leaving page static");
        return;
    }

    let catalog = Rc::new(load_catalog(&config).await);
    tracing::info!(pages = catalog.pages().count(), "catalog loaded");

    let mut listeners = Vec::new();
    let playback = mount_playback(&config, &mut listeners);
    let config = Rc::new(config);

    let lifecycle = Rc::new(SiteLifecycle {
        config: config.clone(),
        catalog: catalog.clone(),
        playback: playback.clone(),
        bindings: RefCell::new(PageBindings::default()),
    });
    let router = Router::new(
        Rc::new(WebNavigationHost::new(ids.shell.clone(), ids.bottom_bar.clone())),
        Rc::new(HttpPageFetcher),
        lifecycle.clone(),
    );

    let Some(doc) = document() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let doc_target: EventTarget = doc.clone().into();
    let window_target: EventTarget = window.into();

    {
        let router = router.clone();
        listeners.push(Listener::new(&doc_target, "click", move |event| {
            let Some(click) = event.dyn_ref::<MouseEvent>().and_then(ClickInfo::from_mouse_event) else {
                return;
            };
            if let Some(url) = router.intercept(&click) {
                event.prevent_default();
                let router = router.clone();
                wasm_bindgen_futures::spawn_local(async move { router.navigate(url).await });
            }
        }));
    }
    {
        let router = router.clone();
        listeners.push(Listener::new(&window_target, "popstate", move |_| {
            let router = router.clone();
            wasm_bindgen_futures::spawn_local(async move { router.handle_pop_state().await });
        }));
    }

    router.reinitialize(&doc.title());

    let mut controls = None;
    let mut autosave = None;
    if let Some(playback) = playback {
        let handle = playback.handle.clone();
        let volume = config.default_volume;
        let resume_catalog = catalog.clone();
        handle.with(move |c| {
            c.set_volume(volume);
            let outcome = c.resume(&resume_catalog);
            tracing::debug!(?outcome, "session start resumption");
        });

        controls = bind_controls(&ids, &handle);

        let save_handle = handle.clone();
        autosave = Some(Interval::new(config.timings.snapshot_interval_ms, move || {
            save_handle.with(|c| c.save_snapshot());
        }));

        // Synchronous: deferred work would not run before the tab goes away.
        listeners.push(Listener::new(&window_target, "beforeunload", move |_| {
            let _ = handle.try_with(|c| c.save_snapshot());
        }));
    }

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            _router: router,
            _lifecycle: lifecycle,
            _controls: controls,
            _listeners: listeners,
            _autosave: autosave,
        });
    });
    tracing::info!("player ready");
}

pub fn boot() {
    let (config, config_error) = match SiteConfig::from_document() {
        Ok(config) => (config, None),
        Err(err) => (SiteConfig::default(), Some(err)),
    };
    crate::diagnostics::init(&config.log_level);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "ignoring malformed site config");
    }
    wasm_bindgen_futures::spawn_local(start(config));
}
