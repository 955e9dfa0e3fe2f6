use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

use super::{PlayerView, PlayerViewModel};
use crate::components::audio_manager::{ControllerHandle, FaderInput, FaderUpdate, TrackGeometry};
use crate::components::dom::{defer, document, html_by_id, now_ms, set_prop, set_style, Listener};
use crate::config::ElementIds;

const ACTIVE_CLASS: &str = "active";

/// The persistent bottom bar, bound once per document.
pub struct DomPlayerView {
    bottom_bar: HtmlElement,
    play_button: HtmlElement,
    song_title: HtmlElement,
    progress: HtmlElement,
    spinner: Option<HtmlElement>,
    volume_fill: Option<HtmlElement>,
    rows: RefCell<Vec<Element>>,
    volume_sweep_ms: u32,
}

impl DomPlayerView {
    pub fn mount(ids: &ElementIds, volume_sweep_ms: u32) -> Option<Self> {
        Some(Self {
            bottom_bar: html_by_id(&ids.bottom_bar)?,
            play_button: html_by_id(&ids.play_button)?,
            song_title: html_by_id(&ids.song_title)?,
            progress: html_by_id(&ids.progress)?,
            spinner: html_by_id(&ids.loading_spinner),
            volume_fill: html_by_id(&ids.volume_fill),
            rows: RefCell::new(Vec::new()),
            volume_sweep_ms,
        })
    }

    /// Rows from the latest track list render, in list order.
    pub fn set_rows(&self, rows: Vec<Element>) {
        *self.rows.borrow_mut() = rows;
    }
}

fn sweep_page_media(level: f64) {
    let Some(elements) = document().and_then(|d| d.query_selector_all("audio, video").ok()) else {
        return;
    };
    for idx in 0..elements.length() {
        if let Some(node) = elements.item(idx) {
            let target = JsValue::from(node);
            set_prop(&target, "volume", &JsValue::from_f64(level));
            set_prop(&target, "muted", &JsValue::FALSE);
        }
    }
}

impl PlayerView for DomPlayerView {
    fn render(&self, model: &PlayerViewModel) {
        for (idx, row) in self.rows.borrow().iter().enumerate() {
            let _ = row
                .class_list()
                .toggle_with_force(ACTIVE_CLASS, model.highlighted == Some(idx));
        }
        self.play_button.set_inner_html(model.icon.svg());
        let _ = self.play_button.set_attribute("aria-label", model.icon.aria_label());
        self.song_title.set_text_content(Some(&model.title));
        set_style(
            &self.bottom_bar,
            "display",
            if model.bar_visible { "block" } else { "none" },
        );
    }

    fn set_progress(&self, percent: f64) {
        set_style(&self.progress, "width", &format!("{percent}%"));
    }

    fn show_loading(&self, visible: bool) {
        if let Some(spinner) = &self.spinner {
            set_style(spinner, "display", if visible { "block" } else { "none" });
        }
    }

    fn set_volume_fill(&self, percent: f64) {
        if let Some(fill) = &self.volume_fill {
            set_style(fill, "height", &format!("{percent}%"));
        }
    }

    fn apply_volume_to_page_media(&self, level: f64) {
        sweep_page_media(level);
        // Elements created after this call (late players) get a second pass.
        Timeout::new(self.volume_sweep_ms, move || sweep_page_media(level)).forget();
    }

    fn click_play_button(&self) {
        let button = self.play_button.clone();
        defer(move || button.click());
    }

    fn focus_play_button(&self) {
        let _ = self.play_button.focus();
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

fn geometry_of(element: &Element) -> TrackGeometry {
    let rect = element.get_bounding_client_rect();
    TrackGeometry {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// Client coordinates of a mouse event or of the first touch point.
fn client_point(event: &Event) -> Option<(f64, f64)> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event.touches().get(0)?;
        return Some((f64::from(touch.client_x()), f64::from(touch.client_y())));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
}

fn is_editable_target(event: &KeyboardEvent) -> bool {
    let Some(target) = event.target() else {
        return false;
    };

    let mut current = target.dyn_into::<Element>().ok();
    while let Some(element) = current {
        let tag = element.tag_name().to_ascii_lowercase();
        if tag == "input" || tag == "textarea" || tag == "select" {
            return true;
        }
        if element.has_attribute("contenteditable")
            && element
                .get_attribute("contenteditable")
                .map(|v| v.to_ascii_lowercase() != "false")
                .unwrap_or(true)
        {
            return true;
        }
        current = element.parent_element();
    }

    false
}

fn is_space(event: &KeyboardEvent) -> bool {
    event.code() == "Space" || event.key() == " "
}

fn supports_touch() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("ontouchstart")).unwrap_or(false))
        .unwrap_or(false)
}

/// Animation-frame driver for the drag-seek coalescer.
#[derive(Clone)]
struct SeekFrames {
    handle: ControllerHandle,
    frame: Rc<Cell<Option<i32>>>,
}

impl SeekFrames {
    fn request(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let frames = self.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            frames.frame.set(None);
            let again = frames
                .handle
                .try_with(|c| c.on_seek_frame(now_ms()))
                .unwrap_or(true);
            if again {
                frames.request();
            }
        });
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => self.frame.set(Some(id)),
            Err(err) => tracing::debug!(error = ?err, "requestAnimationFrame failed"),
        }
    }

    fn cancel(&self) {
        if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn apply(&self, frames: crate::components::audio_manager::DragFrames) {
        if frames.cancel_outstanding {
            self.cancel();
        }
        if frames.request {
            self.request();
        }
    }
}

fn apply_fader_update(handle: &ControllerHandle, fader: &Element, update: FaderUpdate) {
    let _ = fader
        .class_list()
        .toggle_with_force(ACTIVE_CLASS, update.visible);
    if let Some(timer) = update.schedule {
        let handle = handle.clone();
        let fader = fader.clone();
        Timeout::new(timer.delay_ms, move || {
            handle.with(move |c| {
                if c.fader_timer_fired(timer.token) {
                    let _ = fader.class_list().remove_1(ACTIVE_CLASS);
                }
            });
        })
        .forget();
    }
}

fn fader_input(handle: &ControllerHandle, fader: &Element, input: FaderInput) {
    let fader = fader.clone();
    let timer_handle = handle.clone();
    handle.with(move |c| {
        let update = c.fader_input(input);
        apply_fader_update(&timer_handle, &fader, update);
    });
}

fn set_volume_from(handle: &ControllerHandle, track: &Element, event: &Event) {
    let Some((_, client_y)) = client_point(event) else {
        return;
    };
    let level = geometry_of(track).fraction_at_y(client_y);
    handle.with(move |c| c.set_volume(level));
}

/// Listeners for the bottom bar. Dropping this detaches them.
pub struct PlayerControls {
    _listeners: Vec<Listener>,
}

/// Wire the play button, close button, progress bar, volume control and the
/// global Space shortcut to `handle`.
pub fn bind_controls(ids: &ElementIds, handle: &ControllerHandle) -> Option<PlayerControls> {
    let doc = document()?;
    let doc_target: web_sys::EventTarget = doc.clone().into();
    let mut listeners = Vec::new();

    if let Some(button) = html_by_id(&ids.play_button) {
        let handle = handle.clone();
        listeners.push(Listener::new(&button, "click", move |_| {
            handle.with(|c| c.toggle_play_pause());
        }));
    }

    if let Some(close) = html_by_id(&ids.close_button) {
        let handle = handle.clone();
        listeners.push(Listener::new(&close, "click", move |_| {
            handle.with(|c| c.close());
        }));
    }

    {
        let handle = handle.clone();
        listeners.push(Listener::new(&doc_target, "keydown", move |event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if !is_space(key_event) || key_event.default_prevented() || is_editable_target(key_event) {
                return;
            }
            let active = handle.try_with(|c| c.session().has_active()).unwrap_or(false);
            if active {
                event.prevent_default();
                handle.with(|c| c.toggle_play_pause());
            }
        }));
    }

    if let Some(area) = html_by_id(&ids.progress_area) {
        listeners.extend(bind_progress(&area, &doc_target, handle));
    }

    if let (Some(control), Some(fader)) = (html_by_id(&ids.volume_control), html_by_id(&ids.volume_fader)) {
        listeners.extend(bind_volume(
            &control,
            &fader,
            html_by_id(&ids.speaker_icon),
            &doc_target,
            handle,
        ));
    }

    Some(PlayerControls {
        _listeners: listeners,
    })
}

fn bind_progress(
    area: &HtmlElement,
    doc_target: &web_sys::EventTarget,
    handle: &ControllerHandle,
) -> Vec<Listener> {
    let frames = SeekFrames {
        handle: handle.clone(),
        frame: Rc::new(Cell::new(None)),
    };
    let mut listeners = Vec::new();

    {
        let handle = handle.clone();
        let area_el: Element = area.clone().into();
        listeners.push(Listener::new(area, "click", move |event| {
            let Some((client_x, _)) = client_point(&event) else {
                return;
            };
            let fraction = geometry_of(&area_el).fraction_at_x(client_x);
            handle.with(move |c| c.seek_to_fraction(fraction));
        }));
    }

    for start in ["mousedown", "touchstart"] {
        let frames = frames.clone();
        let area_el: Element = area.clone().into();
        listeners.push(Listener::active(area, start, move |event| {
            let Some((client_x, _)) = client_point(&event) else {
                return;
            };
            let geometry = geometry_of(&area_el);
            let started = frames.handle.try_with(|c| {
                let requests = c.begin_drag(geometry, client_x);
                (c.is_dragging(), requests)
            });
            if let Some((true, requests)) = started {
                frames.apply(requests);
                event.prevent_default();
            }
        }));
    }

    for moved in ["mousemove", "touchmove"] {
        let frames = frames.clone();
        listeners.push(Listener::active(doc_target, moved, move |event| {
            let dragging = frames.handle.try_with(|c| c.is_dragging()).unwrap_or(false);
            if !dragging {
                return;
            }
            if let Some((client_x, _)) = client_point(&event) {
                if let Some(requests) = frames.handle.try_with(|c| c.drag_to(client_x)) {
                    frames.apply(requests);
                }
            }
            event.prevent_default();
        }));
    }

    for end in ["mouseup", "touchend"] {
        let frames = frames.clone();
        listeners.push(Listener::new(doc_target, end, move |_| {
            let cancel = frames.handle.try_with(|c| c.end_drag()).unwrap_or(false);
            if cancel {
                frames.cancel();
            }
        }));
    }

    listeners
}

fn bind_volume(
    control: &HtmlElement,
    fader: &HtmlElement,
    speaker: Option<HtmlElement>,
    doc_target: &web_sys::EventTarget,
    handle: &ControllerHandle,
) -> Vec<Listener> {
    let fader_el: Element = fader.clone().into();
    let mut listeners = Vec::new();

    for (event, input) in [
        ("mouseenter", FaderInput::PointerEnter),
        ("mouseleave", FaderInput::PointerLeave),
    ] {
        let handle = handle.clone();
        let fader_el = fader_el.clone();
        listeners.push(Listener::new(control, event, move |_| {
            fader_input(&handle, &fader_el, input);
        }));
    }

    if let Ok(Some(track)) = fader.query_selector(".volume-track") {
        {
            let handle = handle.clone();
            let fader_el = fader_el.clone();
            let track_el = track.clone();
            listeners.push(Listener::new(&track, "mousedown", move |event| {
                fader_input(&handle, &fader_el, FaderInput::DragStart);
                set_volume_from(&handle, &track_el, &event);
                event.prevent_default();
            }));
        }
        {
            let handle = handle.clone();
            let track_el = track.clone();
            listeners.push(Listener::new(&track, "mousemove", move |event| {
                if handle.try_with(|c| c.fader_dragging()).unwrap_or(false) {
                    set_volume_from(&handle, &track_el, &event);
                }
            }));
        }
        {
            let handle = handle.clone();
            let track_el = track.clone();
            listeners.push(Listener::new(&track, "click", move |event| {
                if !handle.try_with(|c| c.fader_dragging()).unwrap_or(true) {
                    set_volume_from(&handle, &track_el, &event);
                }
            }));
        }
        {
            let handle = handle.clone();
            let fader_el = fader_el.clone();
            listeners.push(Listener::new(doc_target, "mouseup", move |_| {
                fader_input(&handle, &fader_el, FaderInput::MouseDragEnd);
            }));
        }
        {
            let handle = handle.clone();
            let fader_el = fader_el.clone();
            let track_el = track.clone();
            listeners.push(Listener::active(&track, "touchstart", move |event| {
                fader_input(&handle, &fader_el, FaderInput::DragStart);
                set_volume_from(&handle, &track_el, &event);
                event.prevent_default();
                event.stop_propagation();
            }));
        }
        {
            let handle = handle.clone();
            let track_el = track.clone();
            listeners.push(Listener::active(&track, "touchmove", move |event| {
                if handle.try_with(|c| c.fader_dragging()).unwrap_or(false) {
                    set_volume_from(&handle, &track_el, &event);
                    event.prevent_default();
                    event.stop_propagation();
                }
            }));
        }
        {
            let handle = handle.clone();
            let fader_el = fader_el.clone();
            listeners.push(Listener::active(&track, "touchend", move |event| {
                event.prevent_default();
                fader_input(&handle, &fader_el, FaderInput::TouchEnd);
            }));
        }
    }

    let touch = supports_touch();

    if let Some(speaker) = speaker {
        let handle_click = handle.clone();
        let fader_click = fader_el.clone();
        listeners.push(Listener::new(&speaker, "click", move |event| {
            event.stop_propagation();
            fader_input(&handle_click, &fader_click, FaderInput::SpeakerToggle);
        }));
        if touch {
            let handle = handle.clone();
            let fader_el = fader_el.clone();
            listeners.push(Listener::active(&speaker, "touchstart", move |event| {
                event.stop_propagation();
                event.prevent_default();
                fader_input(&handle, &fader_el, FaderInput::SpeakerToggle);
            }));
        }
    }

    let outside_events: &[&'static str] = if touch { &["click", "touchstart"] } else { &["click"] };
    for &name in outside_events {
        let handle = handle.clone();
        let fader_el = fader_el.clone();
        let control = control.clone();
        listeners.push(Listener::new(doc_target, name, move |event| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                .map(|node| control.contains(Some(&node)))
                .unwrap_or(false);
            if !inside {
                fader_input(&handle, &fader_el, FaderInput::Outside);
            }
        }));
    }

    listeners
}
