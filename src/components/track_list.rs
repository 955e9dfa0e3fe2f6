//! Track list rows for the current page context, plus the hidden probes that
//! fill in each row's duration.

use crate::api::models::Track;

pub const ROW_CLASS: &str = "page-song-title";
pub const DURATION_CLASS: &str = "song-duration";
pub const CONTAINER_CLASS: &str = "mux-audio-container";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackListItem {
    pub index: usize,
    pub title: String,
    pub playback_id: String,
    pub element_id: String,
    pub aria_label: String,
}

/// Row ids are 1-based: `pageSongTitle1`, `pageSongTitle2`, ...
pub fn element_id(index: usize) -> String {
    format!("pageSongTitle{}", index + 1)
}

pub fn build_items(tracks: &[Track]) -> Vec<TrackListItem> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| TrackListItem {
            index,
            title: track.title.clone(),
            playback_id: track.playback_id.clone(),
            element_id: element_id(index),
            aria_label: format!("Play {}", track.title),
        })
        .collect()
}

/// How a row was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTrigger {
    Click,
    /// Enter or Space while the row has focus.
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Start the row from zero.
    Start(usize),
    /// The row is already loaded; flip play/pause instead of restarting.
    Toggle,
}

/// A click always restarts its row. Only the keyboard toggles the row that is
/// already active.
pub fn activation_for(trigger: RowTrigger, index: usize, active_index: Option<usize>) -> Activation {
    match trigger {
        RowTrigger::Key if active_index == Some(index) => Activation::Toggle,
        _ => Activation::Start(index),
    }
}

pub fn key_activates(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Element, HtmlElement, KeyboardEvent};

    use super::{key_activates, RowTrigger, TrackListItem, CONTAINER_CLASS, DURATION_CLASS, ROW_CLASS};
    use crate::api::models::{format_duration, DURATION_PLACEHOLDER};
    use crate::components::dom::{document, get_f64, set_prop, set_style, Listener};

    pub type ActivateHandler = Rc<dyn Fn(usize, RowTrigger)>;

    /// Muted, hidden media element used only to learn one duration. Removed
    /// on metadata, on error, or when the list is rebuilt.
    struct DurationProbe {
        element: Element,
        _listeners: [Listener; 2],
    }

    impl Drop for DurationProbe {
        fn drop(&mut self) {
            self.element.remove();
        }
    }

    /// Rows produced by one render; highlighting goes through `rows`.
    pub struct RenderedTrackList {
        rows: Vec<Element>,
        _listeners: Vec<Listener>,
        _probes: Vec<DurationProbe>,
    }

    impl RenderedTrackList {
        pub fn rows(&self) -> &[Element] {
            &self.rows
        }
    }

    /// Rebuild `container` from `items`. A container hidden with
    /// `display: none` is left untouched and yields `None`.
    pub fn render_track_list(
        container: &HtmlElement,
        items: &[TrackListItem],
        probe_tag: &str,
        on_activate: ActivateHandler,
    ) -> Option<RenderedTrackList> {
        if container
            .style()
            .get_property_value("display")
            .map(|display| display == "none")
            .unwrap_or(false)
        {
            return None;
        }
        let doc = document()?;
        container.set_inner_html("");

        let mut rows = Vec::with_capacity(items.len());
        let mut listeners = Vec::with_capacity(items.len() * 2);
        let mut labels = Vec::with_capacity(items.len());

        for item in items {
            let row = doc.create_element("span").ok()?;
            row.set_class_name(ROW_CLASS);
            row.set_id(&item.element_id);
            let _ = row.set_attribute("tabindex", "0");
            let _ = row.set_attribute("role", "button");
            let _ = row.set_attribute("aria-label", &item.aria_label);

            let name = doc.create_element("span").ok()?;
            name.set_text_content(Some(&item.title));
            let duration = doc.create_element("span").ok()?;
            duration.set_class_name(DURATION_CLASS);
            duration.set_text_content(Some(DURATION_PLACEHOLDER));
            let _ = row.append_child(&name);
            let _ = row.append_child(&duration);

            let index = item.index;
            let on_click = on_activate.clone();
            listeners.push(Listener::new(&row, "click", move |_| on_click(index, RowTrigger::Click)));
            let on_key = on_activate.clone();
            listeners.push(Listener::new(&row, "keydown", move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                    return;
                };
                if key_activates(&key) {
                    event.prevent_default();
                    on_key(index, RowTrigger::Key);
                }
            }));

            let wrapper = doc.create_element("div").ok()?;
            wrapper.set_class_name(CONTAINER_CLASS);
            if index > 0 {
                let _ = wrapper.set_attribute("style", "margin-top: 32px");
            }
            let _ = wrapper.append_child(&row);
            let _ = container.append_child(&wrapper);

            rows.push(row);
            labels.push(duration);
        }

        let probes = items
            .iter()
            .zip(labels)
            .filter_map(|(item, label)| spawn_probe(probe_tag, item, label))
            .collect();

        tracing::debug!(rows = rows.len(), "track list rendered");
        Some(RenderedTrackList {
            rows,
            _listeners: listeners,
            _probes: probes,
        })
    }

    fn spawn_probe(tag: &str, item: &TrackListItem, label: Element) -> Option<DurationProbe> {
        let doc = document()?;
        let body = doc.body()?;
        let probe = doc.create_element(tag).ok()?;
        let _ = probe.set_attribute("playback-id", &item.playback_id);
        let _ = probe.set_attribute("metadata-video-title", &item.title);
        if let Some(html) = probe.dyn_ref::<HtmlElement>() {
            set_style(html, "display", "none");
        }
        set_prop(&probe, "muted", &JsValue::TRUE);

        let on_metadata = {
            let target = probe.clone();
            Listener::new(&probe, "loadedmetadata", move |_| {
                if let Some(text) = get_f64(&target, "duration").and_then(format_duration) {
                    label.set_text_content(Some(&text));
                }
                target.remove();
            })
        };
        let on_error = {
            let target = probe.clone();
            let playback_id = item.playback_id.clone();
            Listener::new(&probe, "error", move |_| {
                tracing::debug!(playback_id = %playback_id, "duration probe failed");
                target.remove();
            })
        };
        body.append_child(&probe).ok()?;
        Some(DurationProbe {
            element: probe,
            _listeners: [on_metadata, on_error],
        })
    }
}
