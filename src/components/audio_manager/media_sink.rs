// The one capability surface the controller drives, whatever tag backs it.
use crate::api::models::Track;

/// Media element lifecycle notifications fed back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    TimeUpdate,
    Ended,
    /// `waiting` or `stalled`.
    Buffering,
    /// `play`: the element left the paused state.
    Play,
    Playing,
    Pause,
    Error,
    LoadedMetadata,
    /// The platform refused the `play()` request with this id.
    PlayRejected(u64),
}

impl MediaEvent {
    pub fn from_dom_event(name: &str) -> Option<Self> {
        Some(match name {
            "timeupdate" => MediaEvent::TimeUpdate,
            "ended" => MediaEvent::Ended,
            "waiting" | "stalled" => MediaEvent::Buffering,
            "play" => MediaEvent::Play,
            "playing" => MediaEvent::Playing,
            "pause" => MediaEvent::Pause,
            "error" => MediaEvent::Error,
            "loadedmetadata" => MediaEvent::LoadedMetadata,
            _ => return None,
        })
    }
}

pub const MEDIA_DOM_EVENTS: [&str; 9] = [
    "timeupdate",
    "ended",
    "waiting",
    "stalled",
    "play",
    "playing",
    "pause",
    "error",
    "loadedmetadata",
];

/// Playable media sink: uniform volume/currentTime/play/pause surface.
pub trait MediaSink {
    fn bound_playback_id(&self) -> Option<String>;
    fn bind(&self, track: &Track);
    fn load(&self);
    /// Request playback. A refusal arrives later as
    /// `MediaEvent::PlayRejected(request)`.
    fn play(&self, request: u64);
    fn pause(&self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// Known, finite, positive duration.
    fn duration(&self) -> Option<f64>;
    /// Apply a level in `[0, 1]` and unmute.
    fn set_volume(&self, level: f64);
}

#[cfg(target_arch = "wasm32")]
pub use web::MuxMediaSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::HtmlElement;

    use super::{MediaEvent, MediaSink};
    use crate::api::models::Track;
    use crate::components::dom::{call_method, get_f64, get_prop, set_prop};

    pub const PLAYBACK_ID_ATTR: &str = "playback-id";
    pub const TITLE_ATTR: &str = "metadata-video-title";

    type EventHandler = Rc<dyn Fn(MediaEvent)>;

    /// Persistent `<mux-player>` (or plain media element) living outside the
    /// content shell.
    pub struct MuxMediaSink {
        element: HtmlElement,
        handler: RefCell<Option<EventHandler>>,
    }

    impl MuxMediaSink {
        pub fn new(element: HtmlElement) -> Self {
            Self {
                element,
                handler: RefCell::new(None),
            }
        }

        pub fn set_event_handler(&self, handler: EventHandler) {
            *self.handler.borrow_mut() = Some(handler);
        }

        fn js(&self) -> JsValue {
            JsValue::from(self.element.clone())
        }

        // Custom players expose the real element as `.media`; plain tags are
        // their own media target.
        fn media_target(&self) -> JsValue {
            get_prop(&self.js(), "media")
                .filter(|value| value.is_object())
                .unwrap_or_else(|| self.js())
        }

        fn report(&self, event: MediaEvent) {
            let handler = self.handler.borrow().clone();
            if let Some(handler) = handler {
                crate::components::dom::defer(move || handler(event));
            }
        }
    }

    impl MediaSink for MuxMediaSink {
        fn bound_playback_id(&self) -> Option<String> {
            self.element
                .get_attribute(PLAYBACK_ID_ATTR)
                .filter(|id| !id.is_empty())
        }

        fn bind(&self, track: &Track) {
            let _ = self.element.set_attribute(PLAYBACK_ID_ATTR, &track.playback_id);
            let _ = self.element.set_attribute(TITLE_ATTR, &track.title);
        }

        fn load(&self) {
            if let Err(err) = call_method(&self.js(), "load") {
                tracing::debug!(error = ?err, "media element has no load()");
            }
        }

        fn play(&self, request: u64) {
            match call_method(&self.js(), "play") {
                Ok(result) => {
                    let Ok(promise) = result.dyn_into::<js_sys::Promise>() else {
                        return;
                    };
                    let handler = self.handler.borrow().clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                            tracing::debug!(error = ?err, "play() rejected");
                            if let Some(handler) = handler {
                                handler(MediaEvent::PlayRejected(request));
                            }
                        }
                    });
                }
                Err(err) => {
                    tracing::debug!(error = ?err, "play() threw");
                    self.report(MediaEvent::PlayRejected(request));
                }
            }
        }

        fn pause(&self) {
            let _ = call_method(&self.js(), "pause");
        }

        fn is_paused(&self) -> bool {
            get_prop(&self.js(), "paused")
                .and_then(|value| value.as_bool())
                .unwrap_or(true)
        }

        fn current_time(&self) -> f64 {
            get_f64(&self.js(), "currentTime")
                .filter(|t| t.is_finite())
                .unwrap_or(0.0)
        }

        fn set_current_time(&self, seconds: f64) {
            set_prop(&self.js(), "currentTime", &JsValue::from_f64(seconds.max(0.0)));
        }

        fn duration(&self) -> Option<f64> {
            get_f64(&self.js(), "duration").filter(|d| d.is_finite() && *d > 0.0)
        }

        fn set_volume(&self, level: f64) {
            let target = self.media_target();
            set_prop(&target, "volume", &JsValue::from_f64(level));
            set_prop(&target, "muted", &JsValue::FALSE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_event_names_map_to_media_events() {
        assert_eq!(MediaEvent::from_dom_event("stalled"), Some(MediaEvent::Buffering));
        assert_eq!(MediaEvent::from_dom_event("waiting"), Some(MediaEvent::Buffering));
        assert_eq!(MediaEvent::from_dom_event("loadedmetadata"), Some(MediaEvent::LoadedMetadata));
        assert_eq!(MediaEvent::from_dom_event("play"), Some(MediaEvent::Play));
        assert_eq!(MediaEvent::from_dom_event("seeking"), None);
        assert!(MEDIA_DOM_EVENTS
            .iter()
            .all(|name| MediaEvent::from_dom_event(name).is_some()));
    }
}
