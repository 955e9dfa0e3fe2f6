//! Browser-only DOM helpers shared by the router and the player bindings.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, AddEventListenerOptions, Document, Event, EventTarget, HtmlElement};

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn html_by_id(id: &str) -> Option<HtmlElement> {
    document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Run `f` after the current call stack unwinds so callbacks that re-enter
/// shared state never overlap an outstanding borrow.
pub fn defer<F>(f: F)
where
    F: FnOnce() + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(0).await;
        f();
    });
}

pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Event listener that detaches itself when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }

    /// Non-passive registration so touch handlers may call `prevent_default`.
    pub fn active<F>(target: &EventTarget, event: &'static str, handler: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        );
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

pub fn get_prop(target: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

pub fn get_f64(target: &JsValue, name: &str) -> Option<f64> {
    get_prop(target, name)?.as_f64()
}

pub fn set_prop(target: &JsValue, name: &str, value: &JsValue) -> bool {
    js_sys::Reflect::set(target, &JsValue::from_str(name), value).unwrap_or(false)
}

/// Call a zero-argument method by name, if the object has one.
pub fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method = get_prop(target, name)
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("{name} is not a function")))?;
    method.call0(target)
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}
