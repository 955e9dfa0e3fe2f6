//! Newsletter form: posts the email and reports progress inline.

use crate::api::subscribe::SubscribeStatus;
use crate::error::SubscribeError;

/// Final status for a finished request; transport failures read as the
/// generic error text.
pub fn settle(result: Result<SubscribeStatus, SubscribeError>) -> SubscribeStatus {
    match result {
        Ok(status) => {
            if let SubscribeStatus::Failed(message) = &status {
                tracing::warn!(message = %message, "subscribe rejected");
            }
            status
        }
        Err(err) => {
            tracing::warn!(error = %err, "subscribe request failed");
            SubscribeStatus::from_error(&err)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlElement, HtmlInputElement};

    use super::settle;
    use crate::api::subscribe::{submit, SubscribeStatus};
    use crate::components::dom::{document, html_by_id, set_style, Listener};
    use crate::config::ElementIds;

    fn show(status_el: &HtmlElement, status: &SubscribeStatus) {
        status_el.set_text_content(Some(status.text()));
        set_style(status_el, "color", status.color());
    }

    /// Attach the submit handler when the page has the form.
    pub fn bind_subscribe_form(ids: &ElementIds, endpoint: &str) -> Option<Listener> {
        let form = document()?.get_element_by_id(&ids.subscribe_form)?;
        let input_id = ids.email_input.clone();
        let status_id = ids.status_message.clone();
        let endpoint = endpoint.to_string();

        Some(Listener::new(&form, "submit", move |event| {
            event.prevent_default();
            let Some(input) = html_by_id(&input_id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(status_el) = html_by_id(&status_id) else {
                return;
            };
            show(&status_el, &SubscribeStatus::Subscribing);

            let email = input.value();
            let endpoint = endpoint.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let status = settle(submit(&endpoint, &email).await);
                show(&status_el, &status);
                if status.clears_input() {
                    input.set_value("");
                }
            });
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::subscribe::SUBSCRIBE_FAILED_TEXT;

    #[test]
    fn transport_error_reads_as_generic_failure() {
        let status = settle(Err(SubscribeError::Network("offline".into())));
        assert_eq!(status.text(), SUBSCRIBE_FAILED_TEXT);
        assert!(!status.clears_input());
    }

    #[test]
    fn server_outcome_passes_through() {
        assert_eq!(settle(Ok(SubscribeStatus::Subscribed)), SubscribeStatus::Subscribed);
        let rejected = SubscribeStatus::Failed("already subscribed".into());
        assert_eq!(settle(Ok(rejected.clone())), rejected);
    }
}
