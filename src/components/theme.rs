//! Light/dark appearance, reapplied on every page and toggled from the
//! page's own button.

use crate::db::Theme;

pub const DARK_CLASS: &str = "dark-mode";

/// Theme implied by the body's current class list.
pub fn theme_for_body(has_dark_class: bool) -> Theme {
    if has_dark_class {
        Theme::Dark
    } else {
        Theme::Light
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{theme_for_body, DARK_CLASS};
    use crate::components::dom::{document, Listener};
    use crate::db::{load_theme, save_theme, Theme};

    /// Apply the stored preference and bind the toggle. Pages without a
    /// toggle keep whatever class the body already has.
    pub fn init_theme(toggle_id: &str, storage_key: &str) -> Option<Listener> {
        let doc = document()?;
        let toggle = doc.get_element_by_id(toggle_id)?;
        let body = doc.body()?;

        if load_theme(storage_key) == Theme::Dark {
            let _ = body.class_list().add_1(DARK_CLASS);
        }

        let key = storage_key.to_string();
        Some(Listener::new(&toggle, "click", move |_| {
            let classes = body.class_list();
            let _ = classes.toggle(DARK_CLASS);
            let theme = theme_for_body(classes.contains(DARK_CLASS));
            save_theme(&key, theme);
            tracing::debug!(theme = theme.as_str(), "theme toggled");
        }))
    }
}
