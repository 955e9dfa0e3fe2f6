//! Defines which slice of the catalog the current page shows.

use crate::api::models::{Catalog, Track};
use crate::utils::is_dated_page_key;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageContext {
    /// Music page, index, and every other undated page.
    AllTracks,
    /// A dated entry page scoped to its own page key.
    Dated(String),
}

impl PageContext {
    /// Select the context from the page's document title.
    pub fn from_title(title: &str) -> Self {
        let title = title.trim();
        if is_dated_page_key(title) {
            PageContext::Dated(title.to_string())
        } else {
            PageContext::AllTracks
        }
    }

    pub fn tracks(&self, catalog: &Catalog) -> Vec<Track> {
        match self {
            PageContext::AllTracks => catalog.all_tracks(),
            PageContext::Dated(key) => catalog.tracks_for_page(key),
        }
    }

    /// Dated pages only list their own tracks, so a snapshot from elsewhere
    /// must not be resumed there.
    pub fn scopes_tracks(&self) -> bool {
        matches!(self, PageContext::Dated(_))
    }
}

pub fn context_label(context: &PageContext) -> &str {
    match context {
        PageContext::AllTracks => "all tracks",
        PageContext::Dated(key) => key,
    }
}
