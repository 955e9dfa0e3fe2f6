use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Label shown until a probe reports a usable duration.
pub const DURATION_PLACEHOLDER: &str = "--:--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    #[serde(rename = "playbackId", alias = "playback_id")]
    pub playback_id: String,
    /// Originating page key. Filled in when a catalog group is flattened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl Track {
    pub fn new(title: impl Into<String>, playback_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            playback_id: playback_id.into(),
            page: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGroup {
    pub page: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Ordered page-key → tracks mapping. Group order is the "all tracks" order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    groups: Vec<PageGroup>,
}

impl Catalog {
    pub fn new(groups: Vec<PageGroup>) -> Result<Self, CatalogError> {
        for (idx, group) in groups.iter().enumerate() {
            if groups[..idx].iter().any(|g| g.page == group.page) {
                return Err(CatalogError::DuplicatePage(group.page.clone()));
            }
        }
        Ok(Self { groups })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let groups: Vec<PageGroup> = serde_json::from_str(raw)?;
        Self::new(groups)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.groups)?)
    }

    /// Page keys in catalog order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.page.as_str())
    }

    /// One page's tracks, each tagged with that page key. Unknown keys yield
    /// an empty list.
    pub fn tracks_for_page(&self, page: &str) -> Vec<Track> {
        self.groups
            .iter()
            .filter(|g| g.page == page)
            .flat_map(tagged)
            .collect()
    }

    /// Every group concatenated in key order, each record tagged with its page.
    pub fn all_tracks(&self) -> Vec<Track> {
        self.groups.iter().flat_map(tagged).collect()
    }

    pub fn contains_playback_id(&self, playback_id: &str) -> bool {
        self.groups
            .iter()
            .flat_map(|g| g.tracks.iter())
            .any(|t| t.playback_id == playback_id)
    }

    /// Append a track to `page`, creating a trailing group when the key is new.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn push_track(&mut self, page: &str, mut track: Track) {
        track.page = None;
        match self.groups.iter_mut().find(|g| g.page == page) {
            Some(group) => group.tracks.push(track),
            None => self.groups.push(PageGroup {
                page: page.to_string(),
                tracks: vec![track],
            }),
        }
    }
}

fn tagged(group: &PageGroup) -> impl Iterator<Item = Track> + '_ {
    group.tracks.iter().map(move |t| Track {
        page: Some(group.page.clone()),
        ..t.clone()
    })
}

/// `m:ss` for a probe-reported duration; `None` for NaN, infinite or
/// non-positive values so the placeholder stays in place.
pub fn format_duration(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    let total = seconds.floor() as u64;
    let mins = total / 60;
    let secs = total % 60;
    Some(format!("{}:{:02}", mins, secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "page": "2.25.26", "tracks": [ { "title": "sometimes (2.24.26)", "playbackId": "P" } ] },
        { "page": "11.29.25", "tracks": [ { "title": "fire escape", "playbackId": "F" } ] },
        { "page": "11.28.25", "tracks": [ { "title": "sometimes", "playbackId": "X" } ] }
    ]"#;

    #[test]
    fn flattened_order_follows_page_key_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<_> = catalog
            .all_tracks()
            .into_iter()
            .map(|t| (t.playback_id, t.page.unwrap()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("P".to_string(), "2.25.26".to_string()),
                ("F".to_string(), "11.29.25".to_string()),
                ("X".to_string(), "11.28.25".to_string()),
            ]
        );
    }

    #[test]
    fn page_filter_and_lookup() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let page = catalog.tracks_for_page("11.28.25");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "sometimes");
        assert_eq!(page[0].page.as_deref(), Some("11.28.25"));
        assert!(catalog.tracks_for_page("1.1.01").is_empty());
        assert!(catalog.contains_playback_id("F"));
        assert!(!catalog.contains_playback_id("nope"));
    }

    #[test]
    fn duplicate_page_keys_are_rejected() {
        let raw = r#"[ { "page": "a", "tracks": [] }, { "page": "a", "tracks": [] } ]"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicatePage(key)) if key == "a"
        ));
    }

    #[test]
    fn push_track_appends_or_creates_group() {
        let mut catalog = Catalog::from_json(SAMPLE).unwrap();
        catalog.push_track("11.28.25", Track::new("sometimes (alt)", "Y"));
        catalog.push_track("3.1.26", Track::new("new one", "Z"));

        assert_eq!(catalog.tracks_for_page("11.28.25").len(), 2);
        assert_eq!(catalog.pages().last(), Some("3.1.26"));

        let reparsed = Catalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(125.4).as_deref(), Some("2:05"));
        assert_eq!(format_duration(59.99).as_deref(), Some("0:59"));
        assert_eq!(format_duration(3600.0).as_deref(), Some("60:00"));
        assert_eq!(format_duration(f64::NAN), None);
        assert_eq!(format_duration(f64::INFINITY), None);
        assert_eq!(format_duration(0.0), None);
    }
}
