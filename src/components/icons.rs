/// Bottom-bar play/pause glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

impl PlayIcon {
    pub fn svg(self) -> &'static str {
        match self {
            PlayIcon::Play => {
                r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><polygon points="6,4 20,12 6,20" fill="currentColor"/></svg>"#
            }
            PlayIcon::Pause => {
                r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><rect x="6" y="5" width="4" height="14" fill="currentColor"/><rect x="14" y="5" width="4" height="14" fill="currentColor"/></svg>"#
            }
        }
    }

    pub fn aria_label(self) -> &'static str {
        match self {
            PlayIcon::Play => "Play",
            PlayIcon::Pause => "Pause",
        }
    }
}
