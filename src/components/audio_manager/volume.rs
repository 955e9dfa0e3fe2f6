// Show/hide rules for the volume fader.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaderInput {
    PointerEnter,
    PointerLeave,
    /// Mouse or touch pressed on the fader track.
    DragStart,
    /// Mouse released anywhere after a drag.
    MouseDragEnd,
    TouchEnd,
    /// Click or tap on the speaker icon.
    SpeakerToggle,
    /// Click or tap outside the volume control.
    Outside,
}

/// Hide request to run after `delay_ms`; stale tokens are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTimer {
    pub token: u64,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaderUpdate {
    pub visible: bool,
    pub schedule: Option<HideTimer>,
}

#[derive(Debug, Clone)]
pub struct VolumeFader {
    visible: bool,
    hovered: bool,
    dragging: bool,
    generation: u64,
    mouse_hide_ms: u32,
    touch_hide_ms: u32,
}

impl VolumeFader {
    pub fn new(mouse_hide_ms: u32, touch_hide_ms: u32) -> Self {
        Self {
            visible: false,
            hovered: false,
            dragging: false,
            generation: 0,
            mouse_hide_ms,
            touch_hide_ms,
        }
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn schedule(&mut self, delay_ms: u32) -> Option<HideTimer> {
        self.cancel_timer();
        Some(HideTimer {
            token: self.generation,
            delay_ms,
        })
    }

    pub fn handle(&mut self, input: FaderInput) -> FaderUpdate {
        let mut schedule = None;
        match input {
            FaderInput::PointerEnter => {
                self.hovered = true;
                self.cancel_timer();
                self.visible = true;
            }
            FaderInput::PointerLeave => {
                self.hovered = false;
                if !self.dragging {
                    schedule = self.schedule(self.mouse_hide_ms);
                }
            }
            FaderInput::DragStart => {
                self.dragging = true;
                self.cancel_timer();
                self.visible = true;
            }
            FaderInput::MouseDragEnd => {
                let was_dragging = std::mem::replace(&mut self.dragging, false);
                if was_dragging && !self.hovered && self.visible {
                    schedule = self.schedule(self.mouse_hide_ms);
                }
            }
            FaderInput::TouchEnd => {
                self.dragging = false;
                if self.visible {
                    schedule = self.schedule(self.touch_hide_ms);
                }
            }
            FaderInput::SpeakerToggle => {
                self.cancel_timer();
                self.visible = !self.visible;
            }
            FaderInput::Outside => {
                self.cancel_timer();
                self.dragging = false;
                self.visible = false;
            }
        }
        FaderUpdate {
            visible: self.visible,
            schedule,
        }
    }

    /// A hide timer elapsed. Returns true when the fader was hidden.
    pub fn hide_timer_fired(&mut self, token: u64) -> bool {
        if token != self.generation || self.dragging || !self.visible {
            return false;
        }
        self.visible = false;
        true
    }
}
