// Pointer-to-position mapping and the drag-seek rate limiter.
use crate::utils::clamp_unit;

/// Bounding box of a control, captured once per gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TrackGeometry {
    /// Horizontal fraction for the progress bar.
    pub fn fraction_at_x(&self, client_x: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        clamp_unit((client_x - self.left) / self.width)
    }

    /// Vertical fraction for the volume fader; the bottom edge is 0.
    pub fn fraction_at_y(&self, client_y: f64) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        clamp_unit(1.0 - (client_y - self.top) / self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Nothing pending; the frame did no work.
    Idle,
    /// Too soon after the last applied seek; keep the sample and ask for
    /// another frame.
    Reschedule,
    Apply(f64),
}

/// Single-slot dispatcher: every sample overwrites the pending fraction, a
/// frame callback flushes it at most once per `min_interval_ms`, and ending
/// the gesture drops whatever is left.
#[derive(Debug, Clone)]
pub struct SeekCoalescer {
    geometry: Option<TrackGeometry>,
    pending: Option<f64>,
    frame_requested: bool,
    last_applied_ms: Option<f64>,
    min_interval_ms: f64,
}

impl SeekCoalescer {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            geometry: None,
            pending: None,
            frame_requested: false,
            last_applied_ms: None,
            min_interval_ms,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.geometry.is_some()
    }

    /// Start a gesture. Returns true when a frame left over from a previous
    /// gesture must be cancelled.
    pub fn begin(&mut self, geometry: TrackGeometry) -> bool {
        let stale_frame = self.end();
        self.geometry = Some(geometry);
        stale_frame
    }

    /// Record a pointer sample. Returns true when the caller must request a
    /// frame; false while one is already outstanding.
    pub fn sample(&mut self, client_x: f64) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        self.pending = Some(geometry.fraction_at_x(client_x));
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    pub fn on_frame(&mut self, now_ms: f64) -> FrameOutcome {
        self.frame_requested = false;
        if self.pending.is_none() {
            return FrameOutcome::Idle;
        }
        if let Some(last) = self.last_applied_ms {
            if now_ms - last < self.min_interval_ms {
                self.frame_requested = true;
                return FrameOutcome::Reschedule;
            }
        }
        self.last_applied_ms = Some(now_ms);
        match self.pending.take() {
            Some(fraction) => FrameOutcome::Apply(fraction),
            None => FrameOutcome::Idle,
        }
    }

    /// Finish the gesture and drop pending work. Returns true when a frame
    /// was still outstanding and must be cancelled.
    pub fn end(&mut self) -> bool {
        let outstanding = self.frame_requested;
        self.geometry = None;
        self.pending = None;
        self.frame_requested = false;
        self.last_applied_ms = None;
        outstanding
    }
}

/// Target position for a fraction of a known duration.
pub fn position_for(fraction: f64, duration: f64) -> f64 {
    clamp_unit(fraction) * duration
}
