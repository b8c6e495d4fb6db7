//! Gesture-to-action input adapters
//!
//! Raw gestures translate into at most one discrete engine call per
//! recognized gesture: taps forward to `Session::primary_action`, drags map
//! to a grid heading with directional hysteresis.

use crate::sim::Heading;

/// Map a drag translation to its dominant-axis heading.
///
/// Screen coordinates: +x right, +y down.
pub fn heading_from_drag(dx: f32, dy: f32) -> Heading {
    if dx.abs() > dy.abs() {
        if dx > 0.0 { Heading::Right } else { Heading::Left }
    } else if dy > 0.0 {
        Heading::Down
    } else {
        Heading::Up
    }
}

/// Drag recognizer with directional hysteresis: `track` yields a heading only
/// when the dominant-axis direction differs from the last one emitted, so a
/// continuous drag fires once per direction change.
#[derive(Debug, Default)]
pub struct DragTracker {
    last: Option<Heading>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current drag translation.
    pub fn track(&mut self, dx: f32, dy: f32) -> Option<Heading> {
        let heading = heading_from_drag(dx, dy);
        if self.last == Some(heading) {
            None
        } else {
            self.last = Some(heading);
            Some(heading)
        }
    }

    /// Forget the last direction; call when the finger lifts.
    pub fn release(&mut self) {
        self.last = None;
    }
}
