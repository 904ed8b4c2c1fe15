//! Touch to mouse translation.

/// Largest total travel, in pixels, that still counts as a tap.
pub const TAP_DISTANCE_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Mouse event synthesized from a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticMouse {
    Down,
    Move,
    Up,
    /// A touch that barely moved.
    Click,
}

/// Tracks one touch so its end can be told apart as a tap or a drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchTranslator {
    last_seen: Option<(f64, f64)>,
    total_distance: f64,
}

impl TouchTranslator {
    pub fn translate(&mut self, phase: TouchPhase, x: f64, y: f64) -> SyntheticMouse {
        match phase {
            TouchPhase::Start => {
                self.total_distance = 0.0;
                self.last_seen = Some((x, y));
                SyntheticMouse::Down
            }
            TouchPhase::Move => {
                self.travel_to(x, y);
                SyntheticMouse::Move
            }
            TouchPhase::End => {
                self.travel_to(x, y);
                self.last_seen = None;
                if self.total_distance > TAP_DISTANCE_PX {
                    SyntheticMouse::Up
                } else {
                    SyntheticMouse::Click
                }
            }
            TouchPhase::Cancel => {
                self.last_seen = None;
                SyntheticMouse::Up
            }
        }
    }

    fn travel_to(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_seen {
            self.total_distance += (x - last_x).hypot(y - last_y);
        }
        if self.last_seen.is_some() {
            self.last_seen = Some((x, y));
        }
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }
}
