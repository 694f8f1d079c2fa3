use glam::Vec2;
use web_time::{Duration, Instant};

use super::event::MouseButton;

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Cursor travel (in pixels, squared) beyond which a press becomes a drag.
const DRAG_THRESHOLD_SQ: f32 = 9.0;

/// Result of releasing the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// The press turned into a drag, or another button was involved.
    None,
    /// A click with no recent predecessor.
    Single,
    /// Second click within the double-click window.
    Double,
}

/// Tracks cursor position, held buttons, drag state, and click timing.
#[derive(Debug)]
pub struct PointerState {
    position: Option<Vec2>,
    held: Option<MouseButton>,
    press_origin: Vec2,
    dragging: bool,
    shift: bool,
    last_click: Option<Instant>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    /// No buttons held, cursor position unknown.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: None,
            held: None,
            press_origin: Vec2::ZERO,
            dragging: false,
            shift: false,
            last_click: None,
        }
    }

    /// Record a cursor move and return the delta since the previous one.
    /// The first move after startup yields zero.
    pub fn move_to(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let delta = self.position.map_or(Vec2::ZERO, |last| current - last);
        self.position = Some(current);
        if self.held.is_some()
            && (current - self.press_origin).length_squared() > DRAG_THRESHOLD_SQ
        {
            self.dragging = true;
        }
        delta
    }

    /// Record a button press.
    pub fn press(&mut self, button: MouseButton) {
        self.held = Some(button);
        self.press_origin = self.position.unwrap_or(Vec2::ZERO);
        self.dragging = false;
    }

    /// Record a button release at `now` and classify it.
    pub fn release(&mut self, button: MouseButton, now: Instant) -> Click {
        let was_dragging = self.dragging;
        let held = self.held.take();
        self.dragging = false;

        if was_dragging || button != MouseButton::Left || held != Some(button) {
            self.last_click = None;
            return Click::None;
        }

        match self.last_click {
            Some(previous)
                if now.duration_since(previous) < DOUBLE_CLICK_THRESHOLD =>
            {
                self.last_click = None;
                Click::Double
            }
            _ => {
                self.last_click = Some(now);
                Click::Single
            }
        }
    }

    /// Button currently held, if any.
    #[must_use]
    pub fn held(&self) -> Option<MouseButton> {
        self.held
    }

    /// Update the shift modifier.
    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Whether shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_delta() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.move_to(10.0, 10.0), Vec2::ZERO);
        assert_eq!(pointer.move_to(13.0, 6.0), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn two_quick_clicks_make_a_double_click() {
        let mut pointer = PointerState::new();
        let t0 = Instant::now();
        let _ = pointer.move_to(50.0, 50.0);

        pointer.press(MouseButton::Left);
        assert_eq!(pointer.release(MouseButton::Left, t0), Click::Single);

        pointer.press(MouseButton::Left);
        let t1 = t0 + Duration::from_millis(150);
        assert_eq!(pointer.release(MouseButton::Left, t1), Click::Double);

        // A third click starts over.
        pointer.press(MouseButton::Left);
        let t2 = t1 + Duration::from_millis(100);
        assert_eq!(pointer.release(MouseButton::Left, t2), Click::Single);
    }

    #[test]
    fn slow_clicks_stay_single() {
        let mut pointer = PointerState::new();
        let t0 = Instant::now();
        pointer.press(MouseButton::Left);
        assert_eq!(pointer.release(MouseButton::Left, t0), Click::Single);
        pointer.press(MouseButton::Left);
        let later = t0 + Duration::from_millis(900);
        assert_eq!(pointer.release(MouseButton::Left, later), Click::Single);
    }

    #[test]
    fn drags_are_not_clicks() {
        let mut pointer = PointerState::new();
        let _ = pointer.move_to(0.0, 0.0);
        pointer.press(MouseButton::Left);
        let _ = pointer.move_to(40.0, 0.0);
        assert_eq!(
            pointer.release(MouseButton::Left, Instant::now()),
            Click::None
        );
        assert_eq!(pointer.held(), None);
    }

    #[test]
    fn right_button_never_clicks() {
        let mut pointer = PointerState::new();
        pointer.press(MouseButton::Right);
        assert_eq!(pointer.held(), Some(MouseButton::Right));
        assert_eq!(
            pointer.release(MouseButton::Right, Instant::now()),
            Click::None
        );
    }
}
