use crate::action::Action;

/// Drag-to-look state: whether the look button is held and where the cursor was last seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseLook {
    dragging: bool,
    last: Option<(f32, f32)>,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Look button went down.
    pub fn press(&mut self) {
        self.dragging = true;
    }

    /// Look button went up; the next drag starts fresh.
    pub fn release(&mut self) {
        self.dragging = false;
        self.last = None;
    }

    /// Feeds an absolute cursor position (window coordinates, y down).
    ///
    /// Returns `(dx, dy)` with `dy` positive upwards while dragging. The first
    /// sample of a drag only records the position.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        if !self.dragging {
            return None;
        }
        let delta = self.last.map(|(last_x, last_y)| (x - last_x, last_y - y));
        self.last = Some((x, y));
        delta
    }

    /// Same as [`cursor_moved`](Self::cursor_moved), wrapped as a look action.
    pub fn look_action(&mut self, x: f32, y: f32) -> Option<Action> {
        self.cursor_moved(x, y)
            .filter(|&(dx, dy)| dx != 0.0 || dy != 0.0)
            .map(|(dx, dy)| Action::Look { dx, dy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delta_without_drag() {
        let mut look = MouseLook::new();
        assert_eq!(look.cursor_moved(10.0, 10.0), None);
        assert_eq!(look.cursor_moved(20.0, 30.0), None);
    }

    #[test]
    fn first_sample_of_drag_is_swallowed() {
        let mut look = MouseLook::new();
        look.cursor_moved(400.0, 300.0);
        look.press();
        assert_eq!(look.cursor_moved(500.0, 100.0), None);
        assert_eq!(look.cursor_moved(510.0, 90.0), Some((10.0, 10.0)));
    }

    #[test]
    fn y_axis_is_reversed() {
        let mut look = MouseLook::new();
        look.press();
        look.cursor_moved(0.0, 0.0);
        assert_eq!(look.cursor_moved(0.0, 25.0), Some((0.0, -25.0)));
    }

    #[test]
    fn release_rearms_first_move() {
        let mut look = MouseLook::new();
        look.press();
        look.cursor_moved(0.0, 0.0);
        look.cursor_moved(5.0, 5.0);
        look.release();
        assert!(!look.is_dragging());
        look.press();
        // jump across the window between drags must not produce a spike
        assert_eq!(look.cursor_moved(700.0, 500.0), None);
        assert_eq!(look.cursor_moved(701.0, 500.0), Some((1.0, 0.0)));
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let mut a = MouseLook::new();
        let mut b = MouseLook::new();
        a.press();
        a.cursor_moved(1.0, 1.0);
        b.press();
        assert_eq!(b.cursor_moved(2.0, 2.0), None);
        assert_eq!(a.cursor_moved(2.0, 2.0), Some((1.0, -1.0)));
    }

    #[test]
    fn zero_motion_yields_no_action() {
        let mut look = MouseLook::new();
        look.press();
        look.cursor_moved(3.0, 3.0);
        assert_eq!(look.look_action(3.0, 3.0), None);
        assert_eq!(
            look.look_action(4.0, 3.0),
            Some(Action::Look { dx: 1.0, dy: 0.0 })
        );
    }
}
