use std::collections::BTreeSet;

use glcourse_camera::CameraMovement;

use crate::action::Action;

/// Movement directions currently held down.
#[derive(Debug, Clone, Default)]
pub struct MovementKeys {
    held: BTreeSet<CameraMovement>,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, movement: CameraMovement, pressed: bool) {
        if pressed {
            self.held.insert(movement);
        } else {
            self.held.remove(&movement);
        }
    }

    pub fn is_held(&self, movement: CameraMovement) -> bool {
        self.held.contains(&movement)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// One `Move` action per held direction, in declaration order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.held.iter().map(|&movement| Action::Move(movement))
    }
}
