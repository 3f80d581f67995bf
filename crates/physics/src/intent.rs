use serde::{Deserialize, Serialize};

/// Keyboard intent for one input poll.
///
/// The input layer fills one of these before every tick and hands it to
/// [`crate::MovementController::set_intent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
    pub camera_up: bool,
    pub camera_down: bool,
    pub camera_left: bool,
    pub camera_right: bool,
}

impl Intent {
    /// Intent with only the forward key held.
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Intent with only the backward key held.
    pub fn backward() -> Self {
        Self {
            backward: true,
            ..Self::default()
        }
    }

    /// Intent with only the jump key held.
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::default()
        }
    }

    /// Whether a walk key is held.
    pub fn is_walking(&self) -> bool {
        self.forward || self.backward
    }

    /// Whether a turn key is held.
    pub fn is_turning(&self) -> bool {
        self.turn_left || self.turn_right
    }
}
