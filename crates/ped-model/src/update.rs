//! Buffered result of one model evaluation.

use ped_core::Point;

/// New kinematic state for one agent, computed during the parallel phase
/// and committed only after every agent has been evaluated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModelUpdate {
    pub position:    Point,
    pub orientation: Point,
    pub velocity:    Point,
}

impl ModelUpdate {
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Name of the first non-finite field, if any.
    pub(crate) fn first_non_finite(&self) -> Option<&'static str> {
        if !self.position.is_finite() {
            Some("position")
        } else if !self.orientation.is_finite() {
            Some("orientation")
        } else if !self.velocity.is_finite() {
            Some("velocity")
        } else {
            None
        }
    }
}
