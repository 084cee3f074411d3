use gridscene_common::TickInput;

/// Fixed per-tick movement magnitude selected by a held key. Discrete,
/// not proportional: press sets it, release zeroes it.
pub const MOVE_STEP: f32 = 0.02;

/// Directional movement keys, independent of any window toolkit's key
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// Accumulates raw input between ticks.
///
/// The event loop writes it from key and mouse callbacks; the scene reads
/// it once per tick via [`InputAccumulator::sample`]. Held-key movement
/// persists across samples, mouse spin drains.
#[derive(Debug, Default)]
pub struct InputAccumulator {
    forward: f32,
    right: f32,
    spin_dx: f32,
    spin_dy: f32,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key transition. Releasing either key of an axis zeroes
    /// that axis; the last press on an axis wins.
    pub fn key(&mut self, key: MoveKey, pressed: bool) {
        let step = if pressed { MOVE_STEP } else { 0.0 };
        match key {
            MoveKey::Forward => self.forward = step,
            MoveKey::Backward => self.forward = -step,
            MoveKey::Left => self.right = -step,
            MoveKey::Right => self.right = step,
        }
    }

    /// Add a mouse-motion delta to the pending spin.
    pub fn accumulate_spin(&mut self, dx: f32, dy: f32) {
        self.spin_dx += dx;
        self.spin_dy += dy;
    }

    /// Take this tick's input. Movement reflects currently held keys;
    /// the accumulated spin is drained.
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            forward: self.forward,
            right: self.right,
            spin_dx: self.spin_dx,
            spin_dy: self.spin_dy,
        };
        self.spin_dx = 0.0;
        self.spin_dy = 0.0;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_fixed_magnitude() {
        let mut acc = InputAccumulator::new();
        acc.key(MoveKey::Forward, true);
        assert_eq!(acc.sample().forward, MOVE_STEP);
    }

    #[test]
    fn release_zeroes_the_axis() {
        let mut acc = InputAccumulator::new();
        acc.key(MoveKey::Backward, true);
        assert_eq!(acc.sample().forward, -MOVE_STEP);
        acc.key(MoveKey::Backward, false);
        assert_eq!(acc.sample().forward, 0.0);
    }

    #[test]
    fn held_movement_persists_across_samples() {
        let mut acc = InputAccumulator::new();
        acc.key(MoveKey::Right, true);
        assert_eq!(acc.sample().right, MOVE_STEP);
        assert_eq!(acc.sample().right, MOVE_STEP);
    }

    #[test]
    fn strafe_and_forward_are_independent_axes() {
        let mut acc = InputAccumulator::new();
        acc.key(MoveKey::Forward, true);
        acc.key(MoveKey::Left, true);
        let input = acc.sample();
        assert_eq!(input.forward, MOVE_STEP);
        assert_eq!(input.right, -MOVE_STEP);
    }

    #[test]
    fn spin_accumulates_and_drains() {
        let mut acc = InputAccumulator::new();
        acc.accumulate_spin(3.0, -1.0);
        acc.accumulate_spin(2.0, 0.5);
        let input = acc.sample();
        assert_eq!(input.spin_dx, 5.0);
        assert_eq!(input.spin_dy, -0.5);
        // Drained: the next tick sees no spin.
        let next = acc.sample();
        assert_eq!(next.spin_dx, 0.0);
        assert_eq!(next.spin_dy, 0.0);
    }
}
