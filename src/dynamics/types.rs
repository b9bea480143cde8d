// ==============================================================================
// types.rs — PER-TICK CONTROL SNAPSHOT
// ==============================================================================

/// Discrete steering request. Keyboard-style input: full lock left, center,
/// or full lock right; the integrator rate-limits the actual wheel angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    #[default]
    Center,
    Right,
}

impl Steer {
    /// Sign convention: positive steering angle turns left (counter-clockwise
    /// yaw, consistent with orientation measured counter-clockwise from +x).
    pub fn sign(self) -> f32 {
        match self {
            Steer::Left => 1.0,
            Steer::Center => 0.0,
            Steer::Right => -1.0,
        }
    }
}

/// Control flags sampled once at the start of a fixed tick and held constant
/// through it.
///
/// `throttle`, `reverse`, `handbrake` and `steer` are level-triggered (held
/// state). `gear_up`, `gear_down` and `toggle_automatic` are edge-triggered:
/// the input layer sets them only on the tick the key goes down, and the
/// simulation consumes them as one-shot commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub throttle: bool,
    pub reverse: bool,
    pub handbrake: bool,
    pub steer: Steer,

    pub gear_up: bool,
    pub gear_down: bool,
    pub toggle_automatic: bool,
}
