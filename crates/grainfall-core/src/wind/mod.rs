/// Wind sources and the particles they emit.
///
/// A fan spawns particles on a fixed cadence; each particle drifts across
/// the playfield with a jittery horizontal speed and pushes whichever grains
/// share its cell.
pub mod fan;
pub mod particle;

pub use fan::{Fan, FanId};
pub use particle::WindParticle;

/// Travel direction of a fan and its particles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WindDirection {
    Left,
    Right,
}

impl WindDirection {
    /// Rightward in the left half of the playfield, leftward in the right half.
    pub fn for_position(x: f32, playfield_width: f32) -> Self {
        if x > playfield_width / 2.0 {
            WindDirection::Left
        } else {
            WindDirection::Right
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            WindDirection::Left => -1.0,
            WindDirection::Right => 1.0,
        }
    }
}
