use glam::Vec2;
use rand::Rng;

use super::WindDirection;
use crate::config::SandConfig;
use crate::grain::Grain;
use crate::grid::{cell_of, CellIndex};

/// Short-lived forcing agent. Never touches the grid.
#[derive(Clone, Debug)]
pub struct WindParticle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) direction: WindDirection,
}

impl WindParticle {
    pub fn new(position: Vec2, direction: WindDirection) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            direction,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn direction(&self) -> WindDirection {
        self.direction
    }

    /// Move one tick and push the grains sharing the new cell.
    ///
    /// `index` must reflect grain cells at the start of the tick.
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &SandConfig,
        index: &CellIndex,
        grains: &mut [Grain],
    ) {
        let speed = rng.gen_range(config.wind_speed_min..=config.wind_speed_max);
        self.velocity.x = speed * self.direction.sign();
        self.position.x += self.velocity.x;

        // Brownian jitter
        let jitter = config.wind_jitter;
        self.position.x += rng.gen_range(-jitter..=jitter);
        self.position.y += rng.gen_range(-jitter..=jitter);

        let force = Vec2::new(self.velocity.x * config.wind_push_scale, 0.0);
        let cell = cell_of(self.position, config.cell_size);
        for id in index.grains_in(cell) {
            let grain = &mut grains[id.index()];
            if !grain.is_frozen() {
                grain.wind_push(force);
            }
        }
    }

    /// Still inside the horizontal playfield.
    #[inline]
    pub fn in_playfield(&self, width: f32) -> bool {
        self.position.x >= 0.0 && self.position.x <= width
    }
}
