use glam::Vec2;
use rand::Rng;
use tracing::trace;

use super::{WindDirection, WindParticle};
use crate::config::SandConfig;
use crate::grain::Grain;
use crate::grid::CellIndex;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FanId(pub(crate) u32);

impl FanId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stationary wind source, one cell wide and `fan_height_cells` tall.
#[derive(Clone, Debug)]
pub struct Fan {
    id: FanId,
    position: Vec2,
    direction: WindDirection,
    timer: u32,
    particles: Vec<WindParticle>,
}

impl Fan {
    pub(crate) fn new(id: FanId, position: Vec2, playfield_width: f32) -> Self {
        Self {
            id,
            position,
            direction: WindDirection::for_position(position.x, playfield_width),
            timer: 0,
            particles: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> FanId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn direction(&self) -> WindDirection {
        self.direction
    }

    pub fn particles(&self) -> &[WindParticle] {
        &self.particles
    }

    /// Spawn on cadence, advance every particle, then drop the ones that
    /// left the playfield.
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &SandConfig,
        index: &CellIndex,
        grains: &mut [Grain],
    ) {
        self.timer += 1;
        if self.timer >= config.fan_spawn_interval {
            self.spawn(rng, config);
            self.timer = 0;
        }

        for particle in &mut self.particles {
            particle.update(rng, config, index, grains);
        }

        let width = config.width();
        let before = self.particles.len();
        self.particles.retain(|p| p.in_playfield(width));
        let pruned = before - self.particles.len();
        if pruned > 0 {
            trace!(fan = self.id.index(), pruned, "wind particles left the playfield");
        }
    }

    fn spawn<R: Rng>(&mut self, rng: &mut R, config: &SandConfig) {
        let height = config.fan_height_cells as f32 * config.cell_size;
        let x = match self.direction {
            WindDirection::Right => self.position.x + config.cell_size,
            WindDirection::Left => self.position.x,
        };
        let y = self.position.y + rng.gen_range(0.0..=height);
        self.particles.push(WindParticle::new(Vec2::new(x, y), self.direction));
    }
}
