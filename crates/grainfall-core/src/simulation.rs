use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{SandConfig, MOISTURE_MAX, MOISTURE_MIN};
use crate::error::ConfigError;
use crate::grain::{update_grain, Grain, GrainId};
use crate::grid::{cell_of, cell_origin, CellIndex, Grid};
use crate::ruleset::Ruleset;
use crate::stability::column_stable;
use crate::unlock::unlock;
use crate::wind::{Fan, FanId, WindParticle};

/// Owns the grid, the grain arena and the fans, and runs ticks.
pub struct Simulation {
    config: SandConfig,
    grid: Grid,
    grains: Vec<Grain>,
    fans: Vec<Fan>,
    /// Every grain by cell, frozen ones included. Rebuilt lazily.
    cell_index: CellIndex,
    index_stale: bool,
    rng: StdRng,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: SandConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            cols = config.cols,
            rows = config.rows,
            cell_size = config.cell_size,
            "sand simulation created"
        );

        Ok(Self {
            grid: Grid::new(config.cols, config.rows),
            cell_index: CellIndex::new(config.cols, config.rows),
            index_stale: false,
            grains: Vec::new(),
            fans: Vec::new(),
            rng,
            ticks: 0,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &SandConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All grains in creation order, including frozen ones.
    #[inline]
    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub fn grain(&self, id: GrainId) -> Option<&Grain> {
        self.grains.get(id.index())
    }

    #[inline]
    pub fn fans(&self) -> &[Fan] {
        &self.fans
    }

    pub fn wind_particles(&self) -> impl Iterator<Item = &WindParticle> + '_ {
        self.fans.iter().flat_map(|fan| fan.particles())
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn locked_count(&self) -> usize {
        self.grains.iter().filter(|g| g.is_locked()).count()
    }

    /// Switch drift mode, wind and unlock cascades at runtime.
    pub fn apply_ruleset(&mut self, ruleset: Ruleset) {
        ruleset.apply_to(&mut self.config);
    }

    /// Drop a grain at the cell under `pixel`.
    ///
    /// Returns `None` without side effects when the cell is outside the grid
    /// or already holds any grain: resting, falling or frozen. Moisture is
    /// clamped into the supported range.
    pub fn place_grain(&mut self, pixel: Vec2, moisture: u8) -> Option<GrainId> {
        let cell = cell_of(pixel, self.config.cell_size);
        if !self.grid.contains(cell) {
            debug!(?cell, "placement outside the grid ignored");
            return None;
        }
        if self.grid.is_occupied(cell) || self.has_grain_in(cell) {
            debug!(?cell, "placement onto an occupied cell ignored");
            return None;
        }

        let id = GrainId::new(self.grains.len());
        let moisture = moisture.clamp(MOISTURE_MIN, MOISTURE_MAX);
        self.grains
            .push(Grain::new(id, cell, self.config.cell_size, moisture, self.config.grain_mass));
        self.index_stale = true;
        Some(id)
    }

    /// Seed a grain already at rest in `cell`, without any support check.
    /// Used to set up scenes.
    pub fn spawn_resting(&mut self, cell: IVec2, moisture: u8) -> Option<GrainId> {
        if !self.grid.contains(cell) || self.grid.is_occupied(cell) {
            return None;
        }
        let id = GrainId::new(self.grains.len());
        let moisture = moisture.clamp(MOISTURE_MIN, MOISTURE_MAX);
        let mut grain = Grain::new(id, cell, self.config.cell_size, moisture, self.config.grain_mass);
        grain.locked = true;
        self.grid.set_occupied(cell, id);
        self.grains.push(grain);
        self.index_stale = true;
        Some(id)
    }

    /// Anchor a fan at the cell under `pixel`. Its direction depends on which
    /// half of the playfield it lands in.
    pub fn place_wind_source(&mut self, pixel: Vec2) -> FanId {
        let cell_size = self.config.cell_size;
        let anchor = cell_origin(cell_of(pixel, cell_size), cell_size);
        let id = FanId(self.fans.len() as u32);
        let fan = Fan::new(id, anchor, self.config.width());
        debug!(fan = id.index(), direction = ?fan.direction(), "fan placed");
        self.fans.push(fan);
        id
    }

    /// Accumulate an external force on a grain for the next tick.
    pub fn apply_force(&mut self, id: GrainId, force: Vec2) {
        if let Some(grain) = self.grains.get_mut(id.index()) {
            grain.apply_force(force);
        }
    }

    /// Accumulate a wind push on a grain for the next tick.
    pub fn wind_push(&mut self, id: GrainId, force: Vec2) {
        if let Some(grain) = self.grains.get_mut(id.index()) {
            grain.wind_push(force);
        }
    }

    /// Release a grain and everything stacked on it.
    pub fn unlock(&mut self, id: GrainId) {
        if id.index() < self.grains.len() {
            unlock(&mut self.grains, &mut self.grid, id, self.config.unlock_velocity);
        }
    }

    pub fn column_stable(&self, col: i32) -> bool {
        column_stable(&self.grid, col)
    }

    /// Advance one frame: fans push grains first, then every grain updates in
    /// creation order. The wind pass sees grain cells as of the start of the
    /// tick.
    pub fn tick(&mut self) {
        self.ticks += 1;

        if self.config.wind_enabled && !self.fans.is_empty() {
            self.refresh_cell_index();
            for fan in &mut self.fans {
                fan.update(&mut self.rng, &self.config, &self.cell_index, &mut self.grains);
            }
        }

        for i in 0..self.grains.len() {
            update_grain(GrainId::new(i), &mut self.grains, &mut self.grid, &self.config);
        }
        self.index_stale = true;
    }

    /// Run `n` ticks.
    pub fn run(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn refresh_cell_index(&mut self) {
        if self.index_stale {
            self.cell_index
                .build(self.grains.iter().map(|g| (g.id(), g.cell())));
            self.index_stale = false;
        }
    }

    fn has_grain_in(&mut self, cell: IVec2) -> bool {
        self.refresh_cell_index();
        !self.cell_index.grains_in(cell).is_empty()
    }
}
