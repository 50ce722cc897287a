use glam::{IVec2, Vec2};
use tracing::{debug, trace};

use crate::config::{DriftMode, SandConfig};
use crate::grid::{cell_of, cell_origin, Grid};
use crate::stability::column_stable;
use crate::unlock::propagate_from;

/// Stable handle of a grain: its slot in the simulation's grain arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct GrainId(pub(crate) u32);

impl GrainId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One sand particle.
///
/// `position` is the pixel coordinate of the grain's top-left corner.
/// `cell` is always derived from it and is only written by the update pass.
#[derive(Clone, Debug)]
pub struct Grain {
    pub(crate) id: GrainId,
    pub(crate) position: Vec2,
    pub(crate) cell: IVec2,
    pub(crate) locked: bool,
    pub(crate) frozen: bool,
    pub(crate) moisture: u8,
    pub(crate) velocity: Vec2,
    pub(crate) acceleration: Vec2,
    /// Wind forcing, integrated apart from gravity so it can decay on its own.
    pub(crate) push_velocity: Vec2,
    pub(crate) push_acceleration: Vec2,
    pub(crate) mass: f32,
}

impl Grain {
    pub(crate) fn new(id: GrainId, cell: IVec2, cell_size: f32, moisture: u8, mass: f32) -> Self {
        Self {
            id,
            position: cell_origin(cell, cell_size),
            cell,
            locked: false,
            frozen: false,
            moisture,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            push_velocity: Vec2::ZERO,
            push_acceleration: Vec2::ZERO,
            mass,
        }
    }

    #[inline]
    pub fn id(&self) -> GrainId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True once the grain has left the horizontal playfield.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn moisture(&self) -> u8 {
        self.moisture
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn push_velocity(&self) -> Vec2 {
        self.push_velocity
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Accumulate an external force for the next update.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Accumulate a wind force for the next update.
    pub fn wind_push(&mut self, force: Vec2) {
        self.push_acceleration += force / self.mass;
    }
}

/// Advance grain `id` by one tick.
///
/// Mutates the grid when the grain locks or leaves its cell, and may unlock
/// the grains stacked on top of it. Accumulated forces are consumed.
pub fn update_grain(id: GrainId, grains: &mut [Grain], grid: &mut Grid, config: &SandConfig) {
    let idx = id.index();
    if grains[idx].frozen {
        return;
    }

    advance(id, grains, grid, config);

    grains[idx].acceleration = Vec2::ZERO;
}

fn advance(id: GrainId, grains: &mut [Grain], grid: &mut Grid, config: &SandConfig) {
    let idx = id.index();
    let cell_size = config.cell_size;

    let old_cell = cell_of(grains[idx].position, cell_size);
    grains[idx].cell = old_cell;

    // Wind push acts before and independent of the lock state.
    {
        let grain = &mut grains[idx];
        grain.push_velocity += grain.push_acceleration;
        grain.position += grain.push_velocity;
        grain.cell = cell_of(grain.position, cell_size);
    }
    if grains[idx].cell != old_cell {
        grid.release(old_cell, id);
        let grain = &mut grains[idx];
        if grain.locked {
            grain.locked = false;
            grain.velocity.y = config.unlock_velocity;
            trace!(grain = idx, "pushed out of its resting cell");
        }
        if config.unlock_propagation {
            propagate_from(grains, grid, old_cell, config.unlock_velocity);
        }
    }

    let grain = &mut grains[idx];
    grain.push_velocity *= config.wind_damping;
    grain.push_acceleration = Vec2::ZERO;

    if grain.position.x < 0.0 || grain.position.x + cell_size > config.width() {
        grain.frozen = true;
        debug!(grain = idx, x = grain.position.x, "left the playfield, frozen");
        return;
    }

    if grain.locked {
        return;
    }

    grain.acceleration.y += config.gravity;
    grain.velocity += grain.acceleration;

    if config.drift == DriftMode::Coupled {
        drift_sideways(grain, grid, config);
    }

    fall(id, grains, grid, config);
}

/// Move a falling grain by its horizontal velocity, clamped to the playfield
/// and refusing to enter an occupied cell.
fn drift_sideways(grain: &mut Grain, grid: &Grid, config: &SandConfig) {
    if grain.velocity.x == 0.0 {
        return;
    }
    let cell_size = config.cell_size;
    let max_x = config.width() - cell_size;
    let wanted = grain.position.x + grain.velocity.x;
    let target_x = wanted.clamp(0.0, max_x);
    let target = cell_of(Vec2::new(target_x, grain.position.y), cell_size);

    if target.x != grain.cell.x && grid.is_occupied(target) {
        grain.velocity.x = 0.0;
        return;
    }
    if target_x != wanted {
        grain.velocity.x = 0.0;
    }
    grain.position.x = target_x;
    grain.cell = target;
}

/// Sub-stepped vertical fall. Each increment is at most `max_substep` so a
/// one-cell-thick obstacle can never be skipped.
fn fall(id: GrainId, grains: &mut [Grain], grid: &mut Grid, config: &SandConfig) {
    let idx = id.index();
    let cell_size = config.cell_size;
    let max_step = config.max_substep();
    let rows = grid.rows() as i32;
    let col = grains[idx].cell.x;

    let mut remaining = grains[idx].velocity.y;
    while remaining > 0.0 {
        let step = remaining.min(max_step);
        let next_y = grains[idx].position.y + step;
        let next_row = (next_y / cell_size).floor() as i32;

        if next_row >= rows || grid.is_occupied(IVec2::new(col, next_row)) {
            // A grain pushed onto a claimed cell rests on the first free
            // cell above it.
            let mut rest = IVec2::new(col, next_row - 1);
            while rest.y >= 0 && grid.is_occupied(rest) {
                rest.y -= 1;
            }
            let grain = &mut grains[idx];
            if rest.y < 0 || !column_stable(grid, col) || !lock(grain, grid, rest, cell_size) {
                // held back, restart from rest
                grain.velocity.y = 0.0;
            }
            return;
        }

        let grain = &mut grains[idx];
        grain.position.y = next_y;
        grain.cell.y = next_row;
        remaining -= step;
    }
}

/// Settle a grain at `rest`. Leaves it falling, and returns false, if the
/// cell cannot be claimed.
fn lock(grain: &mut Grain, grid: &mut Grid, rest: IVec2, cell_size: f32) -> bool {
    if !grid.set_occupied(rest, grain.id) {
        trace!(grain = grain.id.index(), ?rest, "lock target unavailable");
        return false;
    }
    grain.locked = true;
    grain.cell = rest;
    grain.position = cell_origin(rest, cell_size);
    grain.velocity = Vec2::ZERO;
    trace!(grain = grain.id.index(), ?rest, "locked");
    true
}
