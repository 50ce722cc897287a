use glam::IVec2;
use tracing::trace;

use crate::grain::{Grain, GrainId};
use crate::grid::Grid;

/// Release a single grain: drop its occupancy claim and give it `seed`
/// vertical velocity so it resumes falling at once.
fn release(grains: &mut [Grain], grid: &mut Grid, id: GrainId, seed: f32) {
    let grain = &mut grains[id.index()];
    grid.release(grain.cell, id);
    grain.locked = false;
    grain.velocity.y = seed;
    trace!(grain = id.index(), cell = ?grain.cell, "unlocked");
}

/// Unlock `id` and every grain stacked on top of it.
pub fn unlock(grains: &mut [Grain], grid: &mut Grid, id: GrainId, seed: f32) {
    let cell = grains[id.index()].cell;
    release(grains, grid, id, seed);
    propagate_from(grains, grid, cell, seed);
}

/// Unlock the grain resting on top of `cell`, then the one on top of that,
/// and so on up the column. Returns how many grains were released.
///
/// Each step moves one row up and a cell holds at most one locked grain, so
/// the walk ends after at most `rows` steps.
pub fn propagate_from(grains: &mut [Grain], grid: &mut Grid, cell: IVec2, seed: f32) -> usize {
    let mut released = 0;
    let mut below = cell;
    loop {
        let above = below - IVec2::Y;
        let Some(id) = grid.owner(above) else {
            break;
        };
        release(grains, grid, id, seed);
        released += 1;
        below = above;
    }
    released
}
