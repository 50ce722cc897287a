use glam::{IVec2, Vec2};

use crate::grain::GrainId;

/// Cell containing a pixel position. Negative coordinates floor toward -inf,
/// so anything left of or above the playfield maps to a negative cell.
#[inline]
pub fn cell_of(position: Vec2, cell_size: f32) -> IVec2 {
    (position / cell_size).floor().as_ivec2()
}

/// Top-left pixel corner of a cell.
#[inline]
pub fn cell_origin(cell: IVec2, cell_size: f32) -> Vec2 {
    cell.as_vec2() * cell_size
}

/// Occupancy map of the playfield.
///
/// A cell is occupied iff a locked grain rests in it, and the map records
/// which one. Cells outside `[0, cols) x [0, rows)` read as empty and
/// writes to them are dropped.
pub struct Grid {
    cols: u32,
    rows: u32,
    owners: Vec<Option<GrainId>>,
    occupied: usize,
}

impl Grid {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            owners: vec![None; cols as usize * rows as usize],
            occupied: 0,
        }
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }

    #[inline]
    fn index(&self, cell: IVec2) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.cols as usize + cell.x as usize)
        } else {
            None
        }
    }

    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.owner(cell).is_some()
    }

    /// Grain resting in `cell`, if any.
    pub fn owner(&self, cell: IVec2) -> Option<GrainId> {
        self.index(cell).and_then(|i| self.owners[i])
    }

    /// Claim `cell` for `grain`. Returns false (and changes nothing) when the
    /// cell is out of bounds or already claimed by a different grain.
    pub fn set_occupied(&mut self, cell: IVec2, grain: GrainId) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        match self.owners[i] {
            Some(existing) => existing == grain,
            None => {
                self.owners[i] = Some(grain);
                self.occupied += 1;
                true
            }
        }
    }

    /// Release `cell` unconditionally. Returns the grain that held it.
    pub fn clear(&mut self, cell: IVec2) -> Option<GrainId> {
        let i = self.index(cell)?;
        let previous = self.owners[i].take();
        if previous.is_some() {
            self.occupied -= 1;
        }
        previous
    }

    /// Release `cell` only if `grain` is the one holding it.
    pub fn release(&mut self, cell: IVec2, grain: GrainId) -> bool {
        if self.owner(cell) == Some(grain) {
            self.clear(cell);
            true
        } else {
            false
        }
    }

    /// Number of occupied cells.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }
}

/// Dense per-cell bucket index over every live grain, locked or not.
///
/// Built with a counting sort: count grains per cell -> prefix sum ->
/// scatter. Grains outside the playfield are left out.
pub struct CellIndex {
    cols: u32,
    rows: u32,
    /// Scratch counts, reused as scatter offsets.
    cell_count: Vec<u32>,
    /// `cell_start[c]` is where the grains of cell `c` begin in `sorted`.
    cell_start: Vec<u32>,
    sorted: Vec<GrainId>,
    /// Cell slot per input entry, `None` when out of bounds.
    slots: Vec<Option<usize>>,
}

impl CellIndex {
    pub fn new(cols: u32, rows: u32) -> Self {
        let cells = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            cell_count: vec![0; cells],
            cell_start: vec![0; cells + 1],
            sorted: Vec::new(),
            slots: Vec::new(),
        }
    }

    #[inline]
    fn slot(&self, cell: IVec2) -> Option<usize> {
        if cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows {
            Some(cell.y as usize * self.cols as usize + cell.x as usize)
        } else {
            None
        }
    }

    /// Rebuild from `(grain, cell)` pairs.
    pub fn build<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (GrainId, IVec2)>,
    {
        let entries: Vec<(GrainId, IVec2)> = entries.into_iter().collect();

        self.cell_count.iter_mut().for_each(|c| *c = 0);
        self.slots.clear();
        for &(_, cell) in &entries {
            let slot = self.slot(cell);
            if let Some(s) = slot {
                self.cell_count[s] += 1;
            }
            self.slots.push(slot);
        }

        self.cell_start[0] = 0;
        for k in 0..self.cell_count.len() {
            self.cell_start[k + 1] = self.cell_start[k] + self.cell_count[k];
        }

        self.cell_count.iter_mut().for_each(|c| *c = 0);
        let total = self.cell_start[self.cell_count.len()] as usize;
        self.sorted.clear();
        self.sorted.resize(total, GrainId(0));
        for (&(grain, _), slot) in entries.iter().zip(&self.slots) {
            if let Some(s) = *slot {
                let at = self.cell_start[s] + self.cell_count[s];
                self.sorted[at as usize] = grain;
                self.cell_count[s] += 1;
            }
        }
    }

    /// Grains whose cell was `cell` at build time.
    pub fn grains_in(&self, cell: IVec2) -> &[GrainId] {
        match self.slot(cell) {
            Some(s) => &self.sorted[self.cell_start[s] as usize..self.cell_start[s + 1] as usize],
            None => &[],
        }
    }

    /// Number of indexed grains.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}
