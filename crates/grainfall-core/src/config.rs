use crate::error::ConfigError;

/// Lowest moisture level a grain can carry.
pub const MOISTURE_MIN: u8 = 1;
/// Highest moisture level a grain can carry.
pub const MOISTURE_MAX: u8 = 10;

/// Height in pixels of the strip kept free for the tool UI under the playfield.
pub const DEFAULT_UI_STRIP: u32 = 100;

/// How grains drift sideways.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DriftMode {
    /// Horizontal motion comes only from wind push; applied horizontal
    /// forces are accumulated but never move the grain.
    Wind,
    /// Horizontal velocity is integrated alongside gravity and moves the
    /// grain before the fall loop, clamped to the playfield edges.
    Coupled,
}

#[derive(Clone, Debug)]
pub struct SandConfig {
    /// Edge length of one grid cell in pixels.
    pub cell_size: f32,
    pub cols: u32,
    pub rows: u32,
    /// Per-tick vertical acceleration. Not scaled by mass.
    pub gravity: f32,
    /// Multiplier applied to the wind push velocity every tick.
    pub wind_damping: f32,
    /// Largest fall increment as a fraction of `cell_size`.
    pub substep_fraction: f32,
    /// Vertical velocity a grain restarts with when it is unlocked.
    pub unlock_velocity: f32,
    pub grain_mass: f32,
    /// Ticks between two wind particles of the same fan.
    pub fan_spawn_interval: u32,
    /// Fan height in cells; particles spawn anywhere along it.
    pub fan_height_cells: u32,
    pub wind_speed_min: f32,
    pub wind_speed_max: f32,
    /// Bound of the per-tick Brownian jitter on each axis.
    pub wind_jitter: f32,
    /// Fraction of a particle's horizontal velocity handed to a grain as force.
    pub wind_push_scale: f32,
    pub drift: DriftMode,
    pub wind_enabled: bool,
    pub unlock_propagation: bool,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            cols: 80,
            rows: 50,
            gravity: 10.0,
            wind_damping: 0.9,
            substep_fraction: 0.5,
            unlock_velocity: 1.0,
            grain_mass: 0.1,
            fan_spawn_interval: 20,
            fan_height_cells: 8,
            wind_speed_min: 0.5,
            wind_speed_max: 0.7,
            wind_jitter: 100.0 / 3000.0,
            wind_push_scale: 0.5,
            drift: DriftMode::Wind,
            wind_enabled: true,
            unlock_propagation: true,
            seed: None,
        }
    }
}

impl SandConfig {
    /// Size the grid from a viewport, reserving `reserved_ui` pixels at the
    /// bottom for the tool strip. Partial cells are dropped.
    pub fn for_viewport(width: u32, height: u32, reserved_ui: u32, cell_size: u32) -> Self {
        let cell = cell_size.max(1);
        Self {
            cell_size: cell as f32,
            cols: width / cell,
            rows: height.saturating_sub(reserved_ui) / cell,
            ..Self::default()
        }
    }

    /// Playfield width in pixels.
    #[inline]
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    /// Playfield height in pixels.
    #[inline]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Largest distance a grain may fall in one collision-checked increment.
    #[inline]
    pub fn max_substep(&self) -> f32 {
        self.cell_size * self.substep_fraction
    }

    /// Reject settings the tick loop cannot run with. Every float that
    /// reaches the integrator or a random range must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        let fan_height = self.fan_height_cells as f32 * self.cell_size;
        if !(self.width().is_finite() && self.height().is_finite() && fan_height.is_finite()) {
            return Err(ConfigError::PlayfieldTooLarge {
                cols: self.cols,
                rows: self.rows,
                cell_size: self.cell_size,
            });
        }
        for (field, value) in [
            ("gravity", self.gravity),
            ("unlock_velocity", self.unlock_velocity),
            ("wind_push_scale", self.wind_push_scale),
            ("wind_speed_min", self.wind_speed_min),
            ("wind_speed_max", self.wind_speed_max),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if !(0.0..1.0).contains(&self.wind_damping) {
            return Err(ConfigError::Damping(self.wind_damping));
        }
        if !(self.substep_fraction > 0.0 && self.substep_fraction <= 1.0) {
            return Err(ConfigError::Substep(self.substep_fraction));
        }
        if !(self.grain_mass > 0.0 && self.grain_mass.is_finite()) {
            return Err(ConfigError::Mass(self.grain_mass));
        }
        if self.fan_spawn_interval == 0 {
            return Err(ConfigError::SpawnInterval);
        }
        // sampled ranges need headroom: the sampler rescales their width
        if !(self.wind_jitter >= 0.0 && (self.wind_jitter * 4.0).is_finite()) {
            return Err(ConfigError::Jitter(self.wind_jitter));
        }
        if self.wind_speed_min > self.wind_speed_max
            || !((self.wind_speed_max - self.wind_speed_min) * 2.0).is_finite()
        {
            return Err(ConfigError::WindSpeedRange {
                min: self.wind_speed_min,
                max: self.wind_speed_max,
            });
        }
        Ok(())
    }
}
