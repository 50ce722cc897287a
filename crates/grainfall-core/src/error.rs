use thiserror::Error;

/// Reasons a [`SandConfig`](crate::config::SandConfig) is refused.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("playfield of {cols}x{rows} cells of {cell_size} px does not fit in f32 pixels")]
    PlayfieldTooLarge { cols: u32, rows: u32, cell_size: f32 },

    #[error("grid must have at least one cell, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },

    #[error("wind damping must lie in [0, 1), got {0}")]
    Damping(f32),

    #[error("sub-step fraction must lie in (0, 1], got {0}")]
    Substep(f32),

    #[error("grain mass must be positive, got {0}")]
    Mass(f32),

    #[error("fan spawn interval must be at least one tick")]
    SpawnInterval,

    #[error("wind jitter must be non-negative and finite, got {0}")]
    Jitter(f32),

    #[error("wind speed range is inverted: {min} > {max}")]
    WindSpeedRange { min: f32, max: f32 },
}
