use grainfall_core::config::{SandConfig, DEFAULT_UI_STRIP};
use grainfall_core::{Ruleset, Simulation};
use wasm_bindgen::prelude::*;

/// Render-side grain record: 20 bytes, read directly by the host renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuGrain {
    position: [f32; 2], //  8 bytes, top-left corner in pixels
    size: f32,          //  4 bytes
    flags: u32,         //  4 bytes, see FLAG_*
    color: [u8; 4],     //  4 bytes, RGBA
}

/// Render-side wind particle: 8 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuWind {
    position: [f32; 2],
}

const FLAG_LOCKED: u32 = 1;
const FLAG_FROZEN: u32 = 2;

/// Sand tint for a moisture level: wetter grains are darker and bluer.
fn moisture_tint(moisture: u8) -> [u8; 4] {
    let wet = moisture.saturating_sub(1);
    [
        222u8.saturating_sub(wet.saturating_mul(20)),
        161u8.saturating_sub(wet.saturating_mul(15)),
        32u8.saturating_add(wet.saturating_mul(10)),
        255,
    ]
}

fn pack_grains(sim: &Simulation, out: &mut Vec<GpuGrain>) {
    let size = sim.config().cell_size;
    out.clear();
    out.extend(sim.grains().iter().map(|grain| {
        let mut flags = 0;
        if grain.is_locked() {
            flags |= FLAG_LOCKED;
        }
        if grain.is_frozen() {
            flags |= FLAG_FROZEN;
        }
        GpuGrain {
            position: grain.position().to_array(),
            size,
            flags,
            color: moisture_tint(grain.moisture()),
        }
    }));
}

fn pack_wind(sim: &Simulation, out: &mut Vec<GpuWind>) {
    out.clear();
    out.extend(sim.wind_particles().map(|p| GpuWind {
        position: p.position().to_array(),
    }));
}

#[wasm_bindgen]
pub struct GrainWorld {
    sim: Simulation,
    grain_buffer: Vec<GpuGrain>,
    wind_buffer: Vec<GpuWind>,
}

#[wasm_bindgen]
impl GrainWorld {
    /// Build a world for a `width` x `height` viewport, keeping the bottom
    /// UI strip free.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, cell_size: u32) -> Result<GrainWorld, JsValue> {
        let config = SandConfig::for_viewport(width, height, DEFAULT_UI_STRIP, cell_size);
        let sim = Simulation::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        web_sys::console::log_1(
            &format!(
                "WASM GrainWorld created: {}x{} cells",
                sim.config().cols,
                sim.config().rows
            )
            .into(),
        );

        Ok(GrainWorld {
            sim,
            grain_buffer: Vec::new(),
            wind_buffer: Vec::new(),
        })
    }

    /// Advance `frames` ticks and refresh the render buffers. Returns the
    /// elapsed wall time in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self, frames: u32) -> f32 {
        let start = js_sys::Date::now();
        self.sim.run(frames);
        self.write_output();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    /// Drop a grain under the cursor. Returns its id, or nothing when the
    /// cell is outside the grid or taken.
    #[wasm_bindgen]
    pub fn place_grain(&mut self, x: f32, y: f32, moisture: u8) -> Option<u32> {
        let id = self.sim.place_grain(glam::Vec2::new(x, y), moisture)?;
        self.write_output();
        Some(id.index() as u32)
    }

    #[wasm_bindgen]
    pub fn place_fan(&mut self, x: f32, y: f32) -> u32 {
        self.sim.place_wind_source(glam::Vec2::new(x, y)).index() as u32
    }

    /// 0 = windswept, 1 = drifting, anything else = classic.
    #[wasm_bindgen]
    pub fn set_ruleset(&mut self, id: u8) {
        self.sim.apply_ruleset(Ruleset::from_id(id));
    }

    #[wasm_bindgen]
    pub fn cols(&self) -> u32 {
        self.sim.config().cols
    }

    #[wasm_bindgen]
    pub fn rows(&self) -> u32 {
        self.sim.config().rows
    }

    #[wasm_bindgen]
    pub fn grain_count(&self) -> usize {
        self.grain_buffer.len()
    }

    #[wasm_bindgen]
    pub fn locked_count(&self) -> usize {
        self.sim.locked_count()
    }

    #[wasm_bindgen]
    pub fn get_grain_buffer_ptr(&self) -> *const u8 {
        bytemuck::cast_slice::<GpuGrain, u8>(&self.grain_buffer).as_ptr()
    }

    #[wasm_bindgen]
    pub fn get_grain_buffer_byte_length(&self) -> usize {
        self.grain_buffer.len() * std::mem::size_of::<GpuGrain>()
    }

    #[wasm_bindgen]
    pub fn wind_count(&self) -> usize {
        self.wind_buffer.len()
    }

    #[wasm_bindgen]
    pub fn get_wind_buffer_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<GpuWind, f32>(&self.wind_buffer).as_ptr()
    }

    #[wasm_bindgen]
    pub fn get_wind_buffer_byte_length(&self) -> usize {
        self.wind_buffer.len() * std::mem::size_of::<GpuWind>()
    }
}

impl GrainWorld {
    fn write_output(&mut self) {
        pack_grains(&self.sim, &mut self.grain_buffer);
        pack_wind(&self.sim, &mut self.wind_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, Vec2};

    fn seeded() -> Simulation {
        Simulation::new(SandConfig {
            seed: Some(3),
            ..SandConfig::default()
        })
        .expect("default config is valid")
    }

    #[test]
    fn test_gpu_layout_sizes() {
        assert_eq!(std::mem::size_of::<GpuGrain>(), 20);
        assert_eq!(std::mem::size_of::<GpuWind>(), 8);
    }

    #[test]
    fn test_moisture_tint_range() {
        assert_eq!(moisture_tint(1), [222, 161, 32, 255]);
        assert_eq!(moisture_tint(10), [42, 26, 122, 255]);
        // out-of-range input saturates instead of wrapping
        assert_eq!(moisture_tint(0), [222, 161, 32, 255]);
        assert_eq!(moisture_tint(255), [0, 0, 255, 255]);
    }

    #[test]
    fn test_pack_grains_flags_and_color() {
        let mut sim = seeded();
        sim.place_grain(Vec2::new(15.0, 15.0), 4).expect("free cell");
        sim.spawn_resting(IVec2::new(3, 49), 10).expect("free cell");

        let mut out = Vec::new();
        pack_grains(&sim, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, [10.0, 10.0]);
        assert_eq!(out[0].flags, 0);
        assert_eq!(out[0].color, moisture_tint(4));
        assert_eq!(out[1].position, [30.0, 490.0]);
        assert_eq!(out[1].flags, FLAG_LOCKED);
        assert_eq!(out[1].size, 10.0);
    }

    #[test]
    fn test_pack_wind_follows_particles() {
        let mut sim = Simulation::new(SandConfig {
            seed: Some(3),
            fan_spawn_interval: 1,
            ..SandConfig::default()
        })
        .expect("valid config");
        sim.place_wind_source(Vec2::new(100.0, 100.0));
        sim.run(3);

        let mut out = Vec::new();
        pack_wind(&sim, &mut out);
        assert_eq!(out.len(), sim.wind_particles().count());
        assert_eq!(out.len(), 3);
    }
}
