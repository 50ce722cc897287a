use glam::{IVec2, Vec2};
use grainfall_core::{SandConfig, Simulation};

fn sim() -> Simulation {
    Simulation::new(SandConfig {
        seed: Some(5),
        ..SandConfig::default()
    })
    .expect("default config is valid")
}

#[test]
fn test_supported_stack_is_stable() {
    let mut sim = sim();
    for row in 45..50 {
        sim.spawn_resting(IVec2::new(7, row), 1).expect("free cell");
    }
    assert!(sim.column_stable(7));
}

#[test]
fn test_floating_grain_makes_column_unstable() {
    let mut sim = sim();
    sim.spawn_resting(IVec2::new(5, 49), 1).expect("free cell");
    sim.spawn_resting(IVec2::new(5, 30), 1).expect("free cell");
    assert!(!sim.column_stable(5), "grain at row 30 has nothing under it");
    assert!(sim.column_stable(4));
    assert!(sim.column_stable(6));
}

#[test]
fn test_falling_grain_does_not_lock_onto_unstable_column() {
    let mut sim = sim();
    sim.spawn_resting(IVec2::new(5, 30), 1).expect("free cell");
    let falling = sim.place_grain(Vec2::new(55.0, 5.0), 3).expect("free cell");

    for tick in 0..30 {
        sim.tick();
        let grain = sim.grain(falling).expect("grain exists");
        assert!(!grain.is_locked(), "locked onto an unstable column at tick {tick}");
        assert!(grain.cell().y < 30, "passed through the floating grain at tick {tick}");
    }
}

#[test]
fn test_avalanche_settles_once_support_returns() {
    let mut sim = sim();
    let floater = sim.spawn_resting(IVec2::new(5, 30), 1).expect("free cell");
    let falling = sim.place_grain(Vec2::new(55.0, 5.0), 3).expect("free cell");
    sim.run(30);

    sim.unlock(floater);
    sim.run(30);

    let a = sim.grain(floater).expect("grain exists");
    let b = sim.grain(falling).expect("grain exists");
    assert!(a.is_locked() && b.is_locked(), "both grains should settle");
    let mut rows = [a.cell().y, b.cell().y];
    rows.sort();
    assert_eq!(rows, [48, 49]);
    assert!(sim.column_stable(5));
}

#[test]
fn test_held_back_grain_does_not_gather_speed() {
    let mut sim = sim();
    sim.spawn_resting(IVec2::new(5, 30), 1).expect("free cell");
    let falling = sim.place_grain(Vec2::new(55.0, 5.0), 3).expect("free cell");

    sim.run(20);
    for tick in 0..100 {
        sim.tick();
        let vy = sim.grain(falling).expect("grain exists").velocity().y;
        assert_eq!(vy, 0.0, "speed built up while waiting at tick {tick}");
    }
}
