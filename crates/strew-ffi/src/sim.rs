//! Engine lifecycle, editing, stepping, and read-out over handles.
//!
//! Uses a process-wide `Mutex<HandleTable<Simulation>>`; the lock is held
//! only for the duration of one call, matching the engine's one-tick
//! atomicity contract.

use std::sync::Mutex;

use strew_core::{CellKind, Diagnostic, DiagnosticSink, RandomSource, Vec3};
use strew_engine::Simulation;

use crate::handle::HandleTable;
use crate::{STREW_INVALID_HANDLE, STREW_OK};

static ENGINES: Mutex<HandleTable<Simulation>> = Mutex::new(HandleTable::new());

/// Host-supplied uniform integer callback: `(min, max)` inclusive.
pub type StrewRandomCallback = extern "C" fn(i32, i32) -> i32;

/// Host-supplied diagnostic callback: `(event code, detail)`.
pub type StrewLogCallback = extern "C" fn(i32, i32);

/// Event code for a settlement at an unexpected arrival time.
pub const STREW_LOG_SETTLED_OFF_SCHEDULE: i32 = 1;
/// Event code for a robot shadowed after a move collision.
pub const STREW_LOG_ROBOT_SHADOWED: i32 = 2;
/// Event code for a robot off the walkable grid.
pub const STREW_LOG_ROBOT_OFF_GRID: i32 = 3;
/// Event code for a suppressed arena append.
pub const STREW_LOG_ARENA_FULL: i32 = 4;
/// Event code for a map load with an unknown index.
pub const STREW_LOG_UNKNOWN_MAP: i32 = 5;

struct CallbackSource(StrewRandomCallback);

impl RandomSource for CallbackSource {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        (self.0)(min, max)
    }
}

struct CallbackSink(StrewLogCallback);

impl DiagnosticSink for CallbackSink {
    fn record(&mut self, event: Diagnostic) {
        let (code, detail) = match event {
            Diagnostic::SettledOffSchedule { robot, .. } => {
                (STREW_LOG_SETTLED_OFF_SCHEDULE, robot.0 as i32)
            }
            Diagnostic::RobotShadowed { loser, .. } => (STREW_LOG_ROBOT_SHADOWED, loser.0 as i32),
            Diagnostic::RobotOffGrid { robot, .. } => (STREW_LOG_ROBOT_OFF_GRID, robot.0 as i32),
            Diagnostic::ArenaFull { capacity } => (STREW_LOG_ARENA_FULL, capacity as i32),
            Diagnostic::UnknownMap { index } => (STREW_LOG_UNKNOWN_MAP, index),
        };
        (self.0)(code, detail);
    }
}

fn with_engine<R>(handle: u64, default: R, f: impl FnOnce(&mut Simulation) -> R) -> R {
    let mut engines = ENGINES.lock().unwrap_or_else(|e| e.into_inner());
    match engines.get_mut(handle) {
        Some(sim) => f(sim),
        None => default,
    }
}

fn edit(handle: u64, f: impl FnOnce(&mut Simulation)) -> i32 {
    with_engine(handle, STREW_INVALID_HANDLE, |sim| {
        f(sim);
        STREW_OK
    })
}

// ── Lifecycle ───────────────────────────────────────────────────────

/// Create an engine over the built-in catalog and return its handle.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_create() -> u64 {
    ENGINES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(Simulation::new())
}

/// Destroy an engine. Stale handles are a safe no-op.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_destroy(handle: u64) -> i32 {
    match ENGINES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .remove(handle)
    {
        Some(_) => STREW_OK,
        None => STREW_INVALID_HANDLE,
    }
}

// ── Host seams ──────────────────────────────────────────────────────

/// Route activation sampling through a host callback.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_set_random_callback(handle: u64, callback: StrewRandomCallback) -> i32 {
    edit(handle, |sim| sim.set_rng(Box::new(CallbackSource(callback))))
}

/// Reseed the default random source.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_seed_random(handle: u64, seed: u64) -> i32 {
    edit(handle, |sim| sim.seed_rng(seed))
}

/// Route diagnostic events to a host callback as `(event code, detail)`
/// pairs. Diagnostics never alter engine behavior.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_set_log_callback(handle: u64, callback: StrewLogCallback) -> i32 {
    edit(handle, |sim| {
        sim.set_diagnostic_sink(Box::new(CallbackSink(callback)))
    })
}

// ── World lifecycle and editing ─────────────────────────────────────

/// Clamp dimensions and clear all state.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_init_grid(handle: u64, x: i32, y: i32, z: i32) -> i32 {
    edit(handle, |sim| sim.init_grid(x, y, z))
}

/// Edit one cell; `value` is a [`CellKind`] code in `0..=4`. Unknown codes
/// and out-of-volume coordinates are ignored.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_set_cell(handle: u64, x: i32, y: i32, z: i32, value: i32) -> i32 {
    edit(handle, |sim| {
        if let Some(kind) = CellKind::from_code(value) {
            sim.set_cell(Vec3::new(x, y, z), kind);
        }
    })
}

/// Append an active robot at a coordinate.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_add_robot(handle: u64, x: i32, y: i32, z: i32) -> i32 {
    edit(handle, |sim| sim.add_robot(Vec3::new(x, y, z)))
}

/// Retarget the door cell. Coordinates pass straight through.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_set_start_position(handle: u64, x: i32, y: i32, z: i32) -> i32 {
    edit(handle, |sim| sim.set_start_position(Vec3::new(x, y, z)))
}

/// Load a catalog entry by index.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_load_map(handle: u64, index: i32) -> i32 {
    edit(handle, |sim| sim.load_map(index))
}

/// Reload the last loaded map and reset metrics and events.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_reset_simulation(handle: u64) -> i32 {
    edit(handle, |sim| sim.reset_simulation())
}

// ── Simulation control and read-out ─────────────────────────────────

/// Advance one tick.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_simulate_step(handle: u64) -> i32 {
    edit(handle, |sim| sim.simulate_step())
}

/// Whether the run is complete. 1 / 0; stale handles read 0.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_is_simulation_complete(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| i32::from(sim.is_complete()))
}

/// Set the activation probability; clamped to `[0, 100]`.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_set_active_probability(handle: u64, probability: i32) -> i32 {
    edit(handle, |sim| sim.set_active_probability(probability))
}

/// Render view of a cell as a [`CellKind`] code.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_cell(handle: u64, x: i32, y: i32, z: i32) -> i32 {
    with_engine(handle, CellKind::Empty.code(), |sim| {
        sim.cell_view(Vec3::new(x, y, z)).code()
    })
}

/// Whether the cell holds a settled robot aged into the scenery. 1 / 0.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_is_cell_aged(handle: u64, x: i32, y: i32, z: i32) -> i32 {
    with_engine(handle, 0, |sim| i32::from(sim.cell_aged(Vec3::new(x, y, z))))
}

/// Grid extent along x.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_grid_size_x(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.grid().size_x())
}

/// Grid extent along y.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_grid_size_y(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.grid().size_y())
}

/// Grid extent along z.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_grid_size_z(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.grid().size_z())
}

/// Number of robots in the arena.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_robot_count(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.robot_count() as i32)
}

/// Poll one robot's packed state transition; −1 for unknown ids.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_pop_robot_state(handle: u64, robot: i32) -> i32 {
    with_engine(handle, -1, |sim| sim.pop_robot_state(robot))
}

/// Count of walkable cells in the current map.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_available_cells(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.grid().available_cells() as i32)
}

/// Tick index of the last settlement.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_makespan(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().makespan as i32)
}

/// Maximum positional moves over robots.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_t_max(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().t_max as i32)
}

/// Total positional moves over robots.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_t_total(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().t_total as i32)
}

/// Maximum active ticks over robots.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_e_max(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().e_max as i32)
}

/// Total active ticks over robots.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_e_total(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().e_total as i32)
}

/// Ticks executed since the last load or reset.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn strew_get_simulation_steps(handle: u64) -> i32 {
    with_engine(handle, 0, |sim| sim.metrics().simulation_steps as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_round_trip() {
        let h = strew_create();
        assert_eq!(strew_load_map(h, 0), STREW_OK);
        assert_eq!(strew_get_grid_size_x(h), 1);
        assert_eq!(strew_get_available_cells(h), 1);
        assert_eq!(strew_simulate_step(h), STREW_OK);
        assert_eq!(strew_get_robot_count(h), 1);
        assert_eq!(strew_destroy(h), STREW_OK);
        assert_eq!(strew_destroy(h), STREW_INVALID_HANDLE);
        assert_eq!(strew_simulate_step(h), STREW_INVALID_HANDLE);
        assert_eq!(strew_get_robot_count(h), 0);
    }

    #[test]
    fn single_cell_run_completes_through_the_surface() {
        let h = strew_create();
        strew_load_map(h, 0);
        strew_set_active_probability(h, 100);
        let mut guard = 0;
        while strew_is_simulation_complete(h) == 0 {
            strew_simulate_step(h);
            guard += 1;
            assert!(guard < 20);
        }
        assert_eq!(strew_get_cell(h, 0, 0, 0), CellKind::Door.code());
        assert!(strew_get_makespan(h) >= 2);
        strew_destroy(h);
    }

    #[test]
    fn host_callback_drives_activation() {
        extern "C" fn always_sleep(_min: i32, _max: i32) -> i32 {
            100
        }
        let h = strew_create();
        strew_load_map(h, 1);
        strew_set_active_probability(h, 0);
        assert_eq!(strew_set_random_callback(h, always_sleep), STREW_OK);
        strew_simulate_step(h); // spawn
        strew_simulate_step(h); // everyone sleeps
        assert_eq!(strew_get_t_total(h), 0);
        assert_eq!(strew_is_simulation_complete(h), 0);
        strew_destroy(h);
    }

    #[test]
    fn editing_surface_round_trips() {
        let h = strew_create();
        strew_init_grid(h, 2, 2, 2);
        strew_set_cell(h, 0, 0, 0, CellKind::Empty.code());
        strew_set_cell(h, 1, 0, 0, CellKind::ActiveRobot.code());
        strew_set_cell(h, 0, 1, 0, 99); // unknown code: ignored
        assert_eq!(strew_get_available_cells(h), 2);
        assert_eq!(strew_get_robot_count(h), 1);
        assert_eq!(strew_set_start_position(h, 1, 0, 0), STREW_OK);
        assert_eq!(strew_get_cell(h, 1, 0, 0), CellKind::Door.code());
        strew_destroy(h);
    }
}
