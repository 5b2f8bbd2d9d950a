//! The engine handle: world editing, the tick loop, and the read-out
//! surface.
//!
//! [`Simulation`] is what hosts embed. All state lives behind it, so any
//! number of instances can coexist; a multi-run comparison dashboard can
//! hold a dozen engines without any shared mutable state.

use strew_core::{
    CellKind, CellState, ChaChaSource, Diagnostic, DiagnosticSink, NullSink, RandomSource,
    RobotId, Vec3,
};
use strew_maps::{MapData, BUILTIN};
use strew_world::{Grid, Neighborhood};

use crate::events::EventLog;
use crate::metrics::Metrics;
use crate::robot::{Robot, AGED_AFTER};

/// Default activation probability, in percent.
pub const DEFAULT_ACTIVE_PROBABILITY: i32 = 50;

/// One independent dispersion engine instance.
pub struct Simulation {
    grid: Grid,
    robots: Vec<Robot>,
    events: EventLog,
    metrics: Metrics,
    active_probability: i32,
    rng: Box<dyn RandomSource>,
    diag: Box<dyn DiagnosticSink>,
    catalog: &'static [MapData],
    loaded_map: Option<usize>,
    complete: bool,
}

impl Simulation {
    /// A fresh engine over the built-in map catalog, with an unseeded
    /// default random source and a discarding diagnostic sink.
    pub fn new() -> Self {
        Self::with_catalog(BUILTIN)
    }

    /// A fresh engine over a host-supplied map catalog.
    pub fn with_catalog(catalog: &'static [MapData]) -> Self {
        Self {
            grid: Grid::new(1, 1, 1),
            robots: Vec::new(),
            events: EventLog::new(),
            metrics: Metrics::default(),
            active_probability: DEFAULT_ACTIVE_PROBABILITY,
            rng: Box::new(ChaChaSource::default()),
            diag: Box::new(NullSink),
            catalog,
            loaded_map: None,
            complete: false,
        }
    }

    // ── Host seams ──────────────────────────────────────────────────

    /// Replace the randomness source.
    pub fn set_rng(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
    }

    /// Replace the default source with a freshly seeded one.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = Box::new(ChaChaSource::seeded(seed));
    }

    /// Replace the diagnostic sink.
    pub fn set_diagnostic_sink(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.diag = sink;
    }

    // ── World lifecycle and editing ─────────────────────────────────

    /// Clamp the dimensions and clear every table: grid, robots, events,
    /// metrics. The last-loaded map index survives so a later reset can
    /// still reload it.
    pub fn init_grid(&mut self, size_x: i32, size_y: i32, size_z: i32) {
        self.grid = Grid::new(size_x, size_y, size_z);
        self.robots.clear();
        self.events.clear();
        self.metrics.reset();
        self.complete = false;
    }

    /// Edit one cell.
    ///
    /// Walkability follows the placed kind (everything but Wall is
    /// walkable). Placing Wall onto an active robot forces it settled and
    /// immediately aged. Placing a robot kind appends a robot iff the cell
    /// is robot-free; otherwise the existing robot's active flag is
    /// updated. Placing Door retargets the door. Empty never removes a
    /// robot. Out-of-volume coordinates and the SleepingRobot view code
    /// are ignored.
    pub fn set_cell(&mut self, v: Vec3, kind: CellKind) {
        if !self.grid.contains(v) || kind == CellKind::SleepingRobot {
            return;
        }
        self.grid.set_walkable(v, kind != CellKind::Wall);
        match kind {
            CellKind::Wall => {
                if let Some(id) = self.grid.robot_at(v) {
                    if let Some(robot) = self.robots.get_mut(id.index()) {
                        if robot.active {
                            robot.active = false;
                            robot.settled_age = AGED_AFTER + 1;
                        }
                    }
                }
            }
            CellKind::ActiveRobot | CellKind::SettledRobot => {
                let active = kind == CellKind::ActiveRobot;
                match self.grid.robot_at(v) {
                    Some(id) => {
                        if let Some(robot) = self.robots.get_mut(id.index()) {
                            robot.active = active;
                        }
                    }
                    None => self.place_robot(v, active),
                }
            }
            CellKind::Door => {
                self.grid.set_door(v);
                self.grid.recompute_distances();
            }
            CellKind::Empty | CellKind::SleepingRobot => {}
        }
        self.complete = false;
    }

    /// Append an active robot at a coordinate. The occupancy index picks
    /// it up at the next rebuild. Out-of-volume coordinates are ignored.
    pub fn add_robot(&mut self, v: Vec3) {
        if !self.grid.contains(v) {
            return;
        }
        if self.arena_full() {
            return;
        }
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(Robot::new(id, v));
        self.events.push_robot();
        self.complete = false;
    }

    /// Retarget the door cell and rebuild the distance field.
    /// Out-of-volume coordinates are ignored.
    pub fn set_start_position(&mut self, v: Vec3) {
        if !self.grid.set_door(v) {
            return;
        }
        self.grid.recompute_distances();
        self.complete = false;
    }

    /// Load a catalog entry: decode walkability, set the door, rebuild the
    /// distance field, and reset metrics and event tables.
    ///
    /// An out-of-range index loads entry 0 when the catalog is non-empty
    /// (reported through the diagnostic sink) and is a no-op otherwise.
    pub fn load_map(&mut self, index: i32) {
        if self.catalog.is_empty() {
            return;
        }
        let resolved = if index < 0 || index as usize >= self.catalog.len() {
            self.diag.record(Diagnostic::UnknownMap { index });
            0
        } else {
            index as usize
        };
        let map = self.catalog[resolved];
        self.init_grid(map.size_x as i32, map.size_y as i32, map.size_z as i32);
        map.for_each_cell(|x, y, z, walkable| {
            if walkable {
                self.grid
                    .set_walkable(Vec3::new(x as i32, y as i32, z as i32), true);
            }
        });
        let (dx, dy, dz) = map.door;
        self.grid.set_door(Vec3::new(dx as i32, dy as i32, dz as i32));
        self.grid.recompute_distances();
        self.loaded_map = Some(resolved);
    }

    /// Reload the last loaded map and reset metrics and events. A no-op
    /// before the first load.
    pub fn reset_simulation(&mut self) {
        if let Some(index) = self.loaded_map {
            self.load_map(index as i32);
        }
    }

    // ── Cell queries ────────────────────────────────────────────────

    /// Internal neighborhood code of a cell: out-of-bounds, non-walkable,
    /// and settled-robot cells are walls; active robots occupy; the rest
    /// is free.
    pub fn cell_state(&self, v: Vec3) -> CellState {
        if !self.grid.is_walkable(v) {
            return CellState::Wall;
        }
        match self.grid.robot_at(v) {
            Some(id) => {
                if self.robots.get(id.index()).is_some_and(|r| r.active) {
                    CellState::Occupied
                } else {
                    CellState::Wall
                }
            }
            None => CellState::Free,
        }
    }

    /// Render view of a cell. The door always renders as Door, even with
    /// a robot on it. Out-of-bounds renders as Empty.
    pub fn cell_view(&self, v: Vec3) -> CellKind {
        if !self.grid.contains(v) {
            return CellKind::Empty;
        }
        if v == self.grid.door() {
            return CellKind::Door;
        }
        if let Some(id) = self.grid.robot_at(v) {
            if let Some(robot) = self.robots.get(id.index()) {
                return if robot.active {
                    if robot.sleeping {
                        CellKind::SleepingRobot
                    } else {
                        CellKind::ActiveRobot
                    }
                } else {
                    CellKind::SettledRobot
                };
            }
        }
        if self.grid.is_walkable(v) {
            CellKind::Empty
        } else {
            CellKind::Wall
        }
    }

    /// Whether the cell holds a settled robot old enough that consumers
    /// should stop animating it.
    pub fn cell_aged(&self, v: Vec3) -> bool {
        self.grid
            .robot_at(v)
            .and_then(|id| self.robots.get(id.index()))
            .is_some_and(|r| r.is_aged())
    }

    /// Assemble the 3×3×3 neighborhood around a cell.
    pub fn observe(&self, center: Vec3) -> Neighborhood {
        Neighborhood::from_fn(|rel| self.cell_state(center + rel))
    }

    // ── The tick ────────────────────────────────────────────────────

    /// Advance the simulation one tick.
    pub fn simulate_step(&mut self) {
        self.metrics.simulation_steps += 1;
        let mut complete = true;

        // 1. Decision phase, strictly ascending id. The world is not
        //    mutated here, so every robot observes last tick's state.
        for i in 0..self.robots.len() {
            if !self.robots[i].active {
                continue;
            }
            let roll = self.rng.random_int(0, 100);
            if roll > self.active_probability {
                self.robots[i].sleeping = true;
            } else {
                self.robots[i].sleeping = false;
                let pos = self.robots[i].position;
                let obs = self.observe(pos);
                let mut obs2 = obs;
                let tav = self.grid.distance_at(pos);
                let Self { robots, diag, .. } = self;
                robots[i].decide(&obs, &mut obs2, tav, &mut **diag);
            }
            // A robot that settled during its own decision no longer
            // counts toward keeping the run open.
            if self.robots[i].active {
                complete = false;
            }
        }

        // 2. Door respawn. The occupancy index is last tick's, so the
        //    spawn takes effect after this tick's commit.
        if self.grid.robot_at(self.grid.door()).is_none() {
            self.spawn_at_door();
            complete = false;
        }

        // 3. Commit: pending targets become positions. A target the world
        //    rejects (out of volume or walled) leaves the robot put.
        for robot in &mut self.robots {
            if robot.active {
                if robot.target != robot.position && self.grid.is_walkable(robot.target) {
                    robot.moves += 1;
                    self.metrics.t_total += 1;
                    robot.position = robot.target;
                }
                robot.ticks += 1;
                self.metrics.e_total += 1;
                self.metrics.t_max = self.metrics.t_max.max(robot.moves);
                self.metrics.e_max = self.metrics.e_max.max(robot.ticks);
            } else {
                robot.settled_age += 1;
            }
        }

        // 4. Rebuild the occupancy index and close the books.
        self.rebuild_robot_field();
        self.metrics.makespan = self.metrics.simulation_steps;
        self.complete = complete;
    }

    /// Rebuild the occupancy index from robot positions, ascending id.
    ///
    /// Earliest id wins each cell; later robots on the same cell keep
    /// their position but lose the back-pointer, which demotes them for
    /// the next observation round.
    pub fn rebuild_robot_field(&mut self) {
        self.grid.clear_robots();
        for robot in &self.robots {
            let v = robot.position;
            if !self.grid.is_walkable(v) {
                self.diag.record(Diagnostic::RobotOffGrid {
                    robot: robot.id,
                    cell: v,
                });
                continue;
            }
            match self.grid.robot_at(v) {
                Some(winner) => self.diag.record(Diagnostic::RobotShadowed {
                    loser: robot.id,
                    winner,
                    cell: v,
                }),
                None => self.grid.set_robot_at(v, robot.id),
            }
        }
    }

    /// Rebuild the BFS distance field from the current door.
    pub fn recompute_distances(&mut self) {
        self.grid.recompute_distances();
    }

    fn arena_full(&mut self) -> bool {
        if self.robots.len() >= self.grid.cell_count() {
            self.diag.record(Diagnostic::ArenaFull {
                capacity: self.grid.cell_count() as u32,
            });
            return true;
        }
        false
    }

    fn spawn_at_door(&mut self) {
        if self.arena_full() {
            return;
        }
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(Robot::new(id, self.grid.door()));
        self.events.push_robot();
    }

    /// Append a robot via the editing API, claiming the occupancy slot
    /// immediately (unlike the door spawn, which waits for the rebuild).
    fn place_robot(&mut self, v: Vec3, active: bool) {
        if self.arena_full() {
            return;
        }
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(Robot::placed(id, v, active));
        self.events.push_robot();
        self.grid.set_robot_at(v, id);
    }

    // ── Read-out ────────────────────────────────────────────────────

    /// Whether the run is complete: at the start of some tick, no robot
    /// was active and no respawn occurred. Stays true under further ticks
    /// until an external edit re-introduces activity.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Activation probability in percent.
    pub fn active_probability(&self) -> i32 {
        self.active_probability
    }

    /// Set the activation probability; clamped to `[0, 100]`.
    pub fn set_active_probability(&mut self, p: i32) {
        self.active_probability = p.clamp(0, 100);
    }

    /// Poll one robot's state transition, packed per the event contract.
    /// Unknown ids return −1.
    pub fn pop_robot_state(&mut self, id: i32) -> i32 {
        if id < 0 {
            return -1;
        }
        let idx = id as usize;
        let Some((active, last_move)) = self.robots.get(idx).map(|r| (r.active, r.last_move))
        else {
            return -1;
        };
        self.events.poll(idx, active, last_move)
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The robot arena, ascending id.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// One robot record.
    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    /// Mutable access to one robot record, for hosts that script
    /// scenarios directly.
    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.get_mut(id.index())
    }

    /// Number of robots created since the last grid initialization.
    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// The run metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The map catalog this engine loads from.
    pub fn catalog(&self) -> &'static [MapData] {
        self.catalog
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_active() -> Box<dyn RandomSource> {
        Box::new(|_min: i32, _max: i32| 0)
    }

    #[test]
    fn init_grid_clamps_and_clears() {
        let mut sim = Simulation::new();
        sim.load_map(4);
        sim.simulate_step();
        assert!(sim.robot_count() > 0);
        sim.init_grid(30, 2, 2);
        assert_eq!(sim.grid().size_x(), 20);
        assert_eq!(sim.robot_count(), 0);
        assert_eq!(sim.metrics().simulation_steps, 0);
    }

    #[test]
    fn set_cell_builds_walkability() {
        let mut sim = Simulation::new();
        sim.init_grid(2, 2, 2);
        sim.set_cell(Vec3::ZERO, CellKind::Empty);
        sim.set_cell(Vec3::new(1, 0, 0), CellKind::Empty);
        assert_eq!(sim.grid().available_cells(), 2);
        sim.set_cell(Vec3::new(1, 0, 0), CellKind::Wall);
        assert_eq!(sim.grid().available_cells(), 1);
    }

    #[test]
    fn set_cell_out_of_bounds_is_ignored() {
        let mut sim = Simulation::new();
        sim.init_grid(2, 2, 2);
        sim.set_cell(Vec3::new(5, 0, 0), CellKind::Empty);
        sim.set_cell(Vec3::new(-1, 0, 0), CellKind::ActiveRobot);
        assert_eq!(sim.grid().available_cells(), 0);
        assert_eq!(sim.robot_count(), 0);
    }

    #[test]
    fn set_cell_places_and_updates_robots() {
        let mut sim = Simulation::new();
        sim.init_grid(2, 2, 2);
        sim.set_cell(Vec3::ZERO, CellKind::ActiveRobot);
        assert_eq!(sim.robot_count(), 1);
        assert!(sim.robots()[0].active);
        // Same cell again: no append, flag update only.
        sim.set_cell(Vec3::ZERO, CellKind::SettledRobot);
        assert_eq!(sim.robot_count(), 1);
        assert!(!sim.robots()[0].active);
    }

    #[test]
    fn walling_an_active_robot_forces_aged_settlement() {
        let mut sim = Simulation::new();
        sim.init_grid(2, 2, 2);
        sim.set_cell(Vec3::ZERO, CellKind::ActiveRobot);
        sim.set_cell(Vec3::ZERO, CellKind::Wall);
        let robot = &sim.robots()[0];
        assert!(!robot.active);
        assert!(robot.is_aged());
        assert_eq!(robot.settled_age, AGED_AFTER + 1);
    }

    #[test]
    fn empty_placement_keeps_robots() {
        let mut sim = Simulation::new();
        sim.init_grid(2, 2, 2);
        sim.set_cell(Vec3::ZERO, CellKind::ActiveRobot);
        sim.set_cell(Vec3::ZERO, CellKind::Empty);
        assert_eq!(sim.robot_count(), 1);
    }

    #[test]
    fn door_placement_retargets_and_rebuilds_distances() {
        let mut sim = Simulation::new();
        sim.init_grid(1, 1, 3);
        for z in 0..3 {
            sim.set_cell(Vec3::new(0, 0, z), CellKind::Empty);
        }
        sim.set_cell(Vec3::new(0, 0, 2), CellKind::Door);
        assert_eq!(sim.grid().door(), Vec3::new(0, 0, 2));
        assert_eq!(sim.grid().distance_at(Vec3::ZERO), 2);
    }

    #[test]
    fn first_tick_spawns_at_the_door() {
        let mut sim = Simulation::new();
        sim.set_rng(always_active());
        sim.load_map(0);
        assert_eq!(sim.robot_count(), 0);
        sim.simulate_step();
        assert_eq!(sim.robot_count(), 1);
        assert_eq!(sim.robots()[0].position, Vec3::ZERO);
        assert!(!sim.is_complete());
    }

    #[test]
    fn active_probability_is_clamped() {
        let mut sim = Simulation::new();
        sim.set_active_probability(300);
        assert_eq!(sim.active_probability(), 100);
        sim.set_active_probability(-5);
        assert_eq!(sim.active_probability(), 0);
    }

    #[test]
    fn invalid_map_index_falls_back_to_first_entry() {
        use strew_core::MemorySink;
        let mut sim = Simulation::new();
        sim.set_diagnostic_sink(Box::new(MemorySink::default()));
        sim.load_map(99);
        // Entry 0 is the single-cell room.
        assert_eq!(sim.grid().available_cells(), 1);
        assert_eq!(sim.grid().size_x(), 1);
    }

    #[test]
    fn arena_capacity_suppresses_appends() {
        let mut sim = Simulation::new();
        sim.init_grid(1, 1, 1);
        sim.set_cell(Vec3::ZERO, CellKind::Empty);
        sim.add_robot(Vec3::ZERO);
        assert_eq!(sim.robot_count(), 1);
        sim.add_robot(Vec3::ZERO);
        assert_eq!(sim.robot_count(), 1);
    }
}
