//! The per-robot record and the local decision procedure.
//!
//! A robot is a strictly local observer: its entire decision is a function
//! of one 3×3×3 neighborhood sample, a duplicate of that sample with both
//! horizontal lids closed, and the BFS door-distance of its own cell. The
//! procedure either records a move target for the tick's commit phase or
//! settles the robot in place.

use strew_core::{CellState, Diagnostic, DiagnosticSink, Direction, RobotId, Vec3};
use strew_world::Neighborhood;

/// Settled age beyond which a robot renders as part of the wall.
pub const AGED_AFTER: u32 = 5;

/// Per-robot mutable state.
///
/// Robots are appended to the arena and never removed; a settled robot
/// keeps its slot and only its `settled_age` advances.
#[derive(Clone, Debug)]
pub struct Robot {
    /// Arena identifier; doubles as commit priority.
    pub id: RobotId,
    /// Current cell.
    pub position: Vec3,
    /// Pending cell for the tick's commit phase.
    pub target: Vec3,
    /// The nominal upward axis of the world. Fixed to +Y; kept per robot
    /// for compatibility with a future variant that rotates it.
    pub external_axis: Vec3,
    /// Scratch direction recorded by the settle-vs-move arbitration.
    pub primary_dir: Vec3,
    /// Scratch direction perpendicular to both `primary_dir` and the
    /// external axis.
    pub secondary_dir: Vec3,
    /// Unit vector of the most recent accepted move; zero before the
    /// first move.
    pub last_move: Vec3,
    /// Whether the robot skipped this round's decision by activation
    /// sampling.
    pub sleeping: bool,
    /// Whether the robot has ever completed a move into a free cell.
    pub ever_moved: bool,
    /// Decision rounds since creation.
    pub active_for: u32,
    /// Whether the robot still participates in the dispersion.
    pub active: bool,
    /// Ticks since settling; advances once per tick after `active` drops.
    pub settled_age: u32,
    /// Positional moves taken (the per-robot `t` counter).
    pub moves: u32,
    /// Ticks spent active in the arena (the per-robot `e` counter).
    pub ticks: u32,
    /// Scratch copy of the neighborhood used by the last decision.
    pub obs: Neighborhood,
}

impl Robot {
    /// A fresh active robot at `position`.
    pub fn new(id: RobotId, position: Vec3) -> Self {
        Self::placed(id, position, true)
    }

    /// A robot placed by the external editing API, active or settled.
    pub fn placed(id: RobotId, position: Vec3, active: bool) -> Self {
        Self {
            id,
            position,
            target: position,
            external_axis: Direction::Up.vec(),
            primary_dir: Vec3::ZERO,
            secondary_dir: Vec3::ZERO,
            last_move: Vec3::ZERO,
            sleeping: false,
            ever_moved: false,
            active_for: 0,
            active,
            settled_age: 0,
            moves: 0,
            ticks: 0,
            obs: Neighborhood::filled(CellState::Wall),
        }
    }

    /// Whether a settled robot has aged into the scenery.
    pub fn is_aged(&self) -> bool {
        !self.active && self.settled_age > AGED_AFTER
    }

    /// Record a pending move one step along `dir`.
    ///
    /// The target is always written, but `last_move` and `ever_moved`
    /// update only when the chosen cell reads Free: pushing into a merely
    /// occupied cell (one expected to vacate during this tick's commit)
    /// leaves both untouched. This exact conditional produces the
    /// wall-hugging behavior behind dense packing.
    fn set_move(&mut self, dir: Direction) {
        let rel = dir.vec();
        self.target = self.position + rel;
        if self.obs.get(rel) == CellState::Free {
            self.last_move = rel;
            self.ever_moved = true;
        }
    }

    /// One decision round: either record a move target or settle.
    ///
    /// `obs` is the robot's neighborhood; `obs2` a duplicate that the
    /// settlement test closes the horizontal lids on; `door_distance` the
    /// BFS distance of the robot's current cell.
    pub fn decide(
        &mut self,
        obs: &Neighborhood,
        obs2: &mut Neighborhood,
        door_distance: u32,
        diag: &mut dyn DiagnosticSink,
    ) {
        self.active_for += 1;
        self.obs = *obs;

        // Entombed: every one of the six directions is a wall.
        if Direction::ALL
            .into_iter()
            .all(|d| obs.direction(d) == CellState::Wall)
        {
            self.active = false;
            self.settled_age = 0;
            return;
        }

        if self.try_settle(obs, obs2, door_distance, diag) {
            return;
        }

        // Prefer the external axis, unless the last move was straight down.
        if self.last_move != Direction::Down.vec()
            && obs.direction(Direction::Up) != CellState::Wall
        {
            self.primary_dir = Vec3::ZERO;
            self.secondary_dir = Vec3::ZERO;
            self.set_move(Direction::Up);
            return;
        }

        // Horizontal sweep in canonical order, never reversing.
        for dir in Direction::ALL {
            if dir.vec().dot(self.external_axis) != 0 {
                continue;
            }
            if dir.vec() == -self.last_move {
                continue;
            }
            if obs.direction(dir) != CellState::Wall {
                self.primary_dir = dir.vec();
                let mut secondary = dir.succ();
                while secondary.vec().dot(self.external_axis) != 0 {
                    secondary = secondary.succ();
                }
                self.secondary_dir = secondary.vec();
                self.set_move(dir);
                return;
            }
        }

        // Nothing else: fall through. The commit phase checks the target
        // against the world, so a walled cell below leaves the robot put.
        self.set_move(Direction::Down);
    }

    /// Attempt settlement. Returns true when the robot settled.
    ///
    /// A candidate needs to have moved at least once and to see a wall
    /// along each of the three axes. Settling is then rejected if walling
    /// the center would disconnect any pair of non-center cells that are
    /// currently mutually reachable — checked once on `obs` and once on
    /// `obs2` with both horizontal lids forced closed. The second check
    /// guards against settlements that only preserve reachability while a
    /// vertical corridor exists above or below.
    fn try_settle(
        &mut self,
        obs: &Neighborhood,
        obs2: &mut Neighborhood,
        door_distance: u32,
        diag: &mut dyn DiagnosticSink,
    ) -> bool {
        if !self.ever_moved {
            return false;
        }
        let walled = |a: Direction, b: Direction| {
            obs.direction(a) == CellState::Wall || obs.direction(b) == CellState::Wall
        };
        if !walled(Direction::Up, Direction::Down)
            || !walled(Direction::Left, Direction::Right)
            || !walled(Direction::Forward, Direction::Back)
        {
            return false;
        }

        obs2.close_lids();
        if !settling_preserves_reachability(obs) || !settling_preserves_reachability(obs2) {
            return false;
        }

        let expected = door_distance.saturating_add(1);
        if self.active_for != expected {
            diag.record(Diagnostic::SettledOffSchedule {
                robot: self.id,
                expected,
                actual: self.active_for,
            });
        }
        self.active = false;
        self.settled_age = 0;
        true
    }
}

/// Whether walling the center of `n` leaves every currently-connected pair
/// of non-center cells connected.
fn settling_preserves_reachability(n: &Neighborhood) -> bool {
    let blocked = n.with_center(CellState::Wall);
    for a in 0..27 {
        for b in 0..27 {
            let from = displacement(a);
            let to = displacement(b);
            if from == Vec3::ZERO || to == Vec3::ZERO {
                continue;
            }
            if n.reachable(from, to) && !blocked.reachable(from, to) {
                return false;
            }
        }
    }
    true
}

/// Displacement for a linear neighborhood index.
fn displacement(i: usize) -> Vec3 {
    Vec3::new(
        (i / 9) as i32 - 1,
        ((i % 9) / 3) as i32 - 1,
        (i % 3) as i32 - 1,
    )
}
