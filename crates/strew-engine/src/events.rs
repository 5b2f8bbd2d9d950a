//! Per-robot state-transition read-out for external pollers.
//!
//! Two parallel lifecycle arrays track what each robot was doing the last
//! two times it was polled. A poll derives a transition tag from the pair,
//! rolls the arrays forward, and packs the tag with the robot's last move
//! direction into a small integer for the flat surface.

use strew_core::{Direction, Vec3};

/// Coarse per-robot lifecycle sampled at poll time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not yet observed doing anything.
    Idle,
    /// Participating in the dispersion.
    Active,
    /// Finished; frozen in place.
    Settled,
}

/// Transition tag derived from two consecutive lifecycle samples.
///
/// Occupies the low 3 bits of the packed poll result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EventTag {
    /// Nothing changed since the previous poll.
    NoChange = 0,
    /// The robot is (still) looking for a move.
    Moving = 1,
    /// The robot stopped participating without settling.
    Stopped = 2,
    /// The robot settled.
    Settled = 3,
    /// A transition the lifecycle should never produce.
    Invalid = 4,
}

/// Direction code reported when a robot has not moved yet.
pub const DIRECTION_UNKNOWN: i32 = 6;

/// The per-robot transition tables.
///
/// Sleeping is deliberately not an event: it is orthogonal to the
/// Idle/Active/Settled trichotomy, and consumers that want it combine the
/// robot's sleeping flag with the tag themselves.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    prev: Vec<Lifecycle>,
    curr: Vec<Lifecycle>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every robot.
    pub fn clear(&mut self) {
        self.prev.clear();
        self.curr.clear();
    }

    /// Register a newly appended robot, starting Idle.
    pub fn push_robot(&mut self) {
        self.prev.push(Lifecycle::Idle);
        self.curr.push(Lifecycle::Idle);
    }

    /// Number of robots tracked.
    pub fn len(&self) -> usize {
        self.curr.len()
    }

    /// Whether no robots are tracked.
    pub fn is_empty(&self) -> bool {
        self.curr.is_empty()
    }

    fn diff(prev: Lifecycle, curr: Lifecycle) -> EventTag {
        use Lifecycle::*;
        match (prev, curr) {
            (Idle, Idle) => EventTag::NoChange,
            (Idle, Active) => EventTag::Moving,
            (Idle, Settled) => EventTag::Settled,
            (Active, Idle) => EventTag::Stopped,
            (Active, Active) => EventTag::Moving,
            (Active, Settled) => EventTag::Settled,
            (Settled, Settled) => EventTag::NoChange,
            (Settled, _) => EventTag::Invalid,
        }
    }

    /// Poll one robot: derive the transition tag, roll the tables forward
    /// from the robot's current active flag, and pack the result.
    ///
    /// The tag occupies bits 0..3; the last-move direction code (canonical
    /// order, [`DIRECTION_UNKNOWN`] when the robot has not moved) occupies
    /// bits 3..6. Unknown ids return −1.
    pub fn poll(&mut self, id: usize, robot_active: bool, last_move: Vec3) -> i32 {
        if id >= self.curr.len() {
            return -1;
        }
        let tag = Self::diff(self.prev[id], self.curr[id]);
        self.prev[id] = self.curr[id];
        self.curr[id] = if robot_active {
            Lifecycle::Active
        } else {
            Lifecycle::Settled
        };

        let direction = Direction::from_vec(last_move)
            .map(|d| d.index() as i32)
            .unwrap_or(DIRECTION_UNKNOWN);
        (tag as i32) | (direction << 3)
    }
}
