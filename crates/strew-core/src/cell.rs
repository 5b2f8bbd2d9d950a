//! Cell classification codes: the external render view and the internal
//! neighborhood code.

/// Logical render code exposed to consumers.
///
/// This is a *view* enum derived from the underlying state when queried,
/// never stored. The numeric codes are part of the embedding contract and
/// cross the flat integer surface unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CellKind {
    /// Walkable floor with nothing on it.
    Empty = 0,
    /// Non-walkable cell.
    Wall = 1,
    /// A robot that still participates in the dispersion.
    ActiveRobot = 2,
    /// A robot that has settled in place.
    SettledRobot = 3,
    /// The single cell through which robots enter the world.
    Door = 4,
    /// An active robot that skipped this round's decision.
    SleepingRobot = 5,
}

impl CellKind {
    /// The integer code used across the embedding boundary.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode an integer cell code.
    pub const fn from_code(code: i32) -> Option<CellKind> {
        match code {
            0 => Some(CellKind::Empty),
            1 => Some(CellKind::Wall),
            2 => Some(CellKind::ActiveRobot),
            3 => Some(CellKind::SettledRobot),
            4 => Some(CellKind::Door),
            5 => Some(CellKind::SleepingRobot),
            _ => None,
        }
    }
}

/// Internal cell code used inside 3×3×3 observation buffers.
///
/// A settled robot reads as [`Wall`](CellState::Wall) here: once a robot
/// stops moving it is indistinguishable from the environment to its
/// neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Non-walkable, out of bounds, or holding a settled robot.
    Wall,
    /// Holding an active robot.
    Occupied,
    /// Walkable and empty.
    Free,
}
