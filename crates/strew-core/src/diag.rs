//! Typed diagnostic events and the host sink seam.
//!
//! Diagnostics never alter engine behavior: they surface the anomalies the
//! specification treats as telemetry (off-schedule settlements, shadowed
//! robots after move collisions, suppressed arena appends) to whatever the
//! host wants to do with them. The default [`NullSink`] discards everything.

use crate::id::RobotId;
use crate::vec3::Vec3;

/// A telemetry event emitted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A robot settled at a decision round other than door-distance + 1.
    SettledOffSchedule {
        /// The settling robot.
        robot: RobotId,
        /// Expected decision round (door distance + 1).
        expected: u32,
        /// Actual decision round.
        actual: u32,
    },
    /// Two robots resolved to the same cell; the later id lost its
    /// occupancy back-pointer and persists as a phantom.
    RobotShadowed {
        /// The robot left without a back-pointer.
        loser: RobotId,
        /// The robot that claimed the cell.
        winner: RobotId,
        /// The contested cell.
        cell: Vec3,
    },
    /// A robot's position is outside the walkable grid.
    RobotOffGrid {
        /// The stranded robot.
        robot: RobotId,
        /// Its current position.
        cell: Vec3,
    },
    /// The robot arena is at capacity; an append was suppressed.
    ArenaFull {
        /// The arena capacity (grid volume).
        capacity: u32,
    },
    /// A map load was requested with an index outside the catalog.
    UnknownMap {
        /// The requested index.
        index: i32,
    },
}

/// Receiver for [`Diagnostic`] events.
///
/// `Send` for the same reason as the randomness seam: boxed sinks live
/// inside engine instances that may cross threads.
pub trait DiagnosticSink: Send {
    /// Record one event.
    fn record(&mut self, event: Diagnostic);
}

/// Discards every event. The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _event: Diagnostic) {}
}

/// Buffers events in memory for later inspection (tests, dashboards).
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    /// Every event recorded so far, in emission order.
    pub events: Vec<Diagnostic>,
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, event: Diagnostic) {
        self.events.push(event);
    }
}
