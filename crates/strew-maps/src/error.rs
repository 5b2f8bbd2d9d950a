//! Error types for map validation.

use std::fmt;

/// Errors detected by [`MapData::validate`](crate::MapData::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// The bit vector is shorter than the cell volume requires.
    TruncatedBits {
        /// Bytes required to cover the volume.
        expected_bytes: usize,
        /// Bytes actually present.
        have_bytes: usize,
    },
    /// The door coordinate lies outside the map volume.
    DoorOutOfVolume {
        /// The offending door coordinate.
        door: (u32, u32, u32),
    },
    /// The door cell is packed as a wall.
    DoorNotWalkable {
        /// The door coordinate.
        door: (u32, u32, u32),
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedBits {
                expected_bytes,
                have_bytes,
            } => write!(
                f,
                "bit vector truncated: need {expected_bytes} bytes, have {have_bytes}"
            ),
            Self::DoorOutOfVolume { door } => {
                write!(f, "door {:?} outside the map volume", door)
            }
            Self::DoorNotWalkable { door } => {
                write!(f, "door {:?} is packed as a wall", door)
            }
        }
    }
}

impl std::error::Error for MapError {}
